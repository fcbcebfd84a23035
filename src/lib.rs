//! Driver for the NXP MMA7660FC 3-axis orientation/motion detection sensor.
//!
//! The blocking driver is [`MMA7660FC`]; with the `async` feature the same
//! API is available as [`asynch::MMA7660FC`].
//!
//! The device only accepts writes to registers other than MODE while it is in
//! standby. Either put it in standby around individual setters or use
//! [`MMA7660FC::apply_config`], which takes care of the ordering.
//!
//! ```ignore
//! let mut accel = MMA7660FC::new(i2c);
//! accel.init()?;
//! accel.apply_config(&Config::basic())?;
//! let sample = accel.read()?;
//! ```

#![no_std]

#[macro_use]
mod fmt;

#[cfg(feature = "async")]
pub mod asynch;
mod blocking;
mod config;
pub mod register;
mod tilt;

pub use blocking::{RawRegisters, MMA7660FC};
pub use config::Config;
pub use tilt::{BackFront, Orientation, Tilt};

use bitflags::bitflags;
use register::field;

/// 7-bit I2C address. The part has no address select pin.
pub const ADDRESS: u8 = 0x4C;

/// Sample counts per g of acceleration.
pub const COUNTS_PER_G: f32 = 21.33;
pub const ACCELERATION_MIN_G: f32 = -1.5;
pub const ACCELERATION_MAX_G: f32 = 1.5;

pub const TAP_THRESHOLD_MAX: u8 = 31;

const TAP_PULSE_DEBOUNCE_BASE_MS: f32 = 0.52;
const TAP_PULSE_DEBOUNCE_STEP_MS: f32 = 0.26;
pub const TAP_PULSE_DEBOUNCE_MIN_MS: f32 = TAP_PULSE_DEBOUNCE_BASE_MS;
pub const TAP_PULSE_DEBOUNCE_MAX_MS: f32 =
    TAP_PULSE_DEBOUNCE_BASE_MS + (u8::MAX - 1) as f32 * TAP_PULSE_DEBOUNCE_STEP_MS;

/// Static information about the chip and this driver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Info {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    pub supply_voltage_min_v: f32,
    pub supply_voltage_max_v: f32,
    pub max_current_ma: f32,
    /// Operating range. The chip has no temperature output.
    pub temperature_min_c: f32,
    pub temperature_max_c: f32,
    pub driver_version: u32,
}

pub const INFO: Info = Info {
    chip_name: "NXP MMA7660FC",
    manufacturer_name: "NXP",
    interface: "IIC",
    supply_voltage_min_v: 2.4,
    supply_voltage_max_v: 3.6,
    max_current_ma: 0.294,
    temperature_min_c: -40.0,
    temperature_max_c: 85.0,
    driver_version: 1000,
};

pub fn info() -> Info {
    INFO
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    Bus(E),
    /// The driver was not initialized, or was deinitialized.
    NotInitialized,
    /// A value was outside the range the device accepts. Nothing was written.
    InvalidParameter,
    /// A register held a reserved encoding.
    UnsupportedState { register: u8, value: u8 },
    /// An axis sample was read while the device was updating it.
    Alert,
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Error::Bus(e) => write!(f, "Bus error: {}", e),
            Error::NotInitialized => write!(f, "Driver not initialized"),
            Error::InvalidParameter => write!(f, "Parameter out of range"),
            Error::UnsupportedState { register, value } => write!(
                f,
                "Reserved value {:#04x} in register {:#04x}",
                value, register
            ),
            Error::Alert => write!(f, "Sample read during update"),
        }
    }
}

impl<E> core::convert::From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Standby = 0b000,
    Active = 0b001,
    Test = 0b100,
}

impl Mode {
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b000 => Some(Mode::Standby),
            0b001 => Some(Mode::Active),
            0b100 => Some(Mode::Test),
            _ => None,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepCounterPrescaler {
    DivideBy1 = 0,
    DivideBy16 = 1,
}

impl SleepCounterPrescaler {
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 0b1 == 0b1 {
            SleepCounterPrescaler::DivideBy16
        } else {
            SleepCounterPrescaler::DivideBy1
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPinLevel {
    ActiveLow = 0,
    ActiveHigh = 1,
}

impl InterruptPinLevel {
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 0b1 == 0b1 {
            InterruptPinLevel::ActiveHigh
        } else {
            InterruptPinLevel::ActiveLow
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPinDrain {
    OpenDrain = 0,
    PushPull = 1,
}

impl InterruptPinDrain {
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 0b1 == 0b1 {
            InterruptPinDrain::PushPull
        } else {
            InterruptPinDrain::OpenDrain
        }
    }
}

/// Active mode sample rate, which is also the tap detection rate.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
    Hz120 = 0,
    Hz64 = 1,
    Hz32 = 2,
    Hz16 = 3,
    Hz8 = 4,
    Hz4 = 5,
    Hz2 = 6,
    Hz1 = 7,
}

impl SampleRate {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => SampleRate::Hz120,
            1 => SampleRate::Hz64,
            2 => SampleRate::Hz32,
            3 => SampleRate::Hz16,
            4 => SampleRate::Hz8,
            5 => SampleRate::Hz4,
            6 => SampleRate::Hz2,
            _ => SampleRate::Hz1,
        }
    }

    pub fn samples_per_second(self) -> u8 {
        match self {
            SampleRate::Hz120 => 120,
            SampleRate::Hz64 => 64,
            SampleRate::Hz32 => 32,
            SampleRate::Hz16 => 16,
            SampleRate::Hz8 => 8,
            SampleRate::Hz4 => 4,
            SampleRate::Hz2 => 2,
            SampleRate::Hz1 => 1,
        }
    }
}

/// Sample rate while auto-sleeping, used to detect activity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoWakeRate {
    Hz32 = 0,
    Hz16 = 1,
    Hz8 = 2,
    Hz1 = 3,
}

impl AutoWakeRate {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => AutoWakeRate::Hz32,
            1 => AutoWakeRate::Hz16,
            2 => AutoWakeRate::Hz8,
            _ => AutoWakeRate::Hz1,
        }
    }
}

/// Number of consecutive matching samples required before the tilt
/// orientation is updated.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TiltDebounceFilter {
    Disabled = 0,
    Samples2 = 1,
    Samples3 = 2,
    Samples4 = 3,
    Samples5 = 4,
    Samples6 = 5,
    Samples7 = 6,
    Samples8 = 7,
}

impl TiltDebounceFilter {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => TiltDebounceFilter::Disabled,
            1 => TiltDebounceFilter::Samples2,
            2 => TiltDebounceFilter::Samples3,
            3 => TiltDebounceFilter::Samples4,
            4 => TiltDebounceFilter::Samples5,
            5 => TiltDebounceFilter::Samples6,
            6 => TiltDebounceFilter::Samples7,
            _ => TiltDebounceFilter::Samples8,
        }
    }
}

bitflags! {
    /// Interrupt sources routed to the INT pin (INTSU register).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InterruptEnable: u8 {
        const FRONT_BACK         = 1 << 0;
        const UP_DOWN_RIGHT_LEFT = 1 << 1;
        const TAP                = 1 << 2;
        const AUTO_SLEEP         = 1 << 3;
        /// Interrupt after every measurement.
        const UPDATE             = 1 << 4;
        const SHAKE_Z            = 1 << 5;
        const SHAKE_Y            = 1 << 6;
        const SHAKE_X            = 1 << 7;
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Axes: u8 {
        const X = 0b001;
        const Y = 0b010;
        const Z = 0b100;
    }

    /// Pending interrupt sources decoded by `irq_handler`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Event: u16 {
        /// Lying on its front.
        const FRONT        = 1 << 0;
        /// Lying on its back.
        const BACK         = 1 << 1;
        /// Landscape, turned left.
        const LEFT         = 1 << 2;
        /// Landscape, turned right.
        const RIGHT        = 1 << 3;
        /// Standing vertically, inverted.
        const DOWN         = 1 << 4;
        /// Standing vertically, normal orientation.
        const UP           = 1 << 5;
        const TAP          = 1 << 6;
        /// Tilt register was being updated when read.
        const UPDATE       = 1 << 7;
        /// Shake on one or more axes.
        const SHAKE        = 1 << 8;
        const AUTO_SLEEP   = 1 << 9;
        const AUTO_WAKE_UP = 1 << 10;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptEnable {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "InterruptEnable({=u8:#b})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Axes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Axes({=u8:#b})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Event({=u16:#x})", self.bits())
    }
}

/// Map tap detection enable flags to the PDET disable bits, and back.
fn axes_to_disable_bits(axes: Axes) -> u8 {
    axes.complement().bits()
}

fn disable_bits_to_axes(bits: u8) -> Axes {
    Axes::from_bits_truncate(!bits)
}

/// One sample of all three axes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    /// Sign-extended counts in -32..=31.
    pub raw: [i8; 3],
    /// Acceleration in g, within `ACCELERATION_MIN_G..=ACCELERATION_MAX_G`.
    pub g: [f32; 3],
}

impl Acceleration {
    /// Decode XOUT, YOUT and ZOUT. Returns `None` if any alert bit is set.
    pub(crate) fn from_registers(buf: [u8; 3]) -> Option<Self> {
        let mut raw = [0i8; 3];
        let mut g = [0f32; 3];

        for (i, out) in buf.iter().enumerate() {
            if field::OUT_ALERT.extract(*out) == 1 {
                return None;
            }
            raw[i] = sign_extend_6bit(field::OUT_VALUE.extract(*out));
            g[i] = counts_to_g(raw[i]);
        }

        Some(Acceleration { raw, g })
    }
}

fn sign_extend_6bit(value: u8) -> i8 {
    ((value << 2) as i8) >> 2
}

fn counts_to_g(counts: i8) -> f32 {
    let g = counts as f32 / COUNTS_PER_G;
    g.clamp(ACCELERATION_MIN_G, ACCELERATION_MAX_G)
}

/// Convert a tap pulse debounce time to the PD register value, rounding to
/// the nearest 0.26 ms step. Returns `None` outside
/// `TAP_PULSE_DEBOUNCE_MIN_MS..=TAP_PULSE_DEBOUNCE_MAX_MS`.
pub fn tap_pulse_debounce_to_register(ms: f32) -> Option<u8> {
    if !(TAP_PULSE_DEBOUNCE_MIN_MS..=TAP_PULSE_DEBOUNCE_MAX_MS).contains(&ms) {
        return None;
    }

    // Non-negative here, so adding a half before truncating rounds.
    let steps = (ms - TAP_PULSE_DEBOUNCE_BASE_MS) / TAP_PULSE_DEBOUNCE_STEP_MS + 0.5;
    Some(steps as u8 + 1)
}

/// Convert a PD register value to a tap pulse debounce time in ms.
/// Both 0 and 1 mean the minimum of 0.52 ms.
pub fn tap_pulse_debounce_to_ms(reg: u8) -> f32 {
    let steps = reg.saturating_sub(1);
    steps as f32 * TAP_PULSE_DEBOUNCE_STEP_MS + TAP_PULSE_DEBOUNCE_BASE_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_round_trip() {
        for reg in 1..=u8::MAX {
            let ms = tap_pulse_debounce_to_ms(reg);
            assert_eq!(tap_pulse_debounce_to_register(ms), Some(reg));
        }
    }

    #[test]
    fn debounce_zero_is_minimum() {
        assert_eq!(tap_pulse_debounce_to_ms(0), TAP_PULSE_DEBOUNCE_MIN_MS);
        assert_eq!(tap_pulse_debounce_to_register(0.52), Some(1));
    }

    #[test]
    fn debounce_rejects_out_of_range() {
        assert_eq!(tap_pulse_debounce_to_register(0.5), None);
        assert_eq!(tap_pulse_debounce_to_register(66.6), None);
        assert_eq!(tap_pulse_debounce_to_register(f32::NAN), None);
        assert_eq!(tap_pulse_debounce_to_register(-1.0), None);
    }

    #[test]
    fn debounce_ten_ms() {
        assert_eq!(tap_pulse_debounce_to_register(10.0), Some(37));
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend_6bit(0b00_0001), 1);
        assert_eq!(sign_extend_6bit(0b01_1111), 31);
        assert_eq!(sign_extend_6bit(0b10_0000), -32);
        assert_eq!(sign_extend_6bit(0b11_1111), -1);
    }

    #[test]
    fn acceleration_stays_in_range() {
        let sample = Acceleration::from_registers([0x20, 0x1F, 0x00]).unwrap();
        assert_eq!(sample.raw, [-32, 31, 0]);
        assert_eq!(sample.g[0], ACCELERATION_MIN_G);
        assert!(sample.g[1] <= ACCELERATION_MAX_G);
        assert!((sample.g[1] - 31.0 / COUNTS_PER_G).abs() < 1e-6);
        assert_eq!(sample.g[2], 0.0);
    }

    #[test]
    fn acceleration_ignores_bit_7() {
        let sample = Acceleration::from_registers([0x81, 0x80, 0xBF]).unwrap();
        assert_eq!(sample.raw, [1, 0, -1]);
    }

    #[test]
    fn acceleration_alert() {
        assert_eq!(Acceleration::from_registers([0x00, 0x40, 0x00]), None);
    }

    #[test]
    fn tap_axes_are_inverted() {
        assert_eq!(axes_to_disable_bits(Axes::all()), 0);
        assert_eq!(axes_to_disable_bits(Axes::X), 0b110);
        assert_eq!(disable_bits_to_axes(0b101), Axes::Y);
    }
}
