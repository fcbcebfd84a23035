use crate::{
    axes_to_disable_bits, disable_bits_to_axes,
    register::{self, field},
    AutoWakeRate, Axes, InterruptEnable, InterruptPinDrain, InterruptPinLevel, Mode, SampleRate,
    SleepCounterPrescaler, TiltDebounceFilter, TAP_THRESHOLD_MAX,
};

/// Every writable setting of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Mode entered once the rest of the configuration is written.
    pub mode: Mode,
    pub interrupts: InterruptEnable,
    pub interrupt_pin_level: InterruptPinLevel,
    pub interrupt_pin_drain: InterruptPinDrain,
    pub auto_sleep: bool,
    pub auto_wake_up: bool,
    /// Inactive samples counted before auto-sleep, in units of
    /// `sleep_counter_prescaler` samples.
    pub sleep_count: u8,
    pub sleep_counter_prescaler: SleepCounterPrescaler,
    pub tap_detection_rate: SampleRate,
    pub auto_wake_rate: AutoWakeRate,
    pub tilt_debounce_filter: TiltDebounceFilter,
    /// 0..=31 counts.
    pub tap_detection_threshold: u8,
    pub tap_axes: Axes,
    /// Raw PD value, see [`crate::tap_pulse_debounce_to_register`].
    pub tap_pulse_debounce_count: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config::basic()
    }
}

impl Config {
    /// Polled operation: every interrupt and gesture feature off.
    pub fn basic() -> Self {
        Config {
            mode: Mode::Active,
            interrupts: InterruptEnable::empty(),
            interrupt_pin_level: InterruptPinLevel::ActiveLow,
            interrupt_pin_drain: InterruptPinDrain::PushPull,
            auto_sleep: false,
            auto_wake_up: false,
            sleep_count: 0,
            sleep_counter_prescaler: SleepCounterPrescaler::DivideBy1,
            tap_detection_rate: SampleRate::Hz8,
            auto_wake_rate: AutoWakeRate::Hz16,
            tilt_debounce_filter: TiltDebounceFilter::Samples2,
            tap_detection_threshold: 0,
            tap_axes: Axes::empty(),
            tap_pulse_debounce_count: 0,
        }
    }

    /// Orientation, tap, shake and auto-sleep interrupts on the INT pin.
    pub fn motion() -> Self {
        Config {
            mode: Mode::Active,
            interrupts: InterruptEnable::all().difference(InterruptEnable::UPDATE),
            interrupt_pin_level: InterruptPinLevel::ActiveLow,
            interrupt_pin_drain: InterruptPinDrain::PushPull,
            auto_sleep: true,
            auto_wake_up: true,
            sleep_count: 127,
            sleep_counter_prescaler: SleepCounterPrescaler::DivideBy1,
            tap_detection_rate: SampleRate::Hz120,
            auto_wake_rate: AutoWakeRate::Hz32,
            tilt_debounce_filter: TiltDebounceFilter::Samples8,
            tap_detection_threshold: 2,
            tap_axes: Axes::all(),
            // 10ms
            tap_pulse_debounce_count: 37,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.tap_detection_threshold <= TAP_THRESHOLD_MAX
    }

    /// MODE register contents, with the mode bits replaced by `mode`.
    pub(crate) fn mode_register(&self, mode: Mode) -> u8 {
        let mut value = field::MODE_SELECT.insert(0, mode as u8);
        value = field::MODE_AUTO_WAKE.insert(value, u8::from(self.auto_wake_up));
        value = field::MODE_AUTO_SLEEP.insert(value, u8::from(self.auto_sleep));
        value = field::MODE_PRESCALER.insert(value, self.sleep_counter_prescaler as u8);
        value = field::MODE_PUSH_PULL.insert(value, self.interrupt_pin_drain as u8);
        field::MODE_ACTIVE_HIGH.insert(value, self.interrupt_pin_level as u8)
    }

    pub(crate) fn sr_register(&self) -> u8 {
        let mut value = field::SR_ACTIVE_RATE.insert(0, self.tap_detection_rate as u8);
        value = field::SR_AUTO_WAKE_RATE.insert(value, self.auto_wake_rate as u8);
        field::SR_FILTER.insert(value, self.tilt_debounce_filter as u8)
    }

    pub(crate) fn pdet_register(&self) -> u8 {
        let value = field::PDET_THRESHOLD.insert(0, self.tap_detection_threshold);
        field::PDET_AXIS_DISABLE.insert(value, axes_to_disable_bits(self.tap_axes))
    }

    /// Register writes in the order the device needs them: standby first,
    /// the configuration, then the requested mode.
    pub(crate) fn writes(&self) -> [[u8; 2]; 7] {
        [
            [register::MODE, self.mode_register(Mode::Standby)],
            [register::SPCNT, self.sleep_count],
            [register::INTSU, self.interrupts.bits()],
            [register::SR, self.sr_register()],
            [register::PDET, self.pdet_register()],
            [register::PD, self.tap_pulse_debounce_count],
            [register::MODE, self.mode_register(self.mode)],
        ]
    }

    /// Decode SPCNT through PD. Returns the reserved MODE value on failure.
    pub(crate) fn from_registers(buf: [u8; 6]) -> Result<Self, u8> {
        let [spcnt, intsu, mode, sr, pdet, pd] = buf;

        let mode_bits = field::MODE_SELECT.extract(mode);
        let Some(device_mode) = Mode::from_bits(mode_bits) else {
            return Err(mode);
        };

        Ok(Config {
            mode: device_mode,
            interrupts: InterruptEnable::from_bits_truncate(intsu),
            interrupt_pin_level: InterruptPinLevel::from_bits(
                field::MODE_ACTIVE_HIGH.extract(mode),
            ),
            interrupt_pin_drain: InterruptPinDrain::from_bits(field::MODE_PUSH_PULL.extract(mode)),
            auto_sleep: field::MODE_AUTO_SLEEP.extract(mode) == 1,
            auto_wake_up: field::MODE_AUTO_WAKE.extract(mode) == 1,
            sleep_count: spcnt,
            sleep_counter_prescaler: SleepCounterPrescaler::from_bits(
                field::MODE_PRESCALER.extract(mode),
            ),
            tap_detection_rate: SampleRate::from_bits(field::SR_ACTIVE_RATE.extract(sr)),
            auto_wake_rate: AutoWakeRate::from_bits(field::SR_AUTO_WAKE_RATE.extract(sr)),
            tilt_debounce_filter: TiltDebounceFilter::from_bits(field::SR_FILTER.extract(sr)),
            tap_detection_threshold: field::PDET_THRESHOLD.extract(pdet),
            tap_axes: disable_bits_to_axes(field::PDET_AXIS_DISABLE.extract(pdet)),
            tap_pulse_debounce_count: pd,
        })
    }
}
