#![allow(dead_code)]

/// X output, 6-bit signed value plus alert bit
pub const XOUT: u8 = 0x00;
/// Y output, 6-bit signed value plus alert bit
pub const YOUT: u8 = 0x01;
/// Z output, 6-bit signed value plus alert bit
pub const ZOUT: u8 = 0x02;

/// Tilt status: orientation, tap, shake and alert flags
pub const TILT: u8 = 0x03;

/// Sample rate status
pub const SRST: u8 = 0x04;

/// Sleep count
pub const SPCNT: u8 = 0x05;

/// Interrupt setup
pub const INTSU: u8 = 0x06;

/// Mode, auto-wake/sleep and interrupt pin configuration
pub const MODE: u8 = 0x07;

/// Auto-wake/sleep sample rates and tilt debounce filter
pub const SR: u8 = 0x08;

/// Tap detection threshold and axis disable bits
pub const PDET: u8 = 0x09;

/// Tap pulse debounce count
pub const PD: u8 = 0x0A;

/// Number of registers, XOUT through PD.
pub const COUNT: usize = 11;

/// A bit field inside one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Field {
    pub register: u8,
    pub shift: u8,
    /// Unshifted mask, e.g. `0b111` for a 3-bit field.
    pub mask: u8,
}

impl Field {
    const fn new(register: u8, shift: u8, mask: u8) -> Self {
        Field {
            register,
            shift,
            mask,
        }
    }

    pub fn extract(self, value: u8) -> u8 {
        (value >> self.shift) & self.mask
    }

    pub fn insert(self, value: u8, field: u8) -> u8 {
        (value & !(self.mask << self.shift)) | ((field & self.mask) << self.shift)
    }
}

pub(crate) mod field {
    use super::*;

    pub const SRST_AUTO_SLEEP: Field = Field::new(SRST, 0, 0b1);
    pub const SRST_AUTO_WAKE: Field = Field::new(SRST, 1, 0b1);

    pub const MODE_SELECT: Field = Field::new(MODE, 0, 0b111);
    pub const MODE_AUTO_WAKE: Field = Field::new(MODE, 3, 0b1);
    pub const MODE_AUTO_SLEEP: Field = Field::new(MODE, 4, 0b1);
    pub const MODE_PRESCALER: Field = Field::new(MODE, 5, 0b1);
    pub const MODE_PUSH_PULL: Field = Field::new(MODE, 6, 0b1);
    pub const MODE_ACTIVE_HIGH: Field = Field::new(MODE, 7, 0b1);

    pub const SR_ACTIVE_RATE: Field = Field::new(SR, 0, 0b111);
    pub const SR_AUTO_WAKE_RATE: Field = Field::new(SR, 3, 0b11);
    pub const SR_FILTER: Field = Field::new(SR, 5, 0b111);

    pub const PDET_THRESHOLD: Field = Field::new(PDET, 0, 0b1_1111);
    /// XDA, YDA and ZDA. Set bits disable tap detection on that axis.
    pub const PDET_AXIS_DISABLE: Field = Field::new(PDET, 5, 0b111);

    pub const TILT_BACK_FRONT: Field = Field::new(TILT, 0, 0b11);
    pub const TILT_PORTRAIT_LANDSCAPE: Field = Field::new(TILT, 2, 0b111);
    pub const TILT_TAP: Field = Field::new(TILT, 5, 0b1);
    pub const TILT_ALERT: Field = Field::new(TILT, 6, 0b1);
    pub const TILT_SHAKE: Field = Field::new(TILT, 7, 0b1);

    /// 6-bit two's complement sample in XOUT/YOUT/ZOUT.
    pub const OUT_VALUE: Field = Field::new(XOUT, 0, 0b11_1111);
    pub const OUT_ALERT: Field = Field::new(XOUT, 6, 0b1);
}
