use crate::{register::field, Event};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackFront {
    Unknown,
    Front,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Unknown,
    /// Landscape, turned left.
    Left,
    /// Landscape, turned right.
    Right,
    /// Standing vertically, inverted.
    Down,
    /// Standing vertically, normal orientation.
    Up,
}

/// Snapshot of the TILT register.
///
/// Tap and shake are cleared by the device when the register is read, so they
/// are only reported once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tilt {
    pub back_front: BackFront,
    pub orientation: Orientation,
    pub tap: bool,
    pub shake: bool,
    /// The register was being updated during the read; read it again.
    pub alert: bool,
}

impl Tilt {
    /// Returns `None` for the reserved BaFro and PoLa encodings.
    pub(crate) fn from_register(value: u8) -> Option<Self> {
        Some(Tilt {
            back_front: decode_back_front(value)?,
            orientation: decode_orientation(value)?,
            ..Tilt::flags(value)
        })
    }

    /// Reserved BaFro and PoLa encodings decode as `Unknown`; tap, shake and
    /// alert are kept either way.
    pub(crate) fn from_register_lenient(value: u8) -> Self {
        Tilt {
            back_front: decode_back_front(value).unwrap_or(BackFront::Unknown),
            orientation: decode_orientation(value).unwrap_or(Orientation::Unknown),
            ..Tilt::flags(value)
        }
    }

    fn flags(value: u8) -> Self {
        Tilt {
            back_front: BackFront::Unknown,
            orientation: Orientation::Unknown,
            tap: field::TILT_TAP.extract(value) == 1,
            shake: field::TILT_SHAKE.extract(value) == 1,
            alert: field::TILT_ALERT.extract(value) == 1,
        }
    }

    pub fn events(&self) -> Event {
        let mut events = Event::empty();

        match self.back_front {
            BackFront::Front => events |= Event::FRONT,
            BackFront::Back => events |= Event::BACK,
            BackFront::Unknown => {}
        }

        match self.orientation {
            Orientation::Left => events |= Event::LEFT,
            Orientation::Right => events |= Event::RIGHT,
            Orientation::Down => events |= Event::DOWN,
            Orientation::Up => events |= Event::UP,
            Orientation::Unknown => {}
        }

        events.set(Event::TAP, self.tap);
        events.set(Event::UPDATE, self.alert);
        events.set(Event::SHAKE, self.shake);

        events
    }
}

fn decode_back_front(value: u8) -> Option<BackFront> {
    match field::TILT_BACK_FRONT.extract(value) {
        0b00 => Some(BackFront::Unknown),
        0b01 => Some(BackFront::Front),
        0b10 => Some(BackFront::Back),
        _ => None,
    }
}

fn decode_orientation(value: u8) -> Option<Orientation> {
    match field::TILT_PORTRAIT_LANDSCAPE.extract(value) {
        0b000 => Some(Orientation::Unknown),
        0b001 => Some(Orientation::Left),
        0b010 => Some(Orientation::Right),
        0b101 => Some(Orientation::Down),
        0b110 => Some(Orientation::Up),
        _ => None,
    }
}

/// Decode the auto-sleep/auto-wake bits of SRST.
pub(crate) fn sample_rate_status_events(value: u8) -> Event {
    let mut events = Event::empty();
    events.set(Event::AUTO_SLEEP, field::SRST_AUTO_SLEEP.extract(value) == 1);
    events.set(Event::AUTO_WAKE_UP, field::SRST_AUTO_WAKE.extract(value) == 1);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_orientation() {
        let tilt = Tilt::from_register(0b0001_1001).unwrap();
        assert_eq!(tilt.back_front, BackFront::Front);
        assert_eq!(tilt.orientation, Orientation::Up);
        assert!(!tilt.tap && !tilt.shake && !tilt.alert);
        assert_eq!(tilt.events(), Event::FRONT | Event::UP);
    }

    #[test]
    fn decodes_tap_and_shake() {
        let tilt = Tilt::from_register(0b1010_1010).unwrap();
        assert_eq!(tilt.back_front, BackFront::Back);
        assert_eq!(tilt.orientation, Orientation::Right);
        assert_eq!(
            tilt.events(),
            Event::BACK | Event::RIGHT | Event::TAP | Event::SHAKE
        );
    }

    #[test]
    fn alert_reports_update() {
        let tilt = Tilt::from_register(0b0100_0000).unwrap();
        assert!(tilt.alert);
        assert_eq!(tilt.events(), Event::UPDATE);
    }

    #[test]
    fn rejects_reserved_encodings() {
        assert_eq!(Tilt::from_register(0b0000_0011), None);
        assert_eq!(Tilt::from_register(0b0000_1100), None);
        assert_eq!(Tilt::from_register(0b0001_0000), None);
        assert_eq!(Tilt::from_register(0b0001_1100), None);
    }

    #[test]
    fn lenient_decode_keeps_flags() {
        let tilt = Tilt::from_register_lenient(0b1010_0011);
        assert_eq!(tilt.back_front, BackFront::Unknown);
        assert_eq!(tilt.orientation, Orientation::Unknown);
        assert_eq!(tilt.events(), Event::TAP | Event::SHAKE);

        let tilt = Tilt::from_register_lenient(0b0101_1101);
        assert_eq!(tilt.back_front, BackFront::Front);
        assert_eq!(tilt.events(), Event::FRONT | Event::UPDATE);
    }

    #[test]
    fn sample_rate_status() {
        assert_eq!(sample_rate_status_events(0b01), Event::AUTO_SLEEP);
        assert_eq!(sample_rate_status_events(0b10), Event::AUTO_WAKE_UP);
        assert_eq!(sample_rate_status_events(0b1111_1100), Event::empty());
    }
}
