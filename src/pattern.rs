//! Operation modes and the light patterns they produce.
//!
//! Time is counted in received pulses, roughly 20 ms each. Flash and SOS are
//! fixed tables of half-open `[start, end)` windows; a tick is active when the
//! window containing it is.

use crate::config::{
    BLINK_ACTIVE, BLINK_PERIOD, BLINK_RANGE, FLASH_RANGE, OFF_RANGE, ON_RANGE, SOS_RANGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Off,
    On,
    Blink,
    /// Double flash followed by a long pause.
    Flash,
    Sos,
    /// The value lies on a range boundary or outside every range.
    Undefined,
}

impl Mode {
    pub fn from_value(value: u8) -> Self {
        let within = |(low, high): (u8, u8)| low < value && value < high;

        if within(OFF_RANGE) {
            Mode::Off
        } else if within(ON_RANGE) {
            Mode::On
        } else if within(BLINK_RANGE) {
            Mode::Blink
        } else if within(FLASH_RANGE) {
            Mode::Flash
        } else if within(SOS_RANGE) {
            Mode::Sos
        } else {
            Mode::Undefined
        }
    }

    /// Light level for this mode at the given pattern phases, or `None` when
    /// the mode does not command the light.
    pub fn level(self, pulse_phase: u16, flash_phase: u8) -> Option<bool> {
        match self {
            Mode::Off => Some(false),
            Mode::On => Some(true),
            Mode::Blink => Some(blink(pulse_phase)),
            Mode::Flash => Some(flash(flash_phase)),
            Mode::Sos => Some(sos(pulse_phase)),
            Mode::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u16,
    pub end: u16,
    pub active: bool,
}

impl Window {
    const fn new(start: u16, end: u16, active: bool) -> Self {
        Self { start, end, active }
    }

    fn contains(&self, tick: u16) -> bool {
        self.start <= tick && tick < self.end
    }
}

pub const FLASH_WINDOWS: [Window; 4] = [
    Window::new(0, 4, true),
    Window::new(4, 7, false),
    Window::new(7, 11, true),
    Window::new(11, 35, false),
];

// S: dit dit dit, O: dah dah dah, S: dit dit dit, then the word gap.
// One dit is 8 ticks.
pub const SOS_WINDOWS: [Window; 18] = [
    Window::new(0, 8, true),
    Window::new(8, 16, false),
    Window::new(16, 24, true),
    Window::new(24, 32, false),
    Window::new(32, 40, true),
    Window::new(40, 64, false),
    Window::new(64, 88, true),
    Window::new(88, 96, false),
    Window::new(96, 120, true),
    Window::new(120, 128, false),
    Window::new(128, 152, true),
    Window::new(152, 176, false),
    Window::new(176, 184, true),
    Window::new(184, 192, false),
    Window::new(192, 200, true),
    Window::new(200, 208, false),
    Window::new(208, 216, true),
    Window::new(216, 273, false),
];

fn lookup(windows: &[Window], tick: u16) -> bool {
    windows
        .iter()
        .find(|window| window.contains(tick))
        .map_or(false, |window| window.active)
}

pub fn blink(pulse_phase: u16) -> bool {
    pulse_phase % BLINK_PERIOD < BLINK_ACTIVE
}

pub fn flash(flash_phase: u8) -> bool {
    lookup(&FLASH_WINDOWS, u16::from(flash_phase))
}

pub fn sos(pulse_phase: u16) -> bool {
    lookup(&SOS_WINDOWS, pulse_phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FLASH_PERIOD, PULSE_PERIOD};

    #[test]
    fn test_mode_ranges() {
        assert!((76..90).all(|v| Mode::from_value(v) == Mode::Off));
        assert!((91..105).all(|v| Mode::from_value(v) == Mode::On));
        assert!((106..120).all(|v| Mode::from_value(v) == Mode::Blink));
        assert!((121..135).all(|v| Mode::from_value(v) == Mode::Flash));
        assert!((136..150).all(|v| Mode::from_value(v) == Mode::Sos));
    }

    #[test]
    fn test_boundaries_are_undefined() {
        for v in [75, 90, 105, 120, 135, 150] {
            assert_eq!(Mode::from_value(v), Mode::Undefined, "value {v}");
        }
        assert!((0..=75).all(|v| Mode::from_value(v) == Mode::Undefined));
        assert!((150..=255).all(|v| Mode::from_value(v) == Mode::Undefined));
        assert_eq!(Mode::Undefined.level(0, 0), None);
    }

    #[test]
    fn test_off_and_on_ignore_ticks() {
        for tick in 0..PULSE_PERIOD {
            let flash_tick = (tick % u16::from(FLASH_PERIOD)) as u8;
            assert_eq!(Mode::Off.level(tick, flash_tick), Some(false));
            assert_eq!(Mode::On.level(tick, flash_tick), Some(true));
        }
    }

    #[test]
    fn test_blink_square_wave() {
        for tick in 0..PULSE_PERIOD {
            assert_eq!(blink(tick), tick % 16 < 8, "tick {tick}");
        }
        assert!(blink(0));
        assert!(blink(7));
        assert!(!blink(8));
        assert!(!blink(15));
        assert!(blink(16));
    }

    #[test]
    fn test_flash_sequence() {
        let expected: [bool; 34] = [
            true, true, true, true, false, false, false, true, true, true, true, false, false,
            false, false, false, false, false, false, false, false, false, false, false, false,
            false, false, false, false, false, false, false, false, false,
        ];
        let actual: [bool; 34] = core::array::from_fn(|tick| flash(tick as u8));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_sos_landmarks() {
        assert!(sos(0));
        assert!(!sos(8));
        assert!(sos(64));
        assert!(sos(87));
        assert!(!sos(88));
        assert!(sos(208));
        assert!(!sos(216));
        assert!(!sos(PULSE_PERIOD - 1));
    }

    #[test]
    fn test_sos_spells_morse() {
        // Collapse the waveform into runs of (level, length in dits).
        let mut runs: Vec<(bool, u16)> = Vec::new();
        for tick in 0..PULSE_PERIOD {
            let level = sos(tick);
            match runs.last_mut() {
                Some((last, len)) if *last == level => *len += 1,
                _ => runs.push((level, 1)),
            }
        }
        let dits: Vec<(bool, u16)> = runs.iter().map(|&(l, n)| (l, n / 8)).collect();

        assert_eq!(
            &dits[..17],
            &[
                (true, 1),
                (false, 1),
                (true, 1),
                (false, 1),
                (true, 1),
                (false, 3),
                (true, 3),
                (false, 1),
                (true, 3),
                (false, 1),
                (true, 3),
                (false, 3),
                (true, 1),
                (false, 1),
                (true, 1),
                (false, 1),
                (true, 1),
            ]
        );
        assert_eq!(dits[17], (false, 7));
    }

    #[test]
    fn test_tables_tile_their_period() {
        for table in [&FLASH_WINDOWS[..], &SOS_WINDOWS[..]] {
            assert_eq!(table[0].start, 0);
            for pair in table.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert_ne!(pair[0].active, pair[1].active);
            }
        }
        assert!(FLASH_WINDOWS[3].end > u16::from(FLASH_PERIOD));
        assert!(SOS_WINDOWS[17].end > PULSE_PERIOD);
    }
}
