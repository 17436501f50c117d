//! The idle loop's step: pick the mode, run its pattern, apply the fault
//! override.

use crate::channel::Snapshot;
use crate::config::{FLASH_PERIOD, PULSE_PERIOD};
use crate::pattern::Mode;

/// Logical output levels, `true` meaning active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    pub light: bool,
    pub fault_indicator: bool,
}

pub struct Dispatcher {
    /// Last mode that commanded the light. Dead-zone values leave it alone.
    mode: Option<Mode>,
    light: bool,
    // Counter values at the moment Flash or SOS was entered; patterns run
    // relative to these so they always start from their first window.
    pulse_origin: u16,
    flash_origin: u8,
}

impl Dispatcher {
    /// The light starts active, as driven during hardware init.
    pub const fn new() -> Self {
        Self {
            mode: None,
            light: true,
            pulse_origin: 0,
            flash_origin: 0,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn step(&mut self, snapshot: &Snapshot) -> Outputs {
        if !snapshot.measuring {
            self.evaluate(snapshot);
        }

        if snapshot.fault {
            Outputs {
                light: true,
                fault_indicator: true,
            }
        } else {
            Outputs {
                light: self.light,
                fault_indicator: false,
            }
        }
    }

    fn evaluate(&mut self, snapshot: &Snapshot) {
        let mode = Mode::from_value(snapshot.value);
        if mode == Mode::Undefined {
            return;
        }

        if self.mode != Some(mode) {
            match mode {
                Mode::Flash => self.flash_origin = snapshot.flash_tick,
                Mode::Sos => self.pulse_origin = snapshot.pulse_tick,
                _ => {}
            }
        }

        let pulse_phase = (snapshot.pulse_tick + PULSE_PERIOD - self.pulse_origin) % PULSE_PERIOD;
        let flash_phase = (snapshot.flash_tick + FLASH_PERIOD - self.flash_origin) % FLASH_PERIOD;
        if let Some(level) = mode.level(pulse_phase, flash_phase) {
            self.light = level;
        }
        self.mode = Some(mode);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
