//! State shared between the interrupt handlers and the idle loop.
//!
//! Every field is a single atomic cell, so no read or write can be torn by a
//! preempting interrupt. Ownership is split at start-up: the decoder gets the
//! only [`ChannelWriter`], the idle loop gets the only [`ChannelReader`].

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use crate::config::{FLASH_PERIOD, INITIAL_VALUE, PULSE_PERIOD};
use crate::error::DecodeError;

pub struct ChannelState {
    value: AtomicU8,
    measuring: AtomicBool,
    fault: AtomicBool,
    pulse_tick: AtomicU16,
    flash_tick: AtomicU8,
}

impl ChannelState {
    pub const fn new() -> Self {
        Self {
            value: AtomicU8::new(INITIAL_VALUE),
            measuring: AtomicBool::new(false),
            fault: AtomicBool::new(false),
            pulse_tick: AtomicU16::new(0),
            flash_tick: AtomicU8::new(0),
        }
    }

    /// Hand out the write and read sides. The mutable borrow guarantees there
    /// is exactly one of each for as long as the handles live.
    pub fn split(&mut self) -> (ChannelWriter<'_>, ChannelReader<'_>) {
        let state: &Self = self;
        (ChannelWriter { state }, ChannelReader { state })
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side, owned by the decoder.
pub struct ChannelWriter<'a> {
    state: &'a ChannelState,
}

impl ChannelWriter<'_> {
    pub fn is_measuring(&self) -> bool {
        self.state.measuring.load(Ordering::Acquire)
    }

    /// Rising edge: mark the value as in flux and advance both counters.
    pub fn begin_measurement(&mut self) {
        let state = self.state;
        state.measuring.store(true, Ordering::Release);

        let pulse = state.pulse_tick.load(Ordering::Relaxed);
        state
            .pulse_tick
            .store((pulse + 1) % PULSE_PERIOD, Ordering::Relaxed);

        let flash = state.flash_tick.load(Ordering::Relaxed);
        state
            .flash_tick
            .store((flash + 1) % FLASH_PERIOD, Ordering::Relaxed);
    }

    /// Falling edge: publish the measured width.
    pub fn finish_measurement(&mut self, value: u8) {
        self.state.value.store(value, Ordering::Relaxed);
        self.state.measuring.store(false, Ordering::Release);
    }

    /// Timer overflow: publish the substitute value and raise the fault.
    pub fn abort_measurement(&mut self, fallback: u8) {
        self.state.value.store(fallback, Ordering::Relaxed);
        self.state.measuring.store(false, Ordering::Release);
        self.state.fault.store(true, Ordering::Relaxed);
    }

    pub fn clear_fault(&mut self) {
        self.state.fault.store(false, Ordering::Relaxed);
    }
}

/// Read side, owned by the idle loop.
pub struct ChannelReader<'a> {
    state: &'a ChannelState,
}

impl ChannelReader<'_> {
    /// Read all cells with interrupts masked so the copy is coherent.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state;
        critical_section::with(|_| Snapshot {
            value: state.value.load(Ordering::Relaxed),
            measuring: state.measuring.load(Ordering::Acquire),
            fault: state.fault.load(Ordering::Relaxed),
            pulse_tick: state.pulse_tick.load(Ordering::Relaxed),
            flash_tick: state.flash_tick.load(Ordering::Relaxed),
        })
    }
}

/// A coherent copy of the channel state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Last measured pulse width, in pulse timer ticks.
    pub value: u8,
    /// `value` is stale while this is set.
    pub measuring: bool,
    pub fault: bool,
    /// Completed pulses modulo [`PULSE_PERIOD`].
    pub pulse_tick: u16,
    /// Completed pulses modulo [`FLASH_PERIOD`].
    pub flash_tick: u8,
}

impl Snapshot {
    pub fn error(&self) -> Option<DecodeError> {
        self.fault.then_some(DecodeError::Timeout)
    }
}
