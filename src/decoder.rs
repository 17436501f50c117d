//! Pulse-width decoding.
//!
//! The input interrupt fires on both edges. The rising edge starts the pulse
//! timer, the falling edge stops it and publishes the count. If the falling
//! edge never comes the timer overflows and the decoder substitutes
//! [`FALLBACK_VALUE`] and raises the fault.

use crate::channel::ChannelWriter;
use crate::config::FALLBACK_VALUE;

/// The hardware counter that measures a pulse.
///
/// Only runs while a measurement is in progress, so its overflow event can
/// never coincide with an edge event.
pub trait PulseTimer {
    fn start(&mut self);
    fn stop(&mut self);
    /// Current count. The timer counts through the 8-bit range and raises
    /// its overflow event when the count wraps back to 0.
    fn count(&self) -> u8;
    fn reset(&mut self);
    /// Clear the pending overflow event.
    fn acknowledge_overflow(&mut self) {}

    fn stop_and_read(&mut self) -> u8 {
        self.stop();
        self.count()
    }
}

pub struct Decoder<'a, T> {
    timer: T,
    channel: ChannelWriter<'a>,
}

impl<'a, T: PulseTimer> Decoder<'a, T> {
    pub fn new(timer: T, channel: ChannelWriter<'a>) -> Self {
        Self { timer, channel }
    }

    /// Called once per level change of the input line.
    pub fn on_edge(&mut self) {
        if self.channel.is_measuring() {
            let width = self.timer.stop_and_read();
            self.timer.reset();
            self.channel.finish_measurement(width);
        } else {
            self.timer.start();
            self.channel.begin_measurement();
        }
        self.channel.clear_fault();
    }

    /// Called from the pulse timer's overflow event.
    pub fn on_timeout(&mut self) {
        self.timer.acknowledge_overflow();
        self.timer.stop();
        self.timer.reset();
        self.channel.abort_measurement(FALLBACK_VALUE);
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
