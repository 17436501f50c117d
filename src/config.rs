//! Protocol and timing constants shared by the firmware and the tests.

/// Pulse timer rate. Prescaled so a 1.0..2.0 ms servo pulse reads 75..150.
pub const PULSE_TIMER_HZ: u32 = 75_000;

/// Decoded value at power-on. Lies in the Off range.
pub const INITIAL_VALUE: u8 = 82;

/// Decoded value substituted after a measurement timeout. Lies in the On range.
pub const FALLBACK_VALUE: u8 = 97;

/// Period of the pulse counter, long enough for one full SOS sequence.
pub const PULSE_PERIOD: u16 = 272;

/// Period of the flash counter.
pub const FLASH_PERIOD: u8 = 34;

/// Blink square wave: active for the first half of every 16 pulses.
pub const BLINK_PERIOD: u16 = 16;
pub const BLINK_ACTIVE: u16 = 8;

/// Prescaler that brings an APB1 timer to [`PULSE_TIMER_HZ`].
///
/// Timers on APB1 run at twice `pclk1` whenever the bus is divided.
pub const fn pulse_timer_prescaler(pclk1_hz: u32, ppre1: u8) -> u16 {
    let timclk = if ppre1 == 1 { pclk1_hz } else { pclk1_hz * 2 };
    (timclk / PULSE_TIMER_HZ - 1) as u16
}

/// Independent watchdog period.
pub const WATCHDOG_TIMEOUT_MS: u32 = 500;

// Command ranges, exclusive on both ends. Values on a boundary select nothing.
pub const OFF_RANGE: (u8, u8) = (75, 90);
pub const ON_RANGE: (u8, u8) = (90, 105);
pub const BLINK_RANGE: (u8, u8) = (105, 120);
pub const FLASH_RANGE: (u8, u8) = (120, 135);
pub const SOS_RANGE: (u8, u8) = (135, 150);
