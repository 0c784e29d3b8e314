// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Reads the blink back off the GPIO pin the way a person with a stopwatch would.

use crate::peripherals::gpio::GpioEvent;
use bringup_selftest::SignalMode;
use serde::Serialize;

/// Pin the diagnostic LED is wired to.
pub const LED_PIN_MASK: u32 = 0x1;

/// A fail blink stays dark at least this many times longer than it is lit.
pub const FAIL_RATIO: u64 = 10;

/// Average lit and dark time of the LED over the observed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BlinkMeasurement {
    /// Rising edges seen.
    pub cycles: u32,
    pub high_ticks: u64,
    pub low_ticks: u64,
    pub mode: Option<SignalMode>,
}

/// Measures LED timing from `events`, with `end` closing the last interval.
pub fn measure(events: &[GpioEvent], end: u64) -> BlinkMeasurement {
    let mut high = (0u64, 0u64); // (ticks, intervals)
    let mut low = (0u64, 0u64);
    let mut cycles = 0u32;
    let mut previous: Option<bool> = None;

    for (i, event) in events.iter().enumerate() {
        let lit = event.value & LED_PIN_MASK != 0;
        if lit && previous != Some(true) {
            cycles += 1;
        }
        previous = Some(lit);

        let until = events.get(i + 1).map_or(end, |next| next.tick);
        let span = until.saturating_sub(event.tick);
        let slot = if lit { &mut high } else { &mut low };
        slot.0 += span;
        slot.1 += 1;
    }

    let high_ticks = high.0.checked_div(high.1).unwrap_or(0);
    let low_ticks = low.0.checked_div(low.1).unwrap_or(0);

    BlinkMeasurement {
        cycles,
        high_ticks,
        low_ticks,
        mode: classify(high_ticks, low_ticks),
    }
}

/// Equal halves read as pass; a brief flash with a long dark gap reads as fail.
pub fn classify(high_ticks: u64, low_ticks: u64) -> Option<SignalMode> {
    if high_ticks == 0 || low_ticks == 0 {
        None
    } else if high_ticks == low_ticks {
        Some(SignalMode::Pass)
    } else if low_ticks >= high_ticks * FAIL_RATIO {
        Some(SignalMode::Fail)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(tick: u64, value: u32) -> GpioEvent {
        GpioEvent { tick, value }
    }

    #[test]
    fn test_symmetric_blink_is_pass() {
        let events = [ev(0, 1), ev(100, 0), ev(200, 1), ev(300, 0)];
        let m = measure(&events, 400);
        assert_eq!(m.cycles, 2);
        assert_eq!(m.high_ticks, 100);
        assert_eq!(m.low_ticks, 100);
        assert_eq!(m.mode, Some(SignalMode::Pass));
    }

    #[test]
    fn test_short_flash_long_dark_is_fail() {
        let events = [ev(0, 0x29), ev(10, 0x28), ev(1010, 0x29), ev(1020, 0x28)];
        let m = measure(&events, 2020);
        assert_eq!(m.high_ticks, 10);
        assert_eq!(m.low_ticks, 1000);
        assert_eq!(m.mode, Some(SignalMode::Fail));
    }

    #[test]
    fn test_nothing_observed() {
        let m = measure(&[], 0);
        assert_eq!(m, BlinkMeasurement::default());
        assert_eq!(classify(100, 300), None);
    }
}
