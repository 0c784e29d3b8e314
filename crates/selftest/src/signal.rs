// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Terminal pass/fail blink.

use crate::{Delay, RegisterBus};

pub const LED_ON: u32 = 0x01;
pub const LED_OFF: u32 = 0x00;

/// GPIO levels and busy-wait lengths of one blink period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct BlinkPattern {
    pub high: u32,
    pub low: u32,
    pub high_iterations: u32,
    pub low_iterations: u32,
}

/// Even 50% duty cycle.
pub const PASS_BLINK: BlinkPattern = BlinkPattern {
    high: LED_ON,
    low: LED_OFF,
    high_iterations: 100,
    low_iterations: 100,
};

/// Short flash, long dark: 1:100.
pub const FAIL_BLINK: BlinkPattern = BlinkPattern {
    high: LED_ON,
    low: LED_OFF,
    high_iterations: 10,
    low_iterations: 1000,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum SignalMode {
    Pass,
    Fail,
}

impl SignalMode {
    pub const fn pattern(self) -> BlinkPattern {
        match self {
            SignalMode::Pass => PASS_BLINK,
            SignalMode::Fail => FAIL_BLINK,
        }
    }
}

/// Owns the GPIO register once the self-test is over.
pub struct SignalDriver<'a, B: ?Sized, D: ?Sized> {
    bus: &'a mut B,
    delay: &'a mut D,
    register: u32,
    pattern: BlinkPattern,
}

impl<'a, B: RegisterBus + ?Sized, D: Delay + ?Sized> SignalDriver<'a, B, D> {
    pub fn new(bus: &'a mut B, delay: &'a mut D, register: u32, pattern: BlinkPattern) -> Self {
        Self {
            bus,
            delay,
            register,
            pattern,
        }
    }

    pub fn pattern(&self) -> BlinkPattern {
        self.pattern
    }

    /// One high period followed by one low period.
    pub fn cycle(&mut self) {
        self.bus.write_word(self.register, self.pattern.high);
        self.delay.spin(self.pattern.high_iterations);
        self.bus.write_word(self.register, self.pattern.low);
        self.delay.spin(self.pattern.low_iterations);
    }

    /// Blinks until power is removed.
    pub fn run(mut self) -> ! {
        trace_event!(info, pattern = ?self.pattern, "entering signal loop");
        loop {
            self.cycle();
        }
    }
}
