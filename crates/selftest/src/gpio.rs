// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{round_trip, Check, CheckResult, RegisterBus};

/// Values written to the GPIO register, in order.
pub const GPIO_SEQUENCE: [u32; 5] = [0x00, 0x02, 0x04, 0x08, 0x10];

/// Bit 7 has no pin behind it on the reference board, so this value is
/// expected to fail there. Only useful for checking that a failure really
/// reaches the fail signal.
pub const GPIO_FAULT_PROBE: u32 = 0x80;

/// GPIO output register round-trip check.
#[derive(Debug, Clone, Copy)]
pub struct GpioVerifier {
    register: u32,
    fault_probe: bool,
}

impl GpioVerifier {
    pub const fn new(register: u32) -> Self {
        Self {
            register,
            fault_probe: false,
        }
    }

    /// Appends [`GPIO_FAULT_PROBE`] to the sequence.
    pub const fn with_fault_probe(mut self, enabled: bool) -> Self {
        self.fault_probe = enabled;
        self
    }

    pub fn register(&self) -> u32 {
        self.register
    }

    pub fn fault_probe(&self) -> bool {
        self.fault_probe
    }

    pub fn values(&self) -> impl Iterator<Item = u32> {
        let extra = if self.fault_probe {
            Some(GPIO_FAULT_PROBE)
        } else {
            None
        };
        GPIO_SEQUENCE.into_iter().chain(extra)
    }

    /// Writes each value and reads it straight back, stopping at the first
    /// mismatch. On success the register holds the last value written.
    pub fn verify<B: RegisterBus + ?Sized>(&self, bus: &mut B) -> CheckResult {
        trace_event!(debug, register = format_args!("{:#010x}", self.register), "gpio check");
        for value in self.values() {
            round_trip(bus, Check::Gpio, self.register, value)?;
        }
        Ok(())
    }
}
