// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::clock::SimClock;
use crate::SimResult;

/// Default wiring of the reference board: pins 0-6 bonded out, pin 7 floating.
pub const REFERENCE_CONNECTED_MASK: u32 = 0x0000_007F;

/// A GPIO write and the tick it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GpioEvent {
    pub tick: u64,
    pub value: u32,
}

/// Single 32-bit output register. Bits without a pin behind them read back as 0.
#[derive(Debug, serde::Serialize)]
pub struct GpioRegister {
    output: u32,
    connected_mask: u32,
    #[serde(skip)]
    events: Vec<GpioEvent>,
    #[serde(skip)]
    clock: SimClock,
}

impl GpioRegister {
    pub fn new(connected_mask: u32, clock: SimClock) -> Self {
        Self {
            output: 0,
            connected_mask,
            events: Vec::new(),
            clock,
        }
    }

    /// Last value written, including bits that do not read back.
    pub fn output(&self) -> u32 {
        self.output
    }

    pub fn connected_mask(&self) -> u32 {
        self.connected_mask
    }

    pub fn events(&self) -> &[GpioEvent] {
        &self.events
    }
}

impl crate::Peripheral for GpioRegister {
    fn read(&mut self, offset: u32) -> SimResult<u32> {
        Ok(match offset {
            0x0 => self.output & self.connected_mask,
            _ => 0,
        })
    }

    fn write(&mut self, offset: u32, value: u32) -> SimResult<()> {
        if offset == 0x0 {
            self.output = value;
            self.events.push(GpioEvent {
                tick: self.clock.now(),
                value,
            });
        }
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn std::any::Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        Some(self)
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
