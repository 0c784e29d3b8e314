// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Textual status protocol shared with the instruction-set conformance tests.
//!
//! Each byte goes out as its own 32-bit store to the pseudo-UART transmit
//! register. A test prints its name and `".."`, then either `"OK\n"` and
//! returns, or `"ERROR\n"` followed by a blink that never ends.

use crate::signal::{BlinkPattern, SignalDriver};
use crate::{Delay, Layout, RegisterBus};

pub const PASS_TEXT: &[u8] = b"OK\n";
pub const FAIL_TEXT: &[u8] = b"ERROR\n";
pub const NAME_SUFFIX: &[u8] = b"..";

/// The conformance harness keeps the upper GPIO bits set while it blinks bit 0.
pub const HARNESS_FAIL_BLINK: BlinkPattern = BlinkPattern {
    high: 0x29,
    low: 0x28,
    high_iterations: 10,
    low_iterations: 1000,
};

pub struct StatusPort<'a, B: ?Sized> {
    bus: &'a mut B,
    tx: u32,
}

impl<'a, B: RegisterBus + ?Sized> StatusPort<'a, B> {
    pub fn new(bus: &'a mut B, tx: u32) -> Self {
        Self { bus, tx }
    }

    pub fn put(&mut self, byte: u8) {
        self.bus.write_word(self.tx, byte as u32);
    }

    pub fn write_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put(byte);
        }
    }

    /// Test name up to its first NUL, then `".."`.
    pub fn announce(&mut self, name: &str) {
        for byte in name.bytes().take_while(|&b| b != 0) {
            self.put(byte);
        }
        self.write_all(NAME_SUFFIX);
    }

    pub fn pass(&mut self) {
        self.write_all(PASS_TEXT);
    }

    pub fn fail(&mut self) {
        self.write_all(FAIL_TEXT);
    }
}

/// Status reporting plus the terminal blink of the conformance harness.
pub struct Harness<B, D> {
    bus: B,
    delay: D,
    layout: Layout,
}

impl<B: RegisterBus, D: Delay> Harness<B, D> {
    pub fn new(bus: B, delay: D, layout: Layout) -> Self {
        Self { bus, delay, layout }
    }

    pub fn status(&mut self) -> StatusPort<'_, B> {
        StatusPort::new(&mut self.bus, self.layout.status_uart)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Announces `name`, runs `test`, and reports the verdict. Returns only on pass.
    pub fn run_test<F>(&mut self, name: &str, test: F) -> Result<(), SignalDriver<'_, B, D>>
    where
        F: FnOnce(&mut B) -> bool,
    {
        self.status().announce(name);
        if test(&mut self.bus) {
            self.status().pass();
            Ok(())
        } else {
            Err(self.fail())
        }
    }

    /// Prints `"ERROR\n"` and hands back the fail blink.
    pub fn fail(&mut self) -> SignalDriver<'_, B, D> {
        self.status().fail();
        SignalDriver::new(
            &mut self.bus,
            &mut self.delay,
            self.layout.gpio,
            HARNESS_FAIL_BLINK,
        )
    }
}
