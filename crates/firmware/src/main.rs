// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#![no_std]
#![no_main]

use bringup_selftest::{Delay, GpioVerifier, Mmio, RamVerifier, SelfTest, SOC};
use panic_halt as _;
use riscv_rt::entry;

/// One `nop` per iteration.
struct NopDelay;

impl Delay for NopDelay {
    fn spin(&mut self, iterations: u32) {
        for _ in 0..iterations {
            riscv::asm::nop();
        }
    }
}

#[entry]
fn main() -> ! {
    // SAFETY: single hart, and nothing else in this image touches the
    // scratch window or the GPIO register.
    let bus = unsafe { Mmio::new() };

    let gpio = GpioVerifier::new(SOC.gpio).with_fault_probe(cfg!(feature = "gpio-fault-probe"));

    SelfTest::with_verifiers(bus, NopDelay, RamVerifier::new(SOC.ram_base), gpio).run()
}
