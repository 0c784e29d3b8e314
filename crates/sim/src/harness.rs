// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Runs the real self-test against a simulated SoC.
//!
//! The signal loop on target never ends; here it is driven for a fixed number
//! of blink cycles and then measured.

use crate::bus::SocBus;
use crate::clock::SimClock;
use crate::config::SocConfig;
use crate::observer::{measure, BlinkMeasurement};
use bringup_selftest::conformance::Harness;
use bringup_selftest::{
    BlinkPattern, Delay, GpioVerifier, Mismatch, RamVerifier, RegisterBus, SelfTest, SignalDriver,
    State,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub const DEFAULT_TEST_NAME: &str = "selftest";

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Blink cycles to drive after the checks.
    pub cycles: u32,
    /// Append 0x80 to the GPIO sequence.
    pub gpio_fault_probe: bool,
    /// Report through the conformance status protocol on the pseudo-UART.
    pub status_uart: bool,
    /// Echo status UART bytes to stdout.
    pub echo_uart: bool,
    pub test_name: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cycles: 4,
            gpio_fault_probe: false,
            status_uart: false,
            echo_uart: false,
            test_name: DEFAULT_TEST_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub soc: String,
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<Mismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// GPIO output the moment the signal driver took over.
    pub gpio_before_signal: Option<u32>,
    pub signal: BlinkPattern,
    pub blink: BlinkMeasurement,
    pub uart: String,
    pub accesses: usize,
    pub faults_fired: u64,
    pub violations: Vec<String>,
    /// Final state of every device on the bus, by name.
    pub peripherals: serde_json::Map<String, serde_json::Value>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.state == State::PassSignal
    }
}

fn drive<B, D>(mut driver: SignalDriver<'_, B, D>, cycles: u32) -> BlinkPattern
where
    B: RegisterBus + ?Sized,
    D: Delay + ?Sized,
{
    for _ in 0..cycles {
        driver.cycle();
    }
    driver.pattern()
}

pub fn run(config: &SocConfig, options: &RunOptions) -> anyhow::Result<RunReport> {
    let layout = config.layout();
    let clock = SimClock::new();

    let mut bus = SocBus::from_config(config, clock.clone())?;
    let uart = Arc::new(Mutex::new(Vec::new()));
    bus.attach_uart_tx_sink(uart.clone(), options.echo_uart);

    let mut test = SelfTest::with_verifiers(
        bus,
        clock.clone(),
        RamVerifier::new(layout.ram_base),
        GpioVerifier::new(layout.gpio).with_fault_probe(options.gpio_fault_probe),
    );

    if options.status_uart {
        let (bus, delay) = test.parts_mut();
        Harness::new(bus, delay, layout)
            .status()
            .announce(&options.test_name);
    }

    let state = test.verify();
    let mismatch = test.fault();
    match &mismatch {
        None => info!("Self-test passed on '{}'", config.name),
        Some(m) => warn!("Self-test failed on '{}': {}", config.name, m),
    }

    let gpio_before_signal = test.bus().gpio().map(|g| g.output());
    let signal_start = test.bus().gpio().map_or(0, |g| g.events().len());

    let signal = if options.status_uart {
        let (bus, delay) = test.parts_mut();
        let mut harness = Harness::new(bus, delay, layout);
        if state == State::PassSignal {
            harness.status().pass();
            drive(test.signal(), options.cycles)
        } else {
            drive(harness.fail(), options.cycles)
        }
    } else {
        drive(test.signal(), options.cycles)
    };

    let bus = test.bus();
    let blink = bus
        .gpio()
        .map(|g| measure(&g.events()[signal_start..], clock.now()))
        .unwrap_or_default();

    let uart = uart
        .lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    Ok(RunReport {
        soc: config.name.clone(),
        state,
        message: mismatch.map(|m| m.to_string()),
        mismatch,
        gpio_before_signal,
        signal,
        blink,
        uart,
        accesses: bus.trace().len(),
        faults_fired: bus.faults.fired(),
        violations: bus.violations().iter().map(|v| v.to_string()).collect(),
        peripherals: bus
            .peripherals
            .iter()
            .map(|p| (p.name.clone(), p.dev.snapshot()))
            .collect(),
    })
}
