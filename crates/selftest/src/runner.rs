// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::signal::{SignalDriver, SignalMode};
use crate::{CheckResult, Delay, GpioVerifier, Layout, Mismatch, RamVerifier, RegisterBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum State {
    Running,
    PassSignal,
    FailSignal,
}

impl State {
    pub fn is_terminal(self) -> bool {
        !matches!(self, State::Running)
    }

    pub fn mode(self) -> Option<SignalMode> {
        match self {
            State::Running => None,
            State::PassSignal => Some(SignalMode::Pass),
            State::FailSignal => Some(SignalMode::Fail),
        }
    }
}

/// RAM check, then GPIO check, then blink forever.
///
/// Terminal states are sticky: once the checks have produced
/// [`State::PassSignal`] or [`State::FailSignal`] they are never rerun.
pub struct SelfTest<B, D> {
    bus: B,
    delay: D,
    ram: RamVerifier,
    gpio: GpioVerifier,
    state: State,
    fault: Option<Mismatch>,
}

impl<B: RegisterBus, D: Delay> SelfTest<B, D> {
    pub fn new(bus: B, delay: D, layout: &Layout) -> Self {
        Self::with_verifiers(
            bus,
            delay,
            RamVerifier::new(layout.ram_base),
            GpioVerifier::new(layout.gpio),
        )
    }

    pub fn with_verifiers(bus: B, delay: D, ram: RamVerifier, gpio: GpioVerifier) -> Self {
        Self {
            bus,
            delay,
            ram,
            gpio,
            state: State::Running,
            fault: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The mismatch that sent the sequence to [`State::FailSignal`].
    pub fn fault(&self) -> Option<Mismatch> {
        self.fault
    }

    pub fn ram(&self) -> &RamVerifier {
        &self.ram
    }

    pub fn gpio(&self) -> &GpioVerifier {
        &self.gpio
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn parts_mut(&mut self) -> (&mut B, &mut D) {
        (&mut self.bus, &mut self.delay)
    }

    /// Runs the checks if they have not run yet and returns the terminal state.
    pub fn verify(&mut self) -> State {
        if !self.state.is_terminal() {
            self.state = match self.checks() {
                Ok(()) => State::PassSignal,
                Err(mismatch) => {
                    self.fault = Some(mismatch);
                    State::FailSignal
                }
            };
            trace_event!(info, state = ?self.state, "self-test finished");
        }
        self.state
    }

    fn checks(&mut self) -> CheckResult {
        self.ram.verify(&mut self.bus)?;
        self.gpio.verify(&mut self.bus)
    }

    /// Signal driver for the terminal state, verifying first if needed.
    pub fn signal(&mut self) -> SignalDriver<'_, B, D> {
        let mode = match self.verify() {
            State::FailSignal => SignalMode::Fail,
            _ => SignalMode::Pass,
        };
        SignalDriver::new(
            &mut self.bus,
            &mut self.delay,
            self.gpio.register(),
            mode.pattern(),
        )
    }

    /// Boot entry: check, then blink forever.
    pub fn run(mut self) -> ! {
        self.signal().run()
    }
}
