// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bring-up self-test for a small RISC-V SoC.
//!
//! The sequence checks a RAM window and the GPIO output register through a
//! [`RegisterBus`], then hands the GPIO register to a [`SignalDriver`] that
//! blinks a pass or fail pattern forever. On target the bus is volatile MMIO
//! ([`Mmio`]); on the host the same code runs against a simulated SoC.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

/// Emits a `tracing` event when the `std` feature is on; compiles to nothing otherwise.
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "std")]
        tracing::$level!($($arg)+);
    };
}

pub mod board;
pub mod conformance;
pub mod delay;
pub mod gpio;
pub mod mmio;
pub mod ram;
pub mod runner;
pub mod signal;

pub use board::{Layout, SOC};
pub use delay::Delay;
pub use gpio::GpioVerifier;
pub use mmio::{Mmio, RegisterBus};
pub use ram::{Pattern, RamVerifier};
pub use runner::{SelfTest, State};
pub use signal::{BlinkPattern, SignalDriver, SignalMode};

use core::fmt;

/// Which check observed a bad read-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Check {
    Ram(Pattern),
    Gpio,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Ram(pattern) => write!(f, "ram/{}", pattern),
            Check::Gpio => f.write_str("gpio"),
        }
    }
}

/// A register that did not read back what was written to it.
///
/// This is the only failure the self-test knows about. It is always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(thiserror::Error, serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(
    feature = "std",
    error("{check} mismatch at {address:#010x}: wrote {expected:#010x}, read back {observed:#010x}")
)]
pub struct Mismatch {
    pub check: Check,
    pub address: u32,
    pub expected: u32,
    pub observed: u32,
}

pub type CheckResult = Result<(), Mismatch>;

/// Writes `expected` to `address` and reads it straight back.
pub(crate) fn round_trip<B: RegisterBus + ?Sized>(
    bus: &mut B,
    check: Check,
    address: u32,
    expected: u32,
) -> CheckResult {
    bus.write_word(address, expected);
    let observed = bus.read_word(address);
    if observed == expected {
        Ok(())
    } else {
        trace_event!(
            warn,
            %check,
            address = format_args!("{:#010x}", address),
            expected = format_args!("{:#010x}", expected),
            observed = format_args!("{:#010x}", observed),
            "read-back mismatch"
        );
        Err(Mismatch {
            check,
            address,
            expected,
            observed,
        })
    }
}
