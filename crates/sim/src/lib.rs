// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bus;
pub mod clock;
pub mod config;
pub mod fault;
pub mod harness;
pub mod memory;
pub mod observer;
pub mod peripherals;

use std::any::Any;

pub use bus::SocBus;
pub use clock::SimClock;
pub use config::SocConfig;
pub use harness::{run, RunOptions, RunReport};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("Unmapped access at {0:#010x}")]
    Unmapped(u32),
    #[error("Misaligned word access at {0:#010x}")]
    Misaligned(u32),
    #[error("Region '{0}' overlaps region '{1}'")]
    Overlap(String, String),
}

pub type SimResult<T> = Result<T, SimError>;

/// A word-addressed device on the simulated bus.
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&mut self, offset: u32) -> SimResult<u32>;
    fn write(&mut self, offset: u32, value: u32) -> SimResult<()>;
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}
