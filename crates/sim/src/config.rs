// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::fault::Fault;
use crate::peripherals::gpio::REFERENCE_CONNECTED_MASK;
use anyhow::{Context, Result};
use bringup_selftest::board::{GPIO_ADDR, RAM_TEST_BASE, STATUS_UART_ADDR};
use bringup_selftest::ram::{OFFSET_SPAN, ONES_SPAN, ZERO_SPAN};
use bringup_selftest::Layout;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest RAM region the simulator will allocate.
pub const MAX_RAM_SIZE: u64 = 64 * 1024 * 1024;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_connected_mask() -> u32 {
    REFERENCE_CONNECTED_MASK
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RamConfig {
    pub base: u32,
    /// human-size notation: "4KB" and "4KiB" are 4096 bytes, "4kB" is 4000.
    pub size: String,
    /// Byte every RAM cell holds at power-up.
    #[serde(default)]
    pub fill: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GpioConfig {
    pub address: u32,
    #[serde(default = "default_connected_mask")]
    pub connected_mask: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UartConfig {
    pub address: u32,
}

/// Register map of a simulated SoC, plus the hardware faults to inject into it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SocConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub name: String,
    pub ram: RamConfig,
    pub gpio: GpioConfig,
    pub status_uart: UartConfig,
    #[serde(default)]
    pub faults: Vec<Fault>,
}

impl Default for SocConfig {
    /// The reference board.
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            name: "reference".to_string(),
            ram: RamConfig {
                base: RAM_TEST_BASE,
                size: "4KB".to_string(),
                fill: 0,
            },
            gpio: GpioConfig {
                address: GPIO_ADDR,
                connected_mask: REFERENCE_CONNECTED_MASK,
            },
            status_uart: UartConfig {
                address: STATUS_UART_ADDR,
            },
            faults: Vec::new(),
        }
    }
}

impl SocConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("Failed to open SoC config {:?}", path))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse SoC config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse SoC config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// The addresses the self-test is built against.
    pub fn layout(&self) -> Layout {
        Layout {
            ram_base: self.ram.base,
            gpio: self.gpio.address,
            status_uart: self.status_uart.address,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}' (expected 1.0)",
                self.schema_version
            );
        }
        let ram_size = parse_size(&self.ram.size)?;
        let window = ZERO_SPAN.max(ONES_SPAN).max(OFFSET_SPAN) as u64;
        if ram_size < window {
            anyhow::bail!(
                "RAM region of '{}' is {} bytes; the self-test needs at least {}",
                self.name,
                ram_size,
                window
            );
        }
        if ram_size > MAX_RAM_SIZE {
            anyhow::bail!(
                "RAM region of '{}' is {} bytes; the simulator allows at most {}",
                self.name,
                ram_size,
                MAX_RAM_SIZE
            );
        }
        if self.ram.base as u64 + ram_size > 1 << 32 {
            anyhow::bail!(
                "RAM region {:#010x}+{:#x} runs past the 32-bit address space",
                self.ram.base,
                ram_size
            );
        }
        if self.ram.base % 4 != 0 {
            anyhow::bail!("RAM base {:#010x} is not word aligned", self.ram.base);
        }
        for (name, addr) in [
            ("gpio", self.gpio.address),
            ("status_uart", self.status_uart.address),
        ] {
            if addr % 4 != 0 {
                anyhow::bail!("{} address {:#010x} is not word aligned", name, addr);
            }
        }
        Ok(())
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}
