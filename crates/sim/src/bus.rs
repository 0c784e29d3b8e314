// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::clock::SimClock;
use crate::config::{parse_size, SocConfig};
use crate::fault::FaultInjector;
use crate::memory::LinearMemory;
use crate::peripherals::gpio::GpioRegister;
use crate::peripherals::uart::StatusUart;
use crate::{Peripheral, SimError, SimResult};
use anyhow::Context;
use bringup_selftest::RegisterBus;
use std::sync::{Arc, Mutex};

pub struct PeripheralEntry {
    pub name: String,
    pub base: u32,
    pub size: u32,
    pub dev: Box<dyn Peripheral>,
}

impl PeripheralEntry {
    fn contains(&self, addr: u32) -> bool {
        addr >= self.base && (addr as u64) < self.base as u64 + self.size as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Read,
    Write,
}

/// One bus transaction as the CPU issued it (before any write redirection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Access {
    pub kind: AccessKind,
    pub address: u32,
    pub value: u32,
}

/// RAM plus memory-mapped devices, with optional fault injection.
pub struct SocBus {
    pub ram: LinearMemory,
    pub peripherals: Vec<PeripheralEntry>,
    pub faults: FaultInjector,
    trace: Vec<Access>,
    violations: Vec<SimError>,
}

impl SocBus {
    pub fn new(ram: LinearMemory) -> Self {
        Self {
            ram,
            peripherals: Vec::new(),
            faults: FaultInjector::default(),
            trace: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn from_config(config: &SocConfig, clock: SimClock) -> anyhow::Result<Self> {
        config
            .validate()
            .with_context(|| format!("Invalid SoC config '{}'", config.name))?;
        let ram_size = parse_size(&config.ram.size)
            .with_context(|| format!("Invalid RAM size for '{}'", config.name))?;

        let mut bus = Self::new(LinearMemory::filled(
            ram_size as usize,
            config.ram.base,
            config.ram.fill,
        ));
        bus.faults = FaultInjector::new(config.faults.clone());

        bus.attach(
            "gpio",
            config.gpio.address,
            4,
            Box::new(GpioRegister::new(config.gpio.connected_mask, clock)),
        )?;
        bus.attach(
            "status_uart",
            config.status_uart.address,
            4,
            Box::new(StatusUart::new()),
        )?;

        tracing::debug!(
            "Built SoC '{}': RAM {:#010x}+{:#x}, GPIO {:#010x}, status UART {:#010x}, {} fault(s)",
            config.name,
            config.ram.base,
            ram_size,
            config.gpio.address,
            config.status_uart.address,
            config.faults.len()
        );
        Ok(bus)
    }

    pub fn attach(
        &mut self,
        name: &str,
        base: u32,
        size: u32,
        dev: Box<dyn Peripheral>,
    ) -> SimResult<()> {
        let end = base as u64 + size as u64;
        if (base as u64) < self.ram.end_addr() && end > self.ram.base_addr as u64 {
            return Err(SimError::Overlap(name.to_string(), "ram".to_string()));
        }
        if let Some(other) = self
            .peripherals
            .iter()
            .find(|p| (base as u64) < p.base as u64 + p.size as u64 && end > p.base as u64)
        {
            return Err(SimError::Overlap(name.to_string(), other.name.clone()));
        }
        self.peripherals.push(PeripheralEntry {
            name: name.to_string(),
            base,
            size,
            dev,
        });
        Ok(())
    }

    pub fn peripheral<T: 'static>(&self, name: &str) -> Option<&T> {
        self.peripherals
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.dev.as_any())
            .and_then(|any| any.downcast_ref::<T>())
    }

    pub fn gpio(&self) -> Option<&GpioRegister> {
        self.peripheral::<GpioRegister>("gpio")
    }

    /// Attach a UART TX capture sink to any status UART on this bus.
    ///
    /// When `echo_stdout` is false, UART writes will no longer be printed to stdout.
    pub fn attach_uart_tx_sink(&mut self, sink: Arc<Mutex<Vec<u8>>>, echo_stdout: bool) {
        for p in &mut self.peripherals {
            let Some(any) = p.dev.as_any_mut() else {
                continue;
            };
            let Some(uart) = any.downcast_mut::<StatusUart>() else {
                continue;
            };
            uart.set_sink(Some(sink.clone()), echo_stdout);
        }
    }

    pub fn trace(&self) -> &[Access] {
        &self.trace
    }

    pub fn violations(&self) -> &[SimError] {
        &self.violations
    }

    fn load(&mut self, addr: u32) -> SimResult<u32> {
        if addr % 4 != 0 {
            return Err(SimError::Misaligned(addr));
        }
        if let Some(value) = self.ram.read_u32(addr) {
            return Ok(value);
        }
        match self.peripherals.iter_mut().find(|p| p.contains(addr)) {
            Some(p) => p.dev.read(addr - p.base),
            None => Err(SimError::Unmapped(addr)),
        }
    }

    fn store(&mut self, addr: u32, value: u32) -> SimResult<()> {
        if addr % 4 != 0 {
            return Err(SimError::Misaligned(addr));
        }
        if self.ram.write_u32(addr, value) {
            return Ok(());
        }
        match self.peripherals.iter_mut().find(|p| p.contains(addr)) {
            Some(p) => p.dev.write(addr - p.base, value),
            None => Err(SimError::Unmapped(addr)),
        }
    }

    fn record_violation(&mut self, err: SimError) {
        tracing::warn!("{}", err);
        self.violations.push(err);
    }
}

impl RegisterBus for SocBus {
    fn read_word(&mut self, address: u32) -> u32 {
        let stored = match self.load(address) {
            Ok(value) => value,
            Err(e) => {
                self.record_violation(e);
                0
            }
        };
        let value = self.faults.filter_read(address, stored);
        tracing::trace!("read  {:#010x} -> {:#010x}", address, value);
        self.trace.push(Access {
            kind: AccessKind::Read,
            address,
            value,
        });
        value
    }

    fn write_word(&mut self, address: u32, value: u32) {
        tracing::trace!("write {:#010x} <- {:#010x}", address, value);
        self.trace.push(Access {
            kind: AccessKind::Write,
            address,
            value,
        });
        let target = self.faults.route_write(address);
        if let Err(e) = self.store(target, value) {
            self.record_violation(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Fault;

    fn reference_bus() -> SocBus {
        SocBus::from_config(&SocConfig::default(), SimClock::new()).unwrap()
    }

    #[test]
    fn test_routes_ram_and_gpio() {
        let mut bus = reference_bus();
        let cfg = SocConfig::default();

        bus.write_word(cfg.ram.base + 8, 0xCAFE_F00D);
        assert_eq!(bus.read_word(cfg.ram.base + 8), 0xCAFE_F00D);

        bus.write_word(cfg.gpio.address, 0x04);
        assert_eq!(bus.read_word(cfg.gpio.address), 0x04);
        assert_eq!(bus.gpio().unwrap().output(), 0x04);
        assert!(bus.violations().is_empty());
        assert_eq!(bus.trace().len(), 4);
    }

    #[test]
    fn test_oversized_ram_fails_before_allocating() {
        let mut cfg = SocConfig::default();
        cfg.ram.size = "2TB".to_string();
        cfg.ram.fill = 0xAA;
        let err = SocBus::from_config(&cfg, SimClock::new()).err().unwrap();
        assert!(format!("{:#}", err).contains("at most"));
    }

    #[test]
    fn test_unmapped_and_misaligned_are_recorded() {
        let mut bus = reference_bus();
        assert_eq!(bus.read_word(0x4000_0000), 0);
        bus.write_word(0x0002_0002, 1);
        assert_eq!(
            bus.violations(),
            &[
                SimError::Unmapped(0x4000_0000),
                SimError::Misaligned(0x0002_0002)
            ]
        );
    }

    #[test]
    fn test_overlapping_device_is_rejected() {
        let mut bus = reference_bus();
        let err = bus
            .attach(
                "shadow",
                SocConfig::default().gpio.address,
                4,
                Box::new(StatusUart::new()),
            )
            .unwrap_err();
        assert_eq!(err, SimError::Overlap("shadow".into(), "gpio".into()));
    }

    #[test]
    fn test_alias_fault_leaves_original_cell_stale() {
        let mut bus = reference_bus();
        let base = SocConfig::default().ram.base;
        bus.faults = FaultInjector::new(vec![Fault::Alias {
            address: base + 0x10,
            target: base,
        }]);
        bus.write_word(base + 0x10, 0x10);
        assert_eq!(bus.read_word(base), 0x10);
        assert_ne!(bus.read_word(base + 0x10), 0x10);
    }

    #[test]
    fn test_uart_sink_captures_status_bytes() {
        let mut bus = reference_bus();
        let sink = Arc::new(Mutex::new(Vec::new()));
        bus.attach_uart_tx_sink(sink.clone(), false);
        let tx = SocConfig::default().status_uart.address;
        for b in b"OK\n" {
            bus.write_word(tx, *b as u32);
        }
        assert_eq!(sink.lock().unwrap().as_slice(), b"OK\n");
    }
}
