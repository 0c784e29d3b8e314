// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Reference board memory map.

/// Physical addresses the self-test touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// First word of the RAM window under test.
    pub ram_base: u32,
    /// GPIO output register.
    pub gpio: u32,
    /// Pseudo-UART transmit register used by the conformance status protocol.
    pub status_uart: u32,
}

// Scratch RAM outside every linker section; see `crates/firmware/memory.x`.
pub const RAM_TEST_BASE: u32 = 0x0002_0000;
pub const GPIO_ADDR: u32 = 0x2000_0000;
pub const STATUS_UART_ADDR: u32 = 0x2000_000C;

pub const SOC: Layout = Layout {
    ram_base: RAM_TEST_BASE,
    gpio: GPIO_ADDR,
    status_uart: STATUS_UART_ADDR,
};

impl Default for Layout {
    fn default() -> Self {
        SOC
    }
}
