// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// 32-bit register access at fixed physical addresses.
///
/// Implementations must perform every access in program order: no caching,
/// merging or elision. The pin state and the RAM cells only change when a
/// write actually reaches the bus.
pub trait RegisterBus {
    fn read_word(&mut self, address: u32) -> u32;
    fn write_word(&mut self, address: u32, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read_word(&mut self, address: u32) -> u32 {
        (**self).read_word(address)
    }

    fn write_word(&mut self, address: u32, value: u32) {
        (**self).write_word(address, value)
    }
}

/// Volatile memory-mapped I/O on the physical address space.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus`] must be a valid, 4-byte
    /// aligned device or RAM location that nothing else in the program is
    /// using for the lifetime of this value.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read_word(&mut self, address: u32) -> u32 {
        // SAFETY: upheld by the contract of `Mmio::new`.
        unsafe { core::ptr::read_volatile(address as usize as *const u32) }
    }

    #[inline(always)]
    fn write_word(&mut self, address: u32, value: u32) {
        // SAFETY: upheld by the contract of `Mmio::new`.
        unsafe { core::ptr::write_volatile(address as usize as *mut u32, value) }
    }
}

