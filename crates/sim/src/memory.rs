// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// A simple flat little-endian memory.
#[derive(Debug)]
pub struct LinearMemory {
    pub data: Vec<u8>,
    pub base_addr: u32,
}

impl LinearMemory {
    pub fn new(size: usize, base_addr: u32) -> Self {
        Self::filled(size, base_addr, 0)
    }

    /// Power-up content other than zero, so a dead write path cannot pass the zero sweep.
    pub fn filled(size: usize, base_addr: u32, fill: u8) -> Self {
        Self {
            data: vec![fill; size],
            base_addr,
        }
    }

    pub fn end_addr(&self) -> u64 {
        self.base_addr as u64 + self.data.len() as u64
    }

    fn index(&self, addr: u32, width: u64) -> Option<usize> {
        if (addr as u64) >= self.base_addr as u64 && addr as u64 + width <= self.end_addr() {
            Some((addr - self.base_addr) as usize)
        } else {
            None
        }
    }

    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let i = self.index(addr, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[i..i + 4]);
        Some(u32::from_le_bytes(bytes))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> bool {
        match self.index(addr, 4) {
            Some(i) => {
                self.data[i..i + 4].copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_write_bounds() {
        let mut mem = LinearMemory::new(1024, 0x1000);

        assert!(mem.write_u32(0x1000, 42));
        assert!(mem.write_u32(0x13FC, 99)); // Last word

        // Out of bounds
        assert!(!mem.write_u32(0x0FFC, 1));
        assert!(!mem.write_u32(0x1400, 1));

        assert_eq!(mem.read_u32(0x1000), Some(42));
        assert_eq!(mem.read_u32(0x13FC), Some(99));
        assert_eq!(mem.read_u32(0x0FFC), None);
        assert_eq!(mem.read_u32(0x1400), None);
    }

    #[test]
    fn test_word_access_is_little_endian() {
        let mut mem = LinearMemory::new(16, 0x2_0000);
        assert!(mem.write_u32(0x2_0004, 0x1122_3344));
        assert_eq!(&mem.data[4..8], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(mem.read_u32(0x2_0004), Some(0x1122_3344));
    }

    #[test]
    fn test_word_straddling_end_is_rejected() {
        let mut mem = LinearMemory::new(8, 0x0);
        assert!(mem.write_u32(0x4, 1));
        assert!(!mem.write_u32(0x6, 1));
        assert_eq!(mem.read_u32(0x6), None);
        assert_eq!(mem.end_addr(), 0x8);
    }

    #[test]
    fn test_filled_power_up_content() {
        let mem = LinearMemory::filled(8, 0x0, 0xA5);
        assert_eq!(mem.read_u32(0x0), Some(0xA5A5_A5A5));
    }
}
