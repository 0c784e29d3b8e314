// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use bringup_selftest::Delay;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tick counter shared by the simulated busy wait and the devices that timestamp events.
///
/// One tick is one busy-wait iteration; register accesses take no time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ticks: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl Delay for SimClock {
    fn spin(&mut self, iterations: u32) {
        self.advance(iterations as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_ticks() {
        let clock = SimClock::new();
        let mut delay = clock.clone();
        delay.spin(10);
        delay.spin(1000);
        assert_eq!(clock.now(), 1010);
    }
}
