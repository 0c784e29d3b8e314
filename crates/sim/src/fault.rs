// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitalLevel {
    Low,
    High,
}

/// Hardware faults that can be injected into the simulated bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    /// A read of `address` returns `value` instead of what is stored.
    ReadOverride {
        address: u32,
        value: u32,
        /// Only when the stored word equals this value.
        #[serde(default)]
        when_written: Option<u32>,
        /// Fire on the first matching read only.
        #[serde(default)]
        once: bool,
    },
    /// Bits in `mask` read back stuck at `level`.
    StuckBits {
        address: u32,
        mask: u32,
        level: DigitalLevel,
    },
    /// Writes to `address` land on `target`: a broken address decoder.
    Alias { address: u32, target: u32 },
}

/// Applies a fault list to bus traffic.
#[derive(Debug, Default)]
pub struct FaultInjector {
    faults: Vec<Fault>,
    spent: Vec<bool>,
    fired: u64,
}

impl FaultInjector {
    pub fn new(faults: Vec<Fault>) -> Self {
        let spent = vec![false; faults.len()];
        Self {
            faults,
            spent,
            fired: 0,
        }
    }

    /// Number of accesses a fault changed.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Physical word a write to `address` actually reaches.
    pub fn route_write(&mut self, address: u32) -> u32 {
        for fault in &self.faults {
            if let Fault::Alias { address: a, target } = *fault {
                if a == address {
                    self.fired += 1;
                    tracing::warn!("alias fault: write to {:#010x} lands on {:#010x}", a, target);
                    return target;
                }
            }
        }
        address
    }

    /// Value the CPU sees when reading `address`, given what is stored there.
    pub fn filter_read(&mut self, address: u32, stored: u32) -> u32 {
        let mut value = stored;
        for (fault, spent) in self.faults.iter().zip(self.spent.iter_mut()) {
            match *fault {
                Fault::ReadOverride {
                    address: a,
                    value: forced,
                    when_written,
                    once,
                } if a == address && !*spent => {
                    if when_written.is_some_and(|w| w != stored) {
                        continue;
                    }
                    if once {
                        *spent = true;
                    }
                    self.fired += 1;
                    tracing::warn!(
                        "read override at {:#010x}: {:#010x} -> {:#010x}",
                        a,
                        value,
                        forced
                    );
                    value = forced;
                }
                Fault::StuckBits {
                    address: a,
                    mask,
                    level,
                } if a == address => {
                    let stuck = match level {
                        DigitalLevel::High => value | mask,
                        DigitalLevel::Low => value & !mask,
                    };
                    if stuck != value {
                        self.fired += 1;
                        tracing::warn!(
                            "stuck bits at {:#010x}: {:#010x} -> {:#010x}",
                            a,
                            value,
                            stuck
                        );
                    }
                    value = stuck;
                }
                _ => {}
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_override_conditional_and_once() {
        let mut faults = FaultInjector::new(vec![Fault::ReadOverride {
            address: 0x4,
            value: 0x1,
            when_written: Some(0xFFFF_FFFF),
            once: true,
        }]);

        // Wrong stored value: untouched.
        assert_eq!(faults.filter_read(0x4, 0x0), 0x0);
        // Other address: untouched.
        assert_eq!(faults.filter_read(0x8, 0xFFFF_FFFF), 0xFFFF_FFFF);
        // Fires once.
        assert_eq!(faults.filter_read(0x4, 0xFFFF_FFFF), 0x1);
        assert_eq!(faults.filter_read(0x4, 0xFFFF_FFFF), 0xFFFF_FFFF);
        assert_eq!(faults.fired(), 1);
    }

    #[test]
    fn test_stuck_bits() {
        let mut faults = FaultInjector::new(vec![
            Fault::StuckBits {
                address: 0x10,
                mask: 0x0000_0100,
                level: DigitalLevel::Low,
            },
            Fault::StuckBits {
                address: 0x14,
                mask: 0x8000_0000,
                level: DigitalLevel::High,
            },
        ]);
        assert_eq!(faults.filter_read(0x10, 0xFFFF_FFFF), 0xFFFF_FEFF);
        assert_eq!(faults.filter_read(0x10, 0x0), 0x0);
        assert_eq!(faults.filter_read(0x14, 0x0), 0x8000_0000);
        assert_eq!(faults.fired(), 2);
    }

    #[test]
    fn test_alias_only_redirects_writes() {
        let mut faults = FaultInjector::new(vec![Fault::Alias {
            address: 0x20,
            target: 0x0,
        }]);
        assert_eq!(faults.route_write(0x20), 0x0);
        assert_eq!(faults.route_write(0x24), 0x24);
        assert_eq!(faults.filter_read(0x20, 0x1234), 0x1234);
    }

    #[test]
    fn test_fault_yaml_shape() {
        let yaml = r#"
- kind: read_override
  address: 0x20004
  value: 0x1
  when_written: 0xffffffff
- kind: stuck_bits
  address: 0x20008
  mask: 0x1
  level: high
- kind: alias
  address: 0x20010
  target: 0x20000
"#;
        let faults: Vec<Fault> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(faults.len(), 3);
        assert_eq!(
            faults[0],
            Fault::ReadOverride {
                address: 0x20004,
                value: 1,
                when_written: Some(0xFFFF_FFFF),
                once: false,
            }
        );
        assert!(matches!(
            faults[1],
            Fault::StuckBits {
                level: DigitalLevel::High,
                ..
            }
        ));
    }
}
