// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{round_trip, Check, CheckResult, RegisterBus};
use core::fmt;

pub const WORD_STRIDE: u32 = 4;

#[cfg(not(feature = "full-zero-sweep"))]
pub const ZERO_SPAN: u32 = 10;
#[cfg(feature = "full-zero-sweep")]
pub const ZERO_SPAN: u32 = 100;

pub const ONES_SPAN: u32 = 100;
pub const OFFSET_SPAN: u32 = 100;

/// Value class written by one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Pattern {
    /// Every bit clear; catches stuck-at-1 cells.
    Zeros,
    /// Every bit set; catches stuck-at-0 cells.
    Ones,
    /// The byte offset of the word; catches aliased addresses.
    Offset,
}

impl Pattern {
    pub const fn value_at(self, offset: u32) -> u32 {
        match self {
            Pattern::Zeros => 0x0000_0000,
            Pattern::Ones => 0xFFFF_FFFF,
            Pattern::Offset => offset,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pattern::Zeros => "zeros",
            Pattern::Ones => "ones",
            Pattern::Offset => "offset",
        })
    }
}

/// One pattern written over `[0, span)` bytes of the window, word by word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub pattern: Pattern,
    pub span: u32,
}

impl Sweep {
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        (0..self.span).step_by(WORD_STRIDE as usize)
    }
}

pub const DEFAULT_SWEEPS: [Sweep; 3] = [
    Sweep {
        pattern: Pattern::Zeros,
        span: ZERO_SPAN,
    },
    Sweep {
        pattern: Pattern::Ones,
        span: ONES_SPAN,
    },
    Sweep {
        pattern: Pattern::Offset,
        span: OFFSET_SPAN,
    },
];

/// Pattern write/read-back over a RAM window.
#[derive(Debug, Clone, Copy)]
pub struct RamVerifier {
    base: u32,
    sweeps: &'static [Sweep],
}

impl RamVerifier {
    pub const fn new(base: u32) -> Self {
        Self {
            base,
            sweeps: &DEFAULT_SWEEPS,
        }
    }

    pub const fn with_sweeps(base: u32, sweeps: &'static [Sweep]) -> Self {
        Self { base, sweeps }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn sweeps(&self) -> &'static [Sweep] {
        self.sweeps
    }

    /// Runs every sweep in order, stopping at the first bad word.
    ///
    /// The window is left holding whatever was written last.
    pub fn verify<B: RegisterBus + ?Sized>(&self, bus: &mut B) -> CheckResult {
        for sweep in self.sweeps {
            trace_event!(debug, pattern = %sweep.pattern, span = sweep.span, "ram sweep");
            for offset in sweep.offsets() {
                round_trip(
                    bus,
                    Check::Ram(sweep.pattern),
                    self.base.wrapping_add(offset),
                    sweep.pattern.value_at(offset),
                )?;
            }
        }
        Ok(())
    }
}
