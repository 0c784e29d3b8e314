// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Fixed-iteration busy wait. There is no time base behind it: only the
/// ratio between two waits means anything.
pub trait Delay {
    fn spin(&mut self, iterations: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn spin(&mut self, iterations: u32) {
        (**self).spin(iterations)
    }
}
