// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interrupt controller
//!
//! Latches interrupt requests per core and exposes a level signal the
//! system copies into each CPU at instruction boundaries. Guest code sees
//! two registers per core:
//!
//! - **IE** (`0x10001000`): enable mask, read/write
//! - **IF** (`0x10001004`): pending flags; writing 1 to a bit acknowledges
//!   (clears) it

use log::trace;

/// Interrupt sources, one bit each in IE/IF
pub mod sources {
    /// Memory-fill unit 0 complete
    pub const PSC0: u32 = 1 << 0;

    /// Memory-fill unit 1 complete
    pub const PSC1: u32 = 1 << 1;

    /// Top screen vertical blank
    pub const VBLANK_TOP: u32 = 1 << 2;

    /// Bottom screen vertical blank
    pub const VBLANK_BOTTOM: u32 = 1 << 3;

    /// Display transfer / texture copy complete
    pub const PPF: u32 = 1 << 4;

    /// Command list complete
    pub const P3D: u32 = 1 << 5;
}

/// Number of CPU cores the controller fans out to
pub const CORES: usize = 2;

/// Core index of the ARM9 security processor
pub const CORE_ARM9: usize = 0;

/// Core index of the ARM11 application processor
pub const CORE_ARM11: usize = 1;

/// Per-core latched interrupt state
pub struct InterruptController {
    pending: [u32; CORES],
    enabled: [u32; CORES],
}

impl InterruptController {
    pub fn new() -> Self {
        Self {
            pending: [0; CORES],
            enabled: [0; CORES],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Latch `source` pending on every core
    ///
    /// Each core's enable mask decides whether its level output rises.
    pub fn assert_irq(&mut self, source: u32) {
        for core in 0..CORES {
            self.pending[core] |= source;
        }
        trace!("irq assert 0x{source:02X}");
    }

    /// Level output for one core: any enabled source pending
    pub fn pending(&self, core: usize) -> bool {
        self.pending[core] & self.enabled[core] != 0
    }

    /// IE register
    pub fn read_enable(&self, core: usize) -> u32 {
        self.enabled[core]
    }

    /// IE register
    pub fn write_enable(&mut self, core: usize, value: u32) {
        self.enabled[core] = value;
        trace!("irq core {core} enable=0x{value:02X}");
    }

    /// IF register
    pub fn read_pending(&self, core: usize) -> u32 {
        self.pending[core]
    }

    /// IF register: write-1-to-clear acknowledge
    pub fn acknowledge(&mut self, core: usize, value: u32) {
        self.pending[core] &= !value;
        trace!("irq core {core} ack 0x{value:02X}");
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_interrupt_does_not_raise_level() {
        let mut irq = InterruptController::new();
        irq.assert_irq(sources::PSC0);
        assert!(!irq.pending(CORE_ARM11));

        irq.write_enable(CORE_ARM11, sources::PSC0);
        assert!(irq.pending(CORE_ARM11));
        // The other core has its own mask
        assert!(!irq.pending(CORE_ARM9));
    }

    #[test]
    fn test_acknowledge_clears_only_written_bits() {
        let mut irq = InterruptController::new();
        irq.write_enable(CORE_ARM11, 0xFF);
        irq.assert_irq(sources::PSC0 | sources::VBLANK_TOP);

        irq.acknowledge(CORE_ARM11, sources::PSC0);
        assert_eq!(irq.read_pending(CORE_ARM11), sources::VBLANK_TOP);
        assert!(irq.pending(CORE_ARM11));

        irq.acknowledge(CORE_ARM11, sources::VBLANK_TOP);
        assert!(!irq.pending(CORE_ARM11));
    }
}
