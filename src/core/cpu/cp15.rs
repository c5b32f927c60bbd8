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

//! Coprocessor 15: system control
//!
//! Governs caches, the (unmodeled) MMU, and the tightly-coupled memories.
//! The bus consults the ITCM size and DTCM window on *every* CPU access,
//! so those two live as plain fields rather than re-deriving them from
//! the raw region registers.

use log::{debug, trace};

/// ITCM backing store size (wrap mask 0x7FFF)
pub const ITCM_BYTES: usize = 0x8000;

/// DTCM backing store size (wrap mask 0x3FFF)
pub const DTCM_BYTES: usize = 0x4000;

/// System-control coprocessor state
pub struct Cp15 {
    /// Instruction TCM, mirrored across `[0, itcm_size)`
    pub itcm: Vec<u8>,
    /// Data TCM, mirrored across `[dtcm_base, dtcm_base + dtcm_size)`
    pub dtcm: Vec<u8>,

    /// Virtual extent of the ITCM window
    pub itcm_size: u32,
    /// Base of the DTCM window
    pub dtcm_base: u32,
    /// Virtual extent of the DTCM window
    pub dtcm_size: u32,

    /// c1,c0,0 control register, kept raw
    control: u32,
    /// Raw region registers, so reads echo back what was written
    dtcm_region: u32,
    itcm_region: u32,
}

impl Cp15 {
    /// Power-on state: ITCM mapped across the low 128 MiB, DTCM parked
    /// high
    pub fn new() -> Self {
        Self {
            itcm: vec![0; ITCM_BYTES],
            dtcm: vec![0; DTCM_BYTES],
            itcm_size: 0x0800_0000,
            dtcm_base: 0xFFF0_0000,
            dtcm_size: 0x4000,
            control: 0x0000_0078,
            dtcm_region: 0xFFF0_000A,
            itcm_region: 0x0000_0024,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// MRC: read a control register
    ///
    /// Unmodeled registers read as zero.
    pub fn mrc(&self, crn: u32, crm: u32, opc2: u32) -> u32 {
        match (crn, crm, opc2) {
            (0, 0, 0) => 0x4106_0360, // main ID
            (1, 0, 0) => self.control,
            (9, 1, 0) => self.dtcm_region,
            (9, 1, 1) => self.itcm_region,
            _ => {
                trace!("cp15 read c{crn},c{crm},{opc2} (unmodeled, 0)");
                0
            }
        }
    }

    /// MCR: write a control register
    ///
    /// Returns `true` when the write was a wait-for-interrupt request
    /// (c7,c0,4), which the CPU turns into a halt.
    pub fn mcr(&mut self, crn: u32, crm: u32, opc2: u32, value: u32) -> bool {
        match (crn, crm, opc2) {
            (1, 0, 0) => {
                self.control = value;
                debug!("cp15 control <- 0x{value:08X}");
            }
            (7, 0, 4) => return true,
            (7, _, _) | (8, _, _) => {
                // Cache/TLB maintenance: nothing to maintain
                trace!("cp15 cache op c7/c8,c{crm},{opc2}");
            }
            (9, 1, 0) => {
                self.dtcm_region = value;
                self.dtcm_base = value & 0xFFFF_F000;
                self.dtcm_size = 512u32 << ((value >> 1) & 0x1F);
                debug!(
                    "cp15 DTCM window 0x{:08X}+0x{:X}",
                    self.dtcm_base, self.dtcm_size
                );
            }
            (9, 1, 1) => {
                self.itcm_region = value;
                self.itcm_size = 512u32 << ((value >> 1) & 0x1F);
                debug!("cp15 ITCM window 0x{:X}", self.itcm_size);
            }
            _ => {
                trace!("cp15 write c{crn},c{crm},{opc2} <- 0x{value:08X} (ignored)");
            }
        }
        false
    }

    /// True when `addr` falls inside the ITCM window
    #[inline(always)]
    pub fn itcm_hit(&self, addr: u32) -> bool {
        addr < self.itcm_size
    }

    /// True when `addr` falls inside the DTCM window
    #[inline(always)]
    pub fn dtcm_hit(&self, addr: u32) -> bool {
        addr >= self.dtcm_base && addr < self.dtcm_base.wrapping_add(self.dtcm_size)
    }
}

impl Default for Cp15 {
    fn default() -> Self {
        Self::new()
    }
}
