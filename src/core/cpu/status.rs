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

//! Status-transfer and exception-state instructions
//!
//! MRS/MSR move PSRs to and from general registers; CPS switches mode and
//! interrupt masks directly; SRS/RFE shuffle LR and SPSR through a
//! selected mode's stack for nested exception handling.

use super::psr::Mode;
use super::Cpu;
use crate::core::error::Result;
use crate::core::memory::Bus;

impl Cpu {
    /// MRS: read CPSR or the current mode's SPSR into a register
    pub(crate) fn op_mrs(&mut self, instr: u32) {
        let use_cpsr = instr & (1 << 22) == 0;
        let dest = ((instr >> 12) & 0xF) as usize;

        let value = if use_cpsr {
            self.cpsr.get()
        } else {
            self.spsr().get()
        };
        self.gpr[dest] = value;
    }

    /// MSR: write a masked subset of CPSR or SPSR
    ///
    /// Instruction bits 16-19 select which of the four byte fields
    /// update. User mode may not touch the control field, and the thumb
    /// bit can never be toggled through a CPSR write.
    pub(crate) fn op_msr(&mut self, instr: u32) -> Result<()> {
        let is_imm = instr & (1 << 25) != 0;
        let use_cpsr = instr & (1 << 22) == 0;

        let source = if is_imm {
            let imm = instr & 0xFF;
            let shift = (instr & 0xF00) >> 7;
            self.rotr32(imm, shift, false)
        } else {
            self.gpr[(instr & 0xF) as usize]
        };

        let mut bitmask = 0u32;
        for field in 0..4 {
            if instr & (1 << (16 + field)) != 0 {
                bitmask |= 0xFF << (8 * field);
            }
        }
        if self.cpsr.mode == Mode::User {
            bitmask &= 0xFFFF_FF00;
        }
        if use_cpsr {
            bitmask &= !(1 << 5);
        }

        let current = if use_cpsr {
            self.cpsr.get()
        } else {
            self.spsr().get()
        };
        let value = (current & !bitmask) | (source & bitmask);

        if use_cpsr {
            // Banks swap before the mode field changes
            let new_mode = Mode::from_bits(self.id.num(), value)?;
            self.update_reg_mode(new_mode);
            self.cpsr.set(self.id.num(), value)?;
        } else {
            let core = self.id.num();
            let index = self.cpsr.mode.bank_index();
            self.spsr[index].set(core, value)?;
        }
        Ok(())
    }

    /// CPS: change processor state (mode and/or interrupt masks)
    pub(crate) fn op_cps(&mut self, instr: u32) -> Result<()> {
        let f = (instr >> 6) & 1 != 0;
        let i = (instr >> 7) & 1 != 0;
        let mmod = (instr >> 17) & 1 != 0;
        let imod = (instr >> 18) & 3;

        if mmod {
            let mode = Mode::from_bits(self.id.num(), instr & 0x1F)?;
            self.update_reg_mode(mode);
            self.cpsr.mode = mode;
        }

        if imod == 2 {
            // Interrupt enable: clear the selected disable bits
            self.cpsr.fiq_disable &= !f;
            self.cpsr.irq_disable &= !i;
        } else if imod == 3 {
            self.cpsr.fiq_disable |= f;
            self.cpsr.irq_disable |= i;
        }
        Ok(())
    }

    /// SRS: store the current LR and SPSR onto a chosen mode's stack
    pub(crate) fn op_srs<B: Bus>(&mut self, bus: &mut B, instr: u32) -> Result<()> {
        let writeback = instr & (1 << 21) != 0;
        let add = instr & (1 << 23) != 0;
        let pre = instr & (1 << 24) != 0;

        let target_mode = Mode::from_bits(self.id.num(), instr & 0x1F)?;

        let saved_lr = self.gpr[14];
        let saved_psr = self.spsr().get();

        // Borrow the target mode's SP, then restore the previous state
        let old_mode = self.cpsr.mode;
        self.update_reg_mode(target_mode);
        self.cpsr.mode = target_mode;

        let base = self.gpr[13];
        if add {
            if pre {
                self.write32(bus, base.wrapping_add(4), saved_lr)?;
                self.write32(bus, base.wrapping_add(8), saved_psr)?;
            } else {
                self.write32(bus, base, saved_lr)?;
                self.write32(bus, base.wrapping_add(4), saved_psr)?;
            }
            if writeback {
                self.gpr[13] = base.wrapping_add(8);
            }
        } else {
            if pre {
                self.write32(bus, base.wrapping_sub(4), saved_psr)?;
                self.write32(bus, base.wrapping_sub(8), saved_lr)?;
            } else {
                self.write32(bus, base, saved_psr)?;
                self.write32(bus, base.wrapping_sub(4), saved_lr)?;
            }
            if writeback {
                self.gpr[13] = base.wrapping_sub(8);
            }
        }

        self.update_reg_mode(old_mode);
        self.cpsr.mode = old_mode;
        Ok(())
    }

    /// RFE: return from exception via a (PC, PSR) pair in memory
    pub(crate) fn op_rfe<B: Bus>(&mut self, bus: &mut B, instr: u32) -> Result<()> {
        let writeback = instr & (1 << 21) != 0;
        let add = instr & (1 << 23) != 0;
        let pre = instr & (1 << 24) != 0;
        let base_reg = ((instr >> 16) & 0xF) as usize;

        let addr = self.gpr[base_reg];
        let (pc, psr) = if add {
            if pre {
                (
                    self.read32(bus, addr.wrapping_add(4))?,
                    self.read32(bus, addr.wrapping_add(8))?,
                )
            } else {
                (
                    self.read32(bus, addr)?,
                    self.read32(bus, addr.wrapping_add(4))?,
                )
            }
        } else if pre {
            let psr = self.read32(bus, addr.wrapping_sub(4))?;
            let pc = self.read32(bus, addr.wrapping_sub(8))?;
            (pc, psr)
        } else {
            let psr = self.read32(bus, addr)?;
            let pc = self.read32(bus, addr.wrapping_sub(4))?;
            (pc, psr)
        };

        if writeback {
            let offset = if add { 8u32 } else { 8u32.wrapping_neg() };
            self.gpr[base_reg] = addr.wrapping_add(offset);
        }

        let new_mode = Mode::from_bits(self.id.num(), psr)?;
        self.update_reg_mode(new_mode);
        self.cpsr.set(self.id.num(), psr)?;
        self.jp(pc, true);
        Ok(())
    }
}
