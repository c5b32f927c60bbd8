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

//! Data-processing operations
//!
//! Flag semantics:
//!
//! - Z: result is zero; N: bit 31 of the result.
//! - C (additive): unsigned overflow — the true sum exceeds 2^32 - 1.
//!   ADC takes the disjunction over its two partial additions.
//! - C (subtractive): no borrow — minuend >= subtrahend. SBC takes the
//!   conjunction over its two partial subtractions.
//! - V (additive): operand signs match and differ from the result sign.
//! - V (subtractive): operand signs differ and the minuend's sign differs
//!   from the result sign.
//!
//! Any write to r15 goes through the branch path: with S set it first
//! restores SPSR into CPSR (an exception return), without S it derives
//! the thumb state from bit 0 of the target.

use super::Cpu;

#[inline(always)]
fn carry_add(a: u32, b: u32) -> bool {
    (0xFFFF_FFFF - a) < b
}

#[inline(always)]
fn carry_sub(a: u32, b: u32) -> bool {
    a >= b
}

#[inline(always)]
fn add_overflow(a: u32, b: u32, result: u32) -> bool {
    ((a ^ b) & 0x8000_0000) == 0 && ((a ^ result) & 0x8000_0000) != 0
}

#[inline(always)]
fn sub_overflow(a: u32, b: u32, result: u32) -> bool {
    ((a ^ b) & 0x8000_0000) != 0 && ((a ^ result) & 0x8000_0000) != 0
}

impl Cpu {
    pub(crate) fn set_zero_neg_flags(&mut self, value: u32) {
        self.cpsr.negative = value & (1 << 31) != 0;
        self.cpsr.zero = value == 0;
    }

    pub(crate) fn set_cv_add_flags(&mut self, a: u32, b: u32, result: u32) {
        self.cpsr.carry = carry_add(a, b);
        self.cpsr.overflow = add_overflow(a, b, result);
    }

    pub(crate) fn set_cv_sub_flags(&mut self, a: u32, b: u32, result: u32) {
        self.cpsr.carry = carry_sub(a, b);
        self.cpsr.overflow = sub_overflow(a, b, result);
    }

    /// Store an ALU result, routing r15 through the branch path
    ///
    /// Returns false when the destination was the PC, in which case the
    /// caller must not touch the flags (they were either restored from
    /// SPSR or belong to the branch).
    fn alu_write(&mut self, dest: usize, result: u32, set_flags: bool) -> bool {
        if dest == 15 {
            if set_flags {
                self.spsr_to_cpsr();
                self.jp(result, false);
            } else {
                self.jp(result, true);
            }
            false
        } else {
            self.gpr[dest] = result;
            true
        }
    }

    // === Logical group: N/Z from the result, C owned by the shifter ===

    pub(crate) fn op_and(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source & operand;
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_orr(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source | operand;
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_eor(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source ^ operand;
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_bic(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source & !operand;
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_mov(&mut self, dest: usize, operand: u32, s: bool) {
        if self.alu_write(dest, operand, s) && s {
            self.set_zero_neg_flags(operand);
        }
    }

    pub(crate) fn op_mvn(&mut self, dest: usize, operand: u32, s: bool) {
        let result = !operand;
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
        }
    }

    // === Arithmetic group ===

    pub(crate) fn op_add(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source.wrapping_add(operand);
        if self.alu_write(dest, result, s) && s {
            self.op_cmn(source, operand);
        }
    }

    pub(crate) fn op_sub(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source.wrapping_sub(operand);
        if self.alu_write(dest, result, s) && s {
            self.op_cmp(source, operand);
        }
    }

    pub(crate) fn op_rsb(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        self.op_sub(dest, operand, source, s);
    }

    /// Add with carry: flags combine over the two partial additions
    pub(crate) fn op_adc(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let carry = self.cpsr.carry as u32;
        let partial = source.wrapping_add(operand);
        let result = partial.wrapping_add(carry);
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
            self.cpsr.carry = carry_add(source, operand) | carry_add(partial, carry);
            // V follows the final sum; a +1 can re-enter range after a
            // partial overflow, so the partials must not be OR-ed here
            self.cpsr.overflow = add_overflow(source, operand, result);
        }
    }

    /// Subtract with carry: borrow is the inverted carry flag
    pub(crate) fn op_sbc(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let borrow = !self.cpsr.carry as u32;
        let partial = source.wrapping_sub(operand);
        let result = partial.wrapping_sub(borrow);
        if self.alu_write(dest, result, s) && s {
            self.set_zero_neg_flags(result);
            self.cpsr.carry = carry_sub(source, operand) & carry_sub(partial, borrow);
            self.cpsr.overflow = sub_overflow(source, operand, result);
        }
    }

    pub(crate) fn op_rsc(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        self.op_sbc(dest, operand, source, s);
    }

    // === Compare group: flags only ===

    pub(crate) fn op_tst(&mut self, x: u32, y: u32) {
        self.set_zero_neg_flags(x & y);
    }

    pub(crate) fn op_teq(&mut self, x: u32, y: u32) {
        self.set_zero_neg_flags(x ^ y);
    }

    pub(crate) fn op_cmn(&mut self, x: u32, y: u32) {
        let result = x.wrapping_add(y);
        self.set_zero_neg_flags(result);
        self.set_cv_add_flags(x, y, result);
    }

    pub(crate) fn op_cmp(&mut self, x: u32, y: u32) {
        let result = x.wrapping_sub(y);
        self.set_zero_neg_flags(result);
        self.set_cv_sub_flags(x, y, result);
    }

    // === Multiply group ===

    pub(crate) fn op_mul(&mut self, dest: usize, source: u32, operand: u32, s: bool) {
        let result = source.wrapping_mul(operand);
        self.gpr[dest] = result;
        if s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_mla(&mut self, dest: usize, source: u32, operand: u32, accum: u32, s: bool) {
        let result = source.wrapping_mul(operand).wrapping_add(accum);
        self.gpr[dest] = result;
        if s {
            self.set_zero_neg_flags(result);
        }
    }

    pub(crate) fn op_umull(&mut self, dlo: usize, dhi: usize, source: u32, operand: u32, s: bool) {
        let result = source as u64 * operand as u64;
        self.gpr[dlo] = result as u32;
        self.gpr[dhi] = (result >> 32) as u32;
        if s {
            self.cpsr.negative = result & (1 << 63) != 0;
            self.cpsr.zero = result == 0;
        }
    }

    pub(crate) fn op_smull(&mut self, dlo: usize, dhi: usize, source: u32, operand: u32, s: bool) {
        let result = (source as i32 as i64 * operand as i32 as i64) as u64;
        self.gpr[dlo] = result as u32;
        self.gpr[dhi] = (result >> 32) as u32;
        if s {
            self.cpsr.negative = result & (1 << 63) != 0;
            self.cpsr.zero = result == 0;
        }
    }
}
