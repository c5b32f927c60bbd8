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

//! Program status registers
//!
//! CPSR/SPSR are kept decoded: mode, thumb, interrupt-disable, and the
//! NZCVQ flags each live in their own field and are packed/unpacked only
//! at the MRS/MSR and exception boundaries.

use crate::core::error::{EmulatorError, Result};

/// Processor mode, as encoded in PSR bits 0-4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    User = 0x10,
    Fiq = 0x11,
    Irq = 0x12,
    Supervisor = 0x13,
    Abort = 0x17,
    Undefined = 0x1B,
    System = 0x1F,
}

impl Mode {
    /// Decode the 5-bit mode field
    ///
    /// Reserved encodings are the one PSR condition the core treats as
    /// fatal (they would corrupt the register banks).
    pub fn from_bits(core: u32, bits: u32) -> Result<Mode> {
        match bits & 0x1F {
            0x10 => Ok(Mode::User),
            0x11 => Ok(Mode::Fiq),
            0x12 => Ok(Mode::Irq),
            0x13 => Ok(Mode::Supervisor),
            0x17 => Ok(Mode::Abort),
            0x1B => Ok(Mode::Undefined),
            0x1F => Ok(Mode::System),
            other => Err(EmulatorError::UnrecognizedPsrMode { core, mode: other }),
        }
    }

    /// Index into the per-mode SPSR/bank tables
    ///
    /// User and System share a bank and both map to slot 0.
    pub fn bank_index(self) -> usize {
        match self {
            Mode::User | Mode::System => 0,
            Mode::Fiq => 1,
            Mode::Irq => 2,
            Mode::Supervisor => 3,
            Mode::Abort => 4,
            Mode::Undefined => 5,
        }
    }

    /// True for the modes that have their own r13/r14 pair
    pub fn has_banked_sp_lr(self) -> bool {
        !matches!(self, Mode::User | Mode::System)
    }
}

/// Decoded program status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psr {
    pub mode: Mode,
    pub thumb: bool,
    pub fiq_disable: bool,
    pub irq_disable: bool,

    pub negative: bool,
    pub zero: bool,
    pub carry: bool,
    pub overflow: bool,
    pub q_overflow: bool,
}

impl Psr {
    /// Boot-time PSR: supervisor mode, ARM state, interrupts masked
    pub fn reset() -> Psr {
        Psr {
            mode: Mode::Supervisor,
            thumb: false,
            fiq_disable: true,
            irq_disable: true,
            negative: false,
            zero: false,
            carry: false,
            overflow: false,
            q_overflow: false,
        }
    }

    /// Pack into the architectural 32-bit form
    pub fn get(&self) -> u32 {
        let mut reg = 0u32;
        reg |= (self.negative as u32) << 31;
        reg |= (self.zero as u32) << 30;
        reg |= (self.carry as u32) << 29;
        reg |= (self.overflow as u32) << 28;
        reg |= (self.q_overflow as u32) << 27;

        reg |= (self.irq_disable as u32) << 7;
        reg |= (self.fiq_disable as u32) << 6;
        reg |= (self.thumb as u32) << 5;

        reg |= self.mode as u32;
        reg
    }

    /// Unpack from the architectural 32-bit form
    ///
    /// Fails only on a reserved mode encoding.
    pub fn set(&mut self, core: u32, value: u32) -> Result<()> {
        self.negative = value & (1 << 31) != 0;
        self.zero = value & (1 << 30) != 0;
        self.carry = value & (1 << 29) != 0;
        self.overflow = value & (1 << 28) != 0;
        self.q_overflow = value & (1 << 27) != 0;

        self.irq_disable = value & (1 << 7) != 0;
        self.fiq_disable = value & (1 << 6) != 0;
        self.thumb = value & (1 << 5) != 0;

        self.mode = Mode::from_bits(core, value)?;
        Ok(())
    }
}
