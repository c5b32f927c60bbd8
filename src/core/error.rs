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

//! Unified error type for the emulator core
//!
//! Every fatal emulation condition is a variant of [`EmulatorError`].
//! Guest-visible conditions (shader divide-by-zero, odd blend configs)
//! are *not* errors; they produce defined outputs and never reach this
//! type.

use thiserror::Error;

/// Result alias used by all fallible core operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Fatal emulation errors
///
/// These terminate the emulation loop. Anything a real console would keep
/// running through is handled in-band instead of being surfaced here.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// A PSR mode field held a bit pattern that names no processor mode.
    ///
    /// Raised during register bank swaps; a guest can only trigger this by
    /// writing a reserved mode encoding into CPSR/SPSR.
    #[error("ARM{core}: unrecognized PSR mode 0x{mode:02X}")]
    UnrecognizedPsrMode { core: u32, mode: u32 },

    /// The decoder recognized no instruction class for this word.
    #[error("ARM{core}: undefined instruction 0x{instr:08X} at 0x{addr:08X}")]
    UndefinedInstruction { core: u32, instr: u32, addr: u32 },

    /// Decoded but not implemented by this interpreter.
    #[error("ARM{core}: unimplemented instruction {desc} (0x{instr:08X})")]
    UnimplementedInstruction {
        core: u32,
        instr: u32,
        desc: &'static str,
    },

    /// A shader program used an opcode the interpreter does not know.
    #[error("shader: unknown opcode 0x{opcode:02X} at pc 0x{pc:04X}")]
    UnknownShaderOpcode { opcode: u8, pc: u16 },

    /// A shader IF/CALL/LOOP pushed past its hardware stack depth.
    #[error("shader: {stack} stack overflow at pc 0x{pc:04X}")]
    ShaderStackOverflow { stack: &'static str, pc: u16 },

    /// Access to an address no device claims.
    #[error("ARM{core}: invalid {width}-bit memory access at 0x{address:08X}")]
    InvalidMemoryAccess { core: u32, address: u32, width: u8 },

    /// A boot ROM image could not be read or had the wrong size.
    #[error("boot ROM error: {0}")]
    BootRomError(String),

    /// Configuration file problems (missing, unreadable, malformed).
    #[error("config error: {0}")]
    ConfigError(String),
}
