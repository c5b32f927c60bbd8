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

//! One-line instruction disassembly for trace logs
//!
//! Deliberately rough: it names the operation and the interesting
//! registers so an execution trace is readable, and nothing more. It is
//! never consulted by the interpreter itself.

/// Register name in the usual ABI spelling
pub fn reg_name(reg: u32) -> &'static str {
    match reg & 0xF {
        0 => "r0",
        1 => "r1",
        2 => "r2",
        3 => "r3",
        4 => "r4",
        5 => "r5",
        6 => "r6",
        7 => "r7",
        8 => "r8",
        9 => "r9",
        10 => "sl",
        11 => "fp",
        12 => "ip",
        13 => "sp",
        14 => "lr",
        _ => "pc",
    }
}

const DP_NAMES: [&str; 16] = [
    "and", "eor", "sub", "rsb", "add", "adc", "sbc", "rsc", "tst", "teq", "cmp", "cmn", "orr",
    "mov", "bic", "mvn",
];

const COND_NAMES: [&str; 16] = [
    "eq", "ne", "cs", "cc", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "", "",
];

/// Describe one ARM instruction
pub fn arm(instr: u32) -> String {
    let cond = COND_NAMES[(instr >> 28) as usize];

    if (instr >> 28) != 0xF && (instr >> 25) & 7 == 0b101 {
        let link = if instr & (1 << 24) != 0 { "l" } else { "" };
        return format!("b{link}{cond} <+#{:X}>", (instr & 0xFF_FFFF) << 2);
    }
    if (instr & 0x0FFF_FFF0) == 0x012F_FF10 {
        return format!("bx{cond} {}", reg_name(instr));
    }
    if (instr & 0x0FB0_00F0) == 0x0120_0000 || (instr & 0x0FB0_0000) == 0x0320_0000 {
        return format!("msr{cond}");
    }
    if (instr & 0x0FBF_0000) == 0x010F_0000 {
        return format!("mrs{cond} {}", reg_name(instr >> 12));
    }
    if (instr >> 25) & 7 == 0b010 || (instr >> 25) & 7 == 0b011 {
        let op = if instr & (1 << 20) != 0 { "ldr" } else { "str" };
        let b = if instr & (1 << 22) != 0 { "b" } else { "" };
        return format!(
            "{op}{b}{cond} {}, [{}]",
            reg_name(instr >> 12),
            reg_name(instr >> 16)
        );
    }
    if (instr >> 25) & 7 == 0b100 {
        let op = if instr & (1 << 20) != 0 { "ldm" } else { "stm" };
        return format!("{op}{cond} {}, #{:04X}", reg_name(instr >> 16), instr & 0xFFFF);
    }
    if (instr >> 28) != 0xF && (instr & 0x0F00_0000) == 0x0F00_0000 {
        return format!("svc{cond} #{:X}", instr & 0xFF_FFFF);
    }
    if (instr >> 26) & 3 == 0 {
        let op = DP_NAMES[((instr >> 21) & 0xF) as usize];
        let s = if instr & (1 << 20) != 0 { "s" } else { "" };
        return format!(
            "{op}{s}{cond} {}, {}",
            reg_name(instr >> 12),
            reg_name(instr >> 16)
        );
    }
    format!("dw 0x{instr:08X}")
}

/// Describe one thumb instruction
pub fn thumb(instr: u16) -> String {
    let instr = instr as u32;
    match instr >> 13 {
        0b000 if (instr >> 11) & 3 == 3 => {
            let op = if instr & (1 << 9) != 0 { "sub" } else { "add" };
            format!("{op}s {}, {}", reg_name(instr & 7), reg_name((instr >> 3) & 7))
        }
        0b000 => format!("shift {}, #{}", reg_name(instr & 7), (instr >> 6) & 0x1F),
        0b001 => {
            let op = ["mov", "cmp", "add", "sub"][((instr >> 11) & 3) as usize];
            format!("{op}s {}, #{}", reg_name((instr >> 8) & 7), instr & 0xFF)
        }
        0b010 if (instr >> 10) & 7 == 0 => {
            format!("alu {}, {}", reg_name(instr & 7), reg_name((instr >> 3) & 7))
        }
        0b010 if (instr >> 10) & 7 == 1 => "hireg/bx".to_string(),
        0b010 if (instr >> 11) & 3 == 1 => {
            format!("ldr {}, [pc, #{}]", reg_name((instr >> 8) & 7), (instr & 0xFF) * 4)
        }
        0b010 | 0b011 | 0b100 => "ldr/str".to_string(),
        0b101 => "addr/push/pop".to_string(),
        0b110 if (instr >> 8) & 0xFF == 0xDF => format!("swi #{}", instr & 0xFF),
        0b110 => "ldm/stm/bcond".to_string(),
        _ => "b/bl".to_string(),
    }
}
