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

//! Graphics processor
//!
//! Owns VRAM, the two host-visible screens, the DMA engines, the command
//! engine, and the full rendering context. Guest-visible behavior:
//!
//! - **Memory fill** (`0x10`/`0x20`): replicate a 2/3/4-byte value over
//!   a byte range. Kicked by the control register; completes through a
//!   scheduler event that raises PSC0/PSC1.
//! - **Transfer engine** (`0xC00`): blits one 2D image to another with
//!   format conversion and linear/tiled re-layout, or in texture-copy
//!   mode a strided raw copy. Completes via PPF.
//! - **Command engine** (bank registers 0x238-0x23C): walks a command
//!   list in guest memory and feeds every entry through the same masked
//!   register write the CPU uses, so side effects are uniform. P3D on
//!   completion.
//! - **Register bank** (`0x1000 + id*4`): direct CPU access to the 0x300
//!   pipeline registers.
//!
//! Asynchronous engines hold `busy` high from the kick until their
//! completion event fires; guests polling the status registers observe
//! exactly that window.

use log::{debug, trace, warn};

pub mod float24;
pub mod fragment;
pub mod framebuffer;
pub mod rasterizer;
pub mod registers;
pub mod shader;
pub mod vector;

use crate::core::error::Result;
use crate::core::interrupt::{sources, InterruptController};
use crate::core::memory::Memory;
use crate::core::scheduler::{EventKind, Scheduler};
use registers::GpuContext;

/// VRAM size (6 MiB)
pub const VRAM_BYTES: usize = 0x0060_0000;

/// Physical base of VRAM
pub const VRAM_BASE: u32 = 0x1800_0000;

/// Screens are 240 pixels wide (the panels are mounted rotated)
pub const SCREEN_WIDTH: usize = 240;

/// Top screen height
pub const TOP_HEIGHT: usize = 400;

/// Bottom screen height
pub const BOTTOM_HEIGHT: usize = 320;

/// Cycles between kicking an engine and its completion event
const ENGINE_LATENCY: u64 = 1024;

/// One memory-fill unit
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryFill {
    pub start: u32,
    pub end: u32,
    pub value: u32,
    pub fill_width: u8,
    pub busy: bool,
    pub finished: bool,
}

/// Display-transfer / texture-copy engine
#[derive(Debug, Default, Clone, Copy)]
pub struct TransferEngine {
    pub input_addr: u32,
    pub output_addr: u32,
    pub disp_input_width: u32,
    pub disp_input_height: u32,
    pub disp_output_width: u32,
    pub disp_output_height: u32,
    pub flags: u32,

    pub tc_size: u32,
    pub tc_input_width: u32,
    pub tc_output_width: u32,
    pub tc_input_gap: u32,
    pub tc_output_gap: u32,

    pub busy: bool,
    pub finished: bool,
}

/// Command-list processor state
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandEngine {
    pub size: u32,
    pub input_addr: u32,
    pub busy: bool,
}

/// Per-screen output framebuffer selection
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameBufferCfg {
    pub left_addr_a: u32,
    pub left_addr_b: u32,
    pub color_format: u8,
    pub buffer_select: bool,
}

/// The GPU: VRAM, engines, pipeline context, output surfaces
pub struct Gpu {
    vram: Vec<u8>,
    top_screen: Vec<u8>,
    bottom_screen: Vec<u8>,

    pub framebuffers: [FrameBufferCfg; 2],
    pub memfill: [MemoryFill; 2],
    pub transfer: TransferEngine,
    pub cmd_engine: CommandEngine,

    pub ctx: GpuContext,
}

impl Gpu {
    pub fn new() -> Self {
        Self {
            vram: vec![0; VRAM_BYTES],
            top_screen: vec![0; SCREEN_WIDTH * TOP_HEIGHT * 4],
            bottom_screen: vec![0; SCREEN_WIDTH * BOTTOM_HEIGHT * 4],
            framebuffers: [FrameBufferCfg::default(); 2],
            memfill: [MemoryFill::default(); 2],
            transfer: TransferEngine::default(),
            cmd_engine: CommandEngine::default(),
            ctx: GpuContext::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Linear RGBA8 surface for the top screen (240 x 400)
    pub fn top_buffer(&self) -> &[u8] {
        &self.top_screen
    }

    /// Linear RGBA8 surface for the bottom screen (240 x 320)
    pub fn bottom_buffer(&self) -> &[u8] {
        &self.bottom_screen
    }

    // === VRAM access (wraps by the 6 MiB size) ===

    #[inline(always)]
    pub fn read_vram8(&self, addr: u32) -> u8 {
        self.vram[addr as usize % VRAM_BYTES]
    }

    #[inline(always)]
    pub fn read_vram16(&self, addr: u32) -> u16 {
        let i = addr as usize % VRAM_BYTES;
        u16::from_le_bytes([self.vram[i], self.vram[(i + 1) % VRAM_BYTES]])
    }

    #[inline(always)]
    pub fn read_vram32(&self, addr: u32) -> u32 {
        let i = addr as usize % VRAM_BYTES;
        u32::from_le_bytes([
            self.vram[i],
            self.vram[(i + 1) % VRAM_BYTES],
            self.vram[(i + 2) % VRAM_BYTES],
            self.vram[(i + 3) % VRAM_BYTES],
        ])
    }

    #[inline(always)]
    pub fn write_vram8(&mut self, addr: u32, value: u8) {
        self.vram[addr as usize % VRAM_BYTES] = value;
    }

    #[inline(always)]
    pub fn write_vram16(&mut self, addr: u32, value: u16) {
        for (k, b) in value.to_le_bytes().into_iter().enumerate() {
            self.vram[(addr as usize + k) % VRAM_BYTES] = b;
        }
    }

    #[inline(always)]
    pub fn write_vram32(&mut self, addr: u32, value: u32) {
        for (k, b) in value.to_le_bytes().into_iter().enumerate() {
            self.vram[(addr as usize + k) % VRAM_BYTES] = b;
        }
    }

    // === Guest-memory access for the engines ===
    //
    // Command lists and vertex buffers may live in VRAM or any plain RAM
    // region; VRAM is served locally, everything else goes to [`Memory`].

    pub(crate) fn mem_read8(&self, mem: &Memory, addr: u32) -> u8 {
        if (VRAM_BASE..VRAM_BASE + VRAM_BYTES as u32).contains(&addr) {
            self.read_vram8(addr)
        } else {
            mem.read_phys8(addr).unwrap_or(0)
        }
    }

    pub(crate) fn mem_read16(&self, mem: &Memory, addr: u32) -> u16 {
        if (VRAM_BASE..VRAM_BASE + VRAM_BYTES as u32).contains(&addr) {
            self.read_vram16(addr)
        } else {
            mem.read_phys16(addr).unwrap_or(0)
        }
    }

    pub(crate) fn mem_read32(&self, mem: &Memory, addr: u32) -> u32 {
        if (VRAM_BASE..VRAM_BASE + VRAM_BYTES as u32).contains(&addr) {
            self.read_vram32(addr)
        } else {
            mem.read_phys32(addr).unwrap_or(0)
        }
    }

    pub(crate) fn mem_write8(&mut self, mem: &mut Memory, addr: u32, value: u8) {
        if (VRAM_BASE..VRAM_BASE + VRAM_BYTES as u32).contains(&addr) {
            self.write_vram8(addr, value);
        } else if mem.write_phys8(addr, value).is_none() {
            warn!("GPU write to unmapped 0x{addr:08X}");
        }
    }

    // === MMIO ===

    /// Read a GPU MMIO register (no side effects)
    pub fn read_mmio(&self, offset: u32) -> u32 {
        match offset {
            0x10 => self.memfill[0].start,
            0x14 => self.memfill[0].end,
            0x18 => self.memfill[0].value,
            0x1C => self.memfill_status(0),
            0x20 => self.memfill[1].start,
            0x24 => self.memfill[1].end,
            0x28 => self.memfill[1].value,
            0x2C => self.memfill_status(1),

            0x468 => self.framebuffers[0].left_addr_a,
            0x46C => self.framebuffers[0].left_addr_b,
            0x470 => self.framebuffers[0].color_format as u32,
            0x478 => self.framebuffers[0].buffer_select as u32,
            0x568 => self.framebuffers[1].left_addr_a,
            0x56C => self.framebuffers[1].left_addr_b,
            0x570 => self.framebuffers[1].color_format as u32,
            0x578 => self.framebuffers[1].buffer_select as u32,

            0xC00 => self.transfer.input_addr,
            0xC04 => self.transfer.output_addr,
            0xC18 => {
                (self.transfer.busy as u32) | ((self.transfer.finished as u32) << 8)
            }

            0x1000..=0x1BFF => {
                let reg = (offset - 0x1000) / 4;
                self.ctx.regs[(reg & 0x3FF).min(0x2FF) as usize]
            }

            _ => {
                trace!("GPU read from unmodeled MMIO +0x{offset:04X}");
                0
            }
        }
    }

    fn memfill_status(&self, unit: usize) -> u32 {
        let f = &self.memfill[unit];
        let width_code = match f.fill_width {
            3 => 1,
            4 => 2,
            _ => 0,
        };
        (f.busy as u32) | ((f.finished as u32) << 1) | (width_code << 8)
    }

    /// Write a GPU MMIO register, performing any side effects
    pub fn write_mmio(
        &mut self,
        offset: u32,
        value: u32,
        mem: &mut Memory,
        sched: &mut Scheduler,
    ) -> Result<()> {
        match offset {
            0x10 | 0x20 => self.memfill[(offset >> 5) as usize & 1].start = value,
            0x14 | 0x24 => self.memfill[(offset >> 5) as usize & 1].end = value,
            0x18 | 0x28 => self.memfill[(offset >> 5) as usize & 1].value = value,
            0x1C | 0x2C => self.memfill_control((offset >> 5) as usize & 1, value, sched),

            // Framebuffer configuration blocks at 0x400 / 0x500
            0x468 | 0x568 => self.framebuffers[(offset >> 8) as usize & 1].left_addr_a = value,
            0x46C | 0x56C => self.framebuffers[(offset >> 8) as usize & 1].left_addr_b = value,
            0x470 | 0x570 => {
                self.framebuffers[(offset >> 8) as usize & 1].color_format = (value & 0x7) as u8
            }
            0x478 | 0x578 => {
                self.framebuffers[(offset >> 8) as usize & 1].buffer_select = value & 1 != 0
            }

            // Transfer engine
            0xC00 => self.transfer.input_addr = value,
            0xC04 => self.transfer.output_addr = value,
            0xC08 => {
                self.transfer.disp_output_width = value & 0xFFFF;
                self.transfer.disp_output_height = value >> 16;
            }
            0xC0C => {
                self.transfer.disp_input_width = value & 0xFFFF;
                self.transfer.disp_input_height = value >> 16;
            }
            0xC10 => self.transfer.flags = value,
            0xC18 => {
                if value & 1 != 0 {
                    self.transfer.busy = true;
                    self.transfer.finished = false;
                    let kind = if self.transfer.flags & (1 << 3) != 0 {
                        EventKind::TextureCopyComplete
                    } else {
                        EventKind::DisplayTransferComplete
                    };
                    debug!("transfer engine kick ({kind:?})");
                    sched.schedule(kind, ENGINE_LATENCY);
                }
            }
            0xC20 => self.transfer.tc_size = value,
            0xC24 => {
                self.transfer.tc_input_width = value & 0xFFFF;
                self.transfer.tc_input_gap = value >> 16;
            }
            0xC28 => {
                self.transfer.tc_output_width = value & 0xFFFF;
                self.transfer.tc_output_gap = value >> 16;
            }

            0x1000..=0x1BFF => {
                let reg = (offset - 0x1000) / 4;
                self.write_cmd_register(reg, value, 0xF, mem, sched)?;
            }

            _ => {
                trace!("GPU write 0x{value:08X} to unmodeled MMIO +0x{offset:04X}");
            }
        }
        Ok(())
    }

    fn memfill_control(&mut self, unit: usize, value: u32, sched: &mut Scheduler) {
        if value & 2 != 0 {
            self.memfill[unit].finished = false;
        }
        if value & 1 != 0 {
            self.memfill[unit].fill_width = match (value >> 8) & 3 {
                0 => 2,
                1 => 3,
                _ => 4,
            };
            self.memfill[unit].busy = true;
            self.memfill[unit].finished = false;
            debug!(
                "memfill{unit} kick: 0x{:08X}..0x{:08X} = 0x{:08X} ({}B)",
                self.memfill[unit].start,
                self.memfill[unit].end,
                self.memfill[unit].value,
                self.memfill[unit].fill_width
            );
            sched.schedule(EventKind::MemoryFillComplete(unit), ENGINE_LATENCY);
        }
    }

    /// The single masked-write path into the register bank
    ///
    /// `mask` selects bytes of the 32-bit destination; mask 0 is a no-op
    /// on the stored value. Trigger registers fire their side effects
    /// with the merged value.
    pub fn write_cmd_register(
        &mut self,
        reg: u32,
        param: u32,
        mask: u8,
        mem: &Memory,
        sched: &mut Scheduler,
    ) -> Result<()> {
        let reg = reg & 0x3FF;
        if reg >= 0x300 {
            return Ok(());
        }

        let old = self.ctx.regs[reg as usize];
        let mut value = 0u32;
        for byte in 0..4 {
            let lane = 0xFFu32 << (8 * byte);
            value |= if mask & (1 << byte) != 0 {
                param & lane
            } else {
                old & lane
            };
        }
        self.ctx.regs[reg as usize] = value;

        match reg {
            registers::DRAW_ARRAYS => {
                trace!("draw arrays: {} vertices", self.ctx.vertices);
                self.draw_vtx_array(false, mem)?;
            }
            registers::DRAW_ELEMENTS => {
                trace!("draw elements: {} vertices", self.ctx.vertices);
                self.draw_vtx_array(true, mem)?;
            }
            registers::CMDBUF_SIZE => self.cmd_engine.size = value << 3,
            registers::CMDBUF_ADDR => self.cmd_engine.input_addr = value << 3,
            registers::CMDBUF_JUMP => {
                self.cmd_engine.busy = true;
                debug!(
                    "command list kick: 0x{:08X} ({} bytes)",
                    self.cmd_engine.input_addr, self.cmd_engine.size
                );
                sched.schedule(EventKind::CommandListComplete, ENGINE_LATENCY);
            }
            _ => self.ctx.store(reg, value),
        }
        Ok(())
    }

    /// Route one completed scheduler event to its engine
    pub fn handle_event(
        &mut self,
        kind: EventKind,
        mem: &mut Memory,
        sched: &mut Scheduler,
        irq: &mut InterruptController,
    ) -> Result<()> {
        match kind {
            EventKind::MemoryFillComplete(unit) => {
                self.do_memfill(unit, mem);
                self.memfill[unit].busy = false;
                self.memfill[unit].finished = true;
                irq.assert_irq(if unit == 0 {
                    sources::PSC0
                } else {
                    sources::PSC1
                });
            }
            EventKind::DisplayTransferComplete => {
                self.do_display_transfer(mem);
                self.transfer.busy = false;
                self.transfer.finished = true;
                irq.assert_irq(sources::PPF);
            }
            EventKind::TextureCopyComplete => {
                self.do_texture_copy(mem);
                self.transfer.busy = false;
                self.transfer.finished = true;
                irq.assert_irq(sources::PPF);
            }
            EventKind::CommandListComplete => {
                self.process_command_list(mem, sched)?;
                self.cmd_engine.busy = false;
                irq.assert_irq(sources::P3D);
            }
            EventKind::VBlank => {}
        }
        Ok(())
    }

    /// Replicate the fill value across [start, end)
    fn do_memfill(&mut self, unit: usize, mem: &mut Memory) {
        let fill = self.memfill[unit];
        let width = fill.fill_width.max(2) as u32;
        let mut addr = fill.start;
        while addr + width <= fill.end {
            for byte in 0..width {
                self.mem_write8(mem, addr + byte, (fill.value >> (8 * byte)) as u8);
            }
            addr += width;
        }
    }

    /// Walk a guest-memory command list through the masked-write path
    ///
    /// Entry layout: payload word, then a header holding the register id
    /// (bits 0-15), byte mask (16-19), extra-parameter count (20-30), and
    /// the consecutive-write bit (31). Extra payloads follow, and the
    /// walk re-aligns to 8 bytes after each entry.
    fn process_command_list(&mut self, mem: &Memory, sched: &mut Scheduler) -> Result<()> {
        let mut addr = self.cmd_engine.input_addr;
        let end = addr + self.cmd_engine.size;

        while addr + 8 <= end {
            let param = self.mem_read32(mem, addr);
            let header = self.mem_read32(mem, addr + 4);
            addr += 8;

            let mut reg = header & 0xFFFF;
            let mask = ((header >> 16) & 0xF) as u8;
            let extra = (header >> 20) & 0x7FF;
            let consecutive = header & (1 << 31) != 0;

            self.write_cmd_register(reg, param, mask, mem, sched)?;
            for _ in 0..extra {
                if consecutive {
                    reg += 1;
                }
                let payload = self.mem_read32(mem, addr);
                addr += 4;
                self.write_cmd_register(reg, payload, mask, mem, sched)?;
            }
            addr = (addr + 7) & !7;
        }
        Ok(())
    }

    /// Format-converting 2D blit between linear and 8x8-tiled layouts
    fn do_display_transfer(&mut self, mem: &mut Memory) {
        let t = self.transfer;
        let in_fmt = ((t.flags >> 8) & 0x7) as u8;
        let out_fmt = ((t.flags >> 12) & 0x7) as u8;
        let vflip = t.flags & 1 != 0;
        let to_tiled = t.flags & 2 != 0;

        if t.disp_input_width == 0 || t.disp_input_height == 0 {
            return;
        }
        let width = t.disp_output_width.min(t.disp_input_width);
        let height = t.disp_output_height.min(t.disp_input_height);

        for y in 0..height {
            for x in 0..width {
                let src_y = if vflip { t.disp_input_height - 1 - y } else { y };
                let src = if to_tiled {
                    // Linear input
                    t.input_addr + (src_y * t.disp_input_width + x) * color_bytes(in_fmt)
                } else {
                    swizzled_tile_addr(t.input_addr, t.disp_input_width, x, src_y, color_bytes(in_fmt))
                };
                let color = self.decode_color_at(mem, in_fmt, src);

                let dst = if to_tiled {
                    swizzled_tile_addr(t.output_addr, width, x, y, color_bytes(out_fmt))
                } else {
                    t.output_addr + (y * width + x) * color_bytes(out_fmt)
                };
                self.encode_color_at(mem, out_fmt, dst, color);
            }
        }
    }

    /// Raw strided copy (texture-copy mode)
    fn do_texture_copy(&mut self, mem: &mut Memory) {
        let t = self.transfer;
        let mut src = t.input_addr;
        let mut dst = t.output_addr;
        let mut src_line = 0;
        let mut dst_line = 0;

        for _ in 0..t.tc_size {
            let byte = self.mem_read8(mem, src);
            self.mem_write8(mem, dst, byte);

            src += 1;
            src_line += 1;
            if t.tc_input_width != 0 && src_line == t.tc_input_width {
                src_line = 0;
                src += t.tc_input_gap;
            }

            dst += 1;
            dst_line += 1;
            if t.tc_output_width != 0 && dst_line == t.tc_output_width {
                dst_line = 0;
                dst += t.tc_output_gap;
            }
        }
    }

    /// Read one pixel in `fmt` at a guest address
    pub(crate) fn decode_color_at(&self, mem: &Memory, fmt: u8, addr: u32) -> registers::Rgba {
        use registers::Rgba;
        match fmt {
            0 => {
                // RGBA8: bytes A, B, G, R
                let w = self.mem_read32(mem, addr);
                Rgba::new(
                    ((w >> 24) & 0xFF) as i32,
                    ((w >> 16) & 0xFF) as i32,
                    ((w >> 8) & 0xFF) as i32,
                    (w & 0xFF) as i32,
                )
            }
            1 => {
                // RGB8: bytes B, G, R
                let b = self.mem_read8(mem, addr) as i32;
                let g = self.mem_read8(mem, addr + 1) as i32;
                let r = self.mem_read8(mem, addr + 2) as i32;
                Rgba::new(r, g, b, 255)
            }
            2 => {
                // RGB565
                let w = self.mem_read16(mem, addr) as i32;
                Rgba::new(
                    expand5((w >> 11) & 0x1F),
                    expand6((w >> 5) & 0x3F),
                    expand5(w & 0x1F),
                    255,
                )
            }
            3 => {
                // RGBA5551
                let w = self.mem_read16(mem, addr) as i32;
                Rgba::new(
                    expand5((w >> 11) & 0x1F),
                    expand5((w >> 6) & 0x1F),
                    expand5((w >> 1) & 0x1F),
                    if w & 1 != 0 { 255 } else { 0 },
                )
            }
            _ => {
                // RGBA4
                let w = self.mem_read16(mem, addr) as i32;
                Rgba::new(
                    expand4((w >> 12) & 0xF),
                    expand4((w >> 8) & 0xF),
                    expand4((w >> 4) & 0xF),
                    expand4(w & 0xF),
                )
            }
        }
    }

    /// Write one pixel in `fmt` at a guest address
    pub(crate) fn encode_color_at(
        &mut self,
        mem: &mut Memory,
        fmt: u8,
        addr: u32,
        color: registers::Rgba,
    ) {
        let c = color.clamped();
        match fmt {
            0 => {
                let w = ((c.r as u32) << 24) | ((c.g as u32) << 16) | ((c.b as u32) << 8) | c.a as u32;
                for (k, b) in w.to_le_bytes().into_iter().enumerate() {
                    self.mem_write8(mem, addr + k as u32, b);
                }
            }
            1 => {
                self.mem_write8(mem, addr, c.b as u8);
                self.mem_write8(mem, addr + 1, c.g as u8);
                self.mem_write8(mem, addr + 2, c.r as u8);
            }
            2 => {
                let w = (((c.r >> 3) as u16) << 11) | (((c.g >> 2) as u16) << 5) | (c.b >> 3) as u16;
                self.mem_write8(mem, addr, w as u8);
                self.mem_write8(mem, addr + 1, (w >> 8) as u8);
            }
            3 => {
                let w = (((c.r >> 3) as u16) << 11)
                    | (((c.g >> 3) as u16) << 6)
                    | (((c.b >> 3) as u16) << 1)
                    | (c.a >= 128) as u16;
                self.mem_write8(mem, addr, w as u8);
                self.mem_write8(mem, addr + 1, (w >> 8) as u8);
            }
            _ => {
                let w = (((c.r >> 4) as u16) << 12)
                    | (((c.g >> 4) as u16) << 8)
                    | (((c.b >> 4) as u16) << 4)
                    | (c.a >> 4) as u16;
                self.mem_write8(mem, addr, w as u8);
                self.mem_write8(mem, addr + 1, (w >> 8) as u8);
            }
        }
    }
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes per pixel for the display/framebuffer formats
pub fn color_bytes(fmt: u8) -> u32 {
    match fmt {
        0 => 4,
        1 => 3,
        _ => 2,
    }
}

#[inline(always)]
pub(crate) fn expand4(v: i32) -> i32 {
    (v << 4) | v
}

#[inline(always)]
pub(crate) fn expand5(v: i32) -> i32 {
    (v << 3) | (v >> 2)
}

#[inline(always)]
pub(crate) fn expand6(v: i32) -> i32 {
    (v << 2) | (v >> 4)
}

/// Z-order offset of a pixel inside its 8x8 tile
#[inline(always)]
fn morton_offset(x: u32, y: u32) -> u32 {
    let x = x & 7;
    let y = y & 7;
    (x & 1)
        | ((y & 1) << 1)
        | ((x & 2) << 1)
        | ((y & 2) << 2)
        | ((x & 4) << 2)
        | ((y & 4) << 3)
}

/// Address of an (x, y) entry in an 8x8 swizzled-tile image
///
/// Tiles are laid out row-major; `size` is the bytes per entry.
pub fn swizzled_tile_addr(base: u32, width: u32, x: u32, y: u32, size: u32) -> u32 {
    let tiles_per_row = (width / 8).max(1);
    let tile = (y / 8) * tiles_per_row + (x / 8);
    base + (tile * 64 + morton_offset(x, y)) * size
}

/// Byte address and nibble selector for 4-bit tile entries
pub fn swizzled_tile_addr_4bit(base: u32, width: u32, x: u32, y: u32) -> (u32, bool) {
    let tiles_per_row = (width / 8).max(1);
    let tile = (y / 8) * tiles_per_row + (x / 8);
    let index = tile * 64 + morton_offset(x, y);
    (base + index / 2, index & 1 != 0)
}
