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

//! Framebuffer presenter
//!
//! Once per frame, expand each screen's active color buffer (RGBA8,
//! RGB8, RGB565, RGBA5551, or RGBA4) into the linear RGBA8 surfaces the
//! presentation collaborator reads. Rotation and scaling are the
//! collaborator's problem; the core hands over raw 240-wide rows.

use super::{color_bytes, Gpu, BOTTOM_HEIGHT, SCREEN_WIDTH, TOP_HEIGHT};
use crate::core::memory::Memory;

impl Gpu {
    /// Present both screens from their selected buffers
    pub fn render_frame(&mut self, mem: &Memory) {
        self.render_screen(mem, 0, TOP_HEIGHT);
        self.render_screen(mem, 1, BOTTOM_HEIGHT);
    }

    fn render_screen(&mut self, mem: &Memory, screen: usize, height: usize) {
        let cfg = self.framebuffers[screen];
        let base = if cfg.buffer_select {
            cfg.left_addr_b
        } else {
            cfg.left_addr_a
        };
        if base == 0 {
            return;
        }
        let bpp = color_bytes(cfg.color_format);

        for y in 0..height {
            for x in 0..SCREEN_WIDTH {
                let src = base + ((y * SCREEN_WIDTH + x) as u32) * bpp;
                let c = self.decode_color_at(mem, cfg.color_format, src).clamped();
                let i = (y * SCREEN_WIDTH + x) * 4;
                let out = if screen == 0 {
                    &mut self.top_screen
                } else {
                    &mut self.bottom_screen
                };
                out[i] = c.r as u8;
                out[i + 1] = c.g as u8;
                out[i + 2] = c.b as u8;
                out[i + 3] = c.a as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_rgb565_expands_channels() {
        let mut gpu = Gpu::new();
        let mem = Memory::new();
        gpu.framebuffers[0].left_addr_a = 0x1800_0000;
        gpu.framebuffers[0].color_format = 2;

        // Pure red at (0,0), pure green at (1,0)
        gpu.write_vram16(0x1800_0000, 0xF800);
        gpu.write_vram16(0x1800_0002, 0x07E0);

        gpu.render_frame(&mem);

        let top = gpu.top_buffer();
        assert_eq!(&top[0..4], &[255, 0, 0, 255]);
        assert_eq!(&top[4..8], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_buffer_select_switches_source() {
        let mut gpu = Gpu::new();
        let mem = Memory::new();
        gpu.framebuffers[1].left_addr_a = 0x1800_0000;
        gpu.framebuffers[1].left_addr_b = 0x1810_0000;
        gpu.framebuffers[1].color_format = 0;

        // Buffer A black, buffer B white at the first pixel
        gpu.write_vram32(0x1800_0000, 0x0000_00FF);
        gpu.write_vram32(0x1810_0000, 0xFFFF_FFFF);

        gpu.render_frame(&mem);
        assert_eq!(&gpu.bottom_buffer()[0..4], &[0, 0, 0, 255]);

        gpu.framebuffers[1].buffer_select = true;
        gpu.render_frame(&mem);
        assert_eq!(&gpu.bottom_buffer()[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_present_rgba4() {
        let mut gpu = Gpu::new();
        let mem = Memory::new();
        gpu.framebuffers[0].left_addr_a = 0x1800_0000;
        gpu.framebuffers[0].color_format = 4;

        gpu.write_vram16(0x1800_0000, 0xF0F0); // r = F, b = F
        gpu.render_frame(&mem);
        assert_eq!(&gpu.top_buffer()[0..4], &[255, 0, 255, 0]);
    }
}
