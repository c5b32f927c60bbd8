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

//! Fragment stage: texturing, combining, depth/stencil, blending
//!
//! Per covered pixel: sample the enabled texture units, feed primary
//! color and texels through the six-stage combiner, run the stencil and
//! depth tests against the packed 24+8 depth buffer, then blend into the
//! RGBA8 color buffer.
//!
//! Guest-visible oddities are defined outputs, not errors: unsupported
//! texture formats sample the border color, out-of-range combiner
//! arithmetic clamps.

use super::rasterizer::Vertex;
use super::registers::Rgba;
use super::{expand4, expand5, expand6, swizzled_tile_addr, swizzled_tile_addr_4bit, Gpu};

/// Comparison functions shared by the depth and stencil tests
fn compare(func: u8, incoming: u32, stored: u32) -> bool {
    match func {
        0 => false,            // never
        1 => true,             // always
        2 => incoming == stored,
        3 => incoming != stored,
        4 => incoming < stored,
        5 => incoming <= stored,
        6 => incoming > stored,
        _ => incoming >= stored,
    }
}

/// Convert a shader-space color (0.0-1.0 per lane) to integer RGBA
fn rgba_from_color(color: &super::vector::Vec4<super::float24::Float24>) -> Rgba {
    Rgba::new(
        (color.x.to_f32() * 255.0) as i32,
        (color.y.to_f32() * 255.0) as i32,
        (color.z.to_f32() * 255.0) as i32,
        (color.w.to_f32() * 255.0) as i32,
    )
    .clamped()
}

impl Gpu {
    /// Shade one covered pixel and write it to the color buffer
    pub(crate) fn shade_fragment(&mut self, x: u32, y: u32, frag: &Vertex) {
        let width = self.ctx.frame_width as u32;
        let primary = rgba_from_color(&frag.color);

        let mut tex = [Rgba::new(0, 0, 0, 255); 3];
        for unit in 0..3 {
            if self.ctx.tex_enable[unit] {
                tex[unit] = self.sample_texture(unit, frag);
            }
        }

        let source = self.combine_textures(primary, &tex);

        // Depth buffer entries pack 24-bit depth under an 8-bit stencil
        let z = frag.pos.z.to_f32().abs().clamp(0.0, 1.0);
        let depth = (z * 16_777_215.0) as u32;
        let depth_addr = self.ctx.depth_buffer_base + (y * width + x) * 4;
        let stored = self.read_vram32(depth_addr);
        let stored_depth = stored & 0xFF_FFFF;
        let stored_stencil = stored >> 24;

        if self.ctx.stencil_enable
            && !compare(self.ctx.stencil_func, self.ctx.stencil_ref as u32, stored_stencil)
        {
            return;
        }
        if self.ctx.depth_test_enable && !compare(self.ctx.depth_func, depth, stored_depth) {
            return;
        }
        if self.ctx.depth_write {
            self.write_vram32(depth_addr, (stored_stencil << 24) | depth);
        }

        // Blend against the RGBA8 color buffer
        let color_addr = self.ctx.color_buffer_base + (y * width + x) * 4;
        let word = self.read_vram32(color_addr);
        let dst = Rgba::new(
            ((word >> 24) & 0xFF) as i32,
            ((word >> 16) & 0xFF) as i32,
            ((word >> 8) & 0xFF) as i32,
            (word & 0xFF) as i32,
        );

        let out = self.blend_fragment(source, dst).clamped();
        let encoded = ((out.r as u32) << 24)
            | ((out.g as u32) << 16)
            | ((out.b as u32) << 8)
            | out.a as u32;
        self.write_vram32(color_addr, encoded);
    }

    /// Sample one texture unit at the fragment's interpolated coordinates
    ///
    /// Repeat wrapping; 8x8 swizzled-tile addressing; compressed formats
    /// fall back to the unit's border color.
    pub(crate) fn sample_texture(&self, unit: usize, frag: &Vertex) -> Rgba {
        let width = self.ctx.tex_width[unit];
        let height = self.ctx.tex_height[unit];
        if width == 0 || height == 0 {
            return self.ctx.tex_border[unit];
        }

        let tc = frag.texcoords[unit];
        let u = (tc.x.to_f32() * width as f32) as i64;
        let v = (tc.y.to_f32() * height as f32) as i64;
        let u = u.rem_euclid(width as i64) as u32;
        let v = v.rem_euclid(height as i64) as u32;
        // Texture rows are stored bottom-up
        let row = height - 1 - v;

        let base = self.ctx.tex_addr[unit];
        match self.ctx.tex_type[unit] {
            0 => {
                // RGBA8
                let addr = swizzled_tile_addr(base, width, u, row, 4);
                let w = self.read_vram32(addr);
                Rgba::new(
                    ((w >> 24) & 0xFF) as i32,
                    ((w >> 16) & 0xFF) as i32,
                    ((w >> 8) & 0xFF) as i32,
                    (w & 0xFF) as i32,
                )
            }
            1 => {
                // RGB8
                let addr = swizzled_tile_addr(base, width, u, row, 3);
                Rgba::new(
                    self.read_vram8(addr + 2) as i32,
                    self.read_vram8(addr + 1) as i32,
                    self.read_vram8(addr) as i32,
                    255,
                )
            }
            2 => {
                // RGBA5551
                let w = self.read_vram16(swizzled_tile_addr(base, width, u, row, 2)) as i32;
                Rgba::new(
                    expand5((w >> 11) & 0x1F),
                    expand5((w >> 6) & 0x1F),
                    expand5((w >> 1) & 0x1F),
                    if w & 1 != 0 { 255 } else { 0 },
                )
            }
            3 => {
                // RGB565
                let w = self.read_vram16(swizzled_tile_addr(base, width, u, row, 2)) as i32;
                Rgba::new(
                    expand5((w >> 11) & 0x1F),
                    expand6((w >> 5) & 0x3F),
                    expand5(w & 0x1F),
                    255,
                )
            }
            4 => {
                // RGBA4
                let w = self.read_vram16(swizzled_tile_addr(base, width, u, row, 2)) as i32;
                Rgba::new(
                    expand4((w >> 12) & 0xF),
                    expand4((w >> 8) & 0xF),
                    expand4((w >> 4) & 0xF),
                    expand4(w & 0xF),
                )
            }
            5 => {
                // IA8: intensity high byte, alpha low
                let w = self.read_vram16(swizzled_tile_addr(base, width, u, row, 2)) as i32;
                let i = (w >> 8) & 0xFF;
                Rgba::new(i, i, i, w & 0xFF)
            }
            6 => {
                // RG8
                let w = self.read_vram16(swizzled_tile_addr(base, width, u, row, 2)) as i32;
                Rgba::new((w >> 8) & 0xFF, w & 0xFF, 0, 255)
            }
            7 => {
                // I8
                let i = self.read_vram8(swizzled_tile_addr(base, width, u, row, 1)) as i32;
                Rgba::new(i, i, i, 255)
            }
            8 => {
                // A8
                let a = self.read_vram8(swizzled_tile_addr(base, width, u, row, 1)) as i32;
                Rgba::new(0, 0, 0, a)
            }
            9 => {
                // IA4
                let w = self.read_vram8(swizzled_tile_addr(base, width, u, row, 1)) as i32;
                Rgba::new(
                    expand4((w >> 4) & 0xF),
                    expand4((w >> 4) & 0xF),
                    expand4((w >> 4) & 0xF),
                    expand4(w & 0xF),
                )
            }
            10 => {
                // I4
                let (addr, hi) = swizzled_tile_addr_4bit(base, width, u, row);
                let nibble = nibble_of(self.read_vram8(addr), hi);
                let i = expand4(nibble);
                Rgba::new(i, i, i, 255)
            }
            11 => {
                // A4
                let (addr, hi) = swizzled_tile_addr_4bit(base, width, u, row);
                let nibble = nibble_of(self.read_vram8(addr), hi);
                Rgba::new(0, 0, 0, expand4(nibble))
            }
            _ => self.ctx.tex_border[unit],
        }
    }

    /// Run the six combiner stages
    ///
    /// Each stage picks three RGB and three alpha sources, shapes them
    /// through operand selectors, applies its operation, scales, and
    /// clamps; the result feeds the next stage as "previous".
    pub(crate) fn combine_textures(&self, primary: Rgba, tex: &[Rgba; 3]) -> Rgba {
        let mut prev = primary;

        for stage in 0..6 {
            let fetch = |code: u8| -> Rgba {
                match code {
                    0 | 1 | 2 => primary,
                    3 => tex[0],
                    4 => tex[1],
                    5 => tex[2],
                    13 => primary, // combiner buffer seeds from primary
                    14 => self.ctx.texcomb_const[stage],
                    _ => prev,
                }
            };

            let mut rgb_args = [[0i32; 3]; 3];
            let mut alpha_args = [0i32; 3];
            for src in 0..3 {
                let rgb_in = fetch(self.ctx.texcomb_rgb_source[stage][src]);
                rgb_args[src] =
                    rgb_operand(self.ctx.texcomb_rgb_operand[stage][src], rgb_in);
                let alpha_in = fetch(self.ctx.texcomb_alpha_source[stage][src]);
                alpha_args[src] =
                    alpha_operand(self.ctx.texcomb_alpha_operand[stage][src], alpha_in);
            }

            let rgb = combiner_op_rgb(self.ctx.texcomb_rgb_op[stage], &rgb_args);
            let alpha = combiner_op_scalar(self.ctx.texcomb_alpha_op[stage], &alpha_args);

            let rgb_scale = 1 << self.ctx.texcomb_rgb_scale[stage];
            let alpha_scale = 1 << self.ctx.texcomb_alpha_scale[stage];
            prev = Rgba::new(
                rgb[0] * rgb_scale,
                rgb[1] * rgb_scale,
                rgb[2] * rgb_scale,
                alpha * alpha_scale,
            )
            .clamped();
        }
        prev
    }

    /// Blend a combiner result against the stored framebuffer color
    pub(crate) fn blend_fragment(&self, src: Rgba, dst: Rgba) -> Rgba {
        let ctx = &self.ctx;
        let (sr, sg, sb) = blend_factor_rgb(ctx.blend_rgb_src_func, src, dst, ctx.blend_color);
        let (dr, dg, db) = blend_factor_rgb(ctx.blend_rgb_dst_func, src, dst, ctx.blend_color);
        let sa = blend_factor_alpha(ctx.blend_alpha_src_func, src, dst, ctx.blend_color);
        let da = blend_factor_alpha(ctx.blend_alpha_dst_func, src, dst, ctx.blend_color);

        let r = blend_equation(ctx.blend_rgb_equation, src.r, dst.r, sr, dr);
        let g = blend_equation(ctx.blend_rgb_equation, src.g, dst.g, sg, dg);
        let b = blend_equation(ctx.blend_rgb_equation, src.b, dst.b, sb, db);
        let a = blend_equation(ctx.blend_alpha_equation, src.a, dst.a, sa, da);
        Rgba::new(r, g, b, a)
    }
}

/// RGB operand selector: color, inverted color, or a broadcast channel
fn rgb_operand(code: u8, c: Rgba) -> [i32; 3] {
    match code {
        0 => [c.r, c.g, c.b],
        1 => [255 - c.r, 255 - c.g, 255 - c.b],
        2 => [c.a; 3],
        3 => [255 - c.a; 3],
        4 => [c.r; 3],
        5 => [255 - c.r; 3],
        8 => [c.g; 3],
        9 => [255 - c.g; 3],
        12 => [c.b; 3],
        13 => [255 - c.b; 3],
        _ => [c.r, c.g, c.b],
    }
}

/// Alpha operand selector
fn alpha_operand(code: u8, c: Rgba) -> i32 {
    match code {
        0 => c.a,
        1 => 255 - c.a,
        2 => c.r,
        3 => 255 - c.r,
        4 => c.g,
        5 => 255 - c.g,
        6 => c.b,
        _ => 255 - c.b,
    }
}

fn combiner_op_scalar(op: u8, args: &[i32; 3]) -> i32 {
    match op {
        0 => args[0],
        1 => args[0] * args[1] / 255,
        2 => args[0] + args[1],
        3 => args[0] + args[1] - 128,
        4 => (args[0] * args[2] + args[1] * (255 - args[2])) / 255,
        5 => args[0] - args[1],
        _ => args[0],
    }
}

fn combiner_op_rgb(op: u8, args: &[[i32; 3]; 3]) -> [i32; 3] {
    match op {
        6 | 7 => {
            // Dot3: a signed dot product re-centered around 0.5
            let dot = (0..3)
                .map(|c| (args[0][c] - 128) * (args[1][c] - 128))
                .sum::<i32>()
                * 4
                / 255;
            [dot; 3]
        }
        _ => {
            let mut out = [0; 3];
            for c in 0..3 {
                out[c] = combiner_op_scalar(op, &[args[0][c], args[1][c], args[2][c]]);
            }
            out
        }
    }
}

/// RGB blend factor per channel
fn blend_factor_rgb(code: u8, src: Rgba, dst: Rgba, constant: Rgba) -> (i32, i32, i32) {
    match code {
        0 => (0, 0, 0),
        1 => (255, 255, 255),
        2 => (src.r, src.g, src.b),
        3 => (255 - src.r, 255 - src.g, 255 - src.b),
        4 => (dst.r, dst.g, dst.b),
        5 => (255 - dst.r, 255 - dst.g, 255 - dst.b),
        6 => (src.a, src.a, src.a),
        7 => (255 - src.a, 255 - src.a, 255 - src.a),
        8 => (dst.a, dst.a, dst.a),
        9 => (255 - dst.a, 255 - dst.a, 255 - dst.a),
        10 => (constant.r, constant.g, constant.b),
        11 => (255 - constant.r, 255 - constant.g, 255 - constant.b),
        12 => (constant.a, constant.a, constant.a),
        13 => (255 - constant.a, 255 - constant.a, 255 - constant.a),
        _ => {
            let f = src.a.min(255 - dst.a);
            (f, f, f)
        }
    }
}

/// Alpha blend factor
fn blend_factor_alpha(code: u8, src: Rgba, dst: Rgba, constant: Rgba) -> i32 {
    match code {
        0 => 0,
        1 => 255,
        2 | 6 => src.a,
        3 | 7 => 255 - src.a,
        4 | 8 => dst.a,
        5 | 9 => 255 - dst.a,
        10 | 12 => constant.a,
        11 | 13 => 255 - constant.a,
        _ => 255,
    }
}

/// Apply one blend equation to a single channel
fn blend_equation(eq: u8, src: i32, dst: i32, src_factor: i32, dst_factor: i32) -> i32 {
    match eq {
        1 => (src * src_factor - dst * dst_factor) / 255,
        2 => (dst * dst_factor - src * src_factor) / 255,
        3 => src.min(dst),
        4 => src.max(dst),
        _ => (src * src_factor + dst * dst_factor) / 255,
    }
}

#[inline(always)]
fn nibble_of(byte: u8, high: bool) -> i32 {
    if high {
        (byte >> 4) as i32
    } else {
        (byte & 0xF) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::float24::Float24;
    use crate::core::gpu::vector::Vec4;

    fn gpu_with_stage0(source: u32, operand: u32, op: u32, scale: u32) -> Gpu {
        let mut gpu = Gpu::new();
        gpu.ctx.store(crate::core::gpu::registers::TEXCOMB0_BASE, source);
        gpu.ctx.store(crate::core::gpu::registers::TEXCOMB0_BASE + 1, operand);
        gpu.ctx.store(crate::core::gpu::registers::TEXCOMB0_BASE + 2, op);
        gpu.ctx.store(crate::core::gpu::registers::TEXCOMB0_BASE + 4, scale);
        // Stages 1-5 pass through the previous result
        for stage in 1..6 {
            let base = if stage < 4 {
                crate::core::gpu::registers::TEXCOMB0_BASE + 8 * stage
            } else {
                crate::core::gpu::registers::TEXCOMB4_BASE + 8 * (stage - 4)
            };
            gpu.ctx.store(base, 0x000F_000F);
            gpu.ctx.store(base + 2, 0);
        }
        gpu
    }

    #[test]
    fn test_combiner_modulate_primary_with_texture() {
        // Stage 0: rgb/alpha sources (primary, tex0), op modulate
        let mut gpu = gpu_with_stage0(0x0030_0030, 0, (1 << 16) | 1, 0);
        gpu.ctx.texcomb_rgb_source[0] = [0, 3, 0];
        gpu.ctx.texcomb_alpha_source[0] = [0, 3, 0];

        let primary = Rgba::new(255, 128, 0, 255);
        let tex = [Rgba::new(128, 255, 255, 128), Rgba::default(), Rgba::default()];
        let out = gpu.combine_textures(primary, &tex);
        assert_eq!(out, Rgba::new(128, 128, 0, 128));
    }

    #[test]
    fn test_combiner_interpolate() {
        // interpolate(a0, a1, a2): a2 = 255 picks a0 entirely
        let mut gpu = gpu_with_stage0(0, 0, 4, 0);
        gpu.ctx.texcomb_rgb_source[0] = [3, 4, 5];
        gpu.ctx.texcomb_alpha_source[0] = [3, 4, 5];

        let tex = [
            Rgba::new(200, 10, 30, 100),
            Rgba::new(0, 250, 90, 200),
            Rgba::new(255, 255, 255, 255),
        ];
        let out = gpu.combine_textures(Rgba::default(), &tex);
        assert_eq!(out, Rgba::new(200, 10, 30, 100));
    }

    #[test]
    fn test_combiner_scale_clamps() {
        // add with x4 scale overflows into the clamp
        let mut gpu = gpu_with_stage0(0, 0, (0 << 16) | 2, (0 << 16) | 2);
        gpu.ctx.texcomb_rgb_source[0] = [3, 4, 0];
        gpu.ctx.texcomb_alpha_source[0] = [3, 3, 3];

        let tex = [
            Rgba::new(100, 100, 100, 200),
            Rgba::new(100, 2, 0, 0),
            Rgba::default(),
        ];
        let out = gpu.combine_textures(Rgba::default(), &tex);
        assert_eq!(out, Rgba::new(255, 255, 255, 200));
    }

    #[test]
    fn test_combiner_unused_source_does_not_affect_output() {
        // Stage 0 replaces with primary: the texture sources are unused
        let mut gpu = gpu_with_stage0(0, 0, 0, 0);
        gpu.ctx.texcomb_rgb_source[0] = [0, 0, 0];
        gpu.ctx.texcomb_alpha_source[0] = [0, 0, 0];

        let primary = Rgba::new(12, 34, 56, 78);
        let out_a = gpu.combine_textures(primary, &[Rgba::new(1, 2, 3, 4); 3]);
        let out_b = gpu.combine_textures(primary, &[Rgba::new(200, 100, 50, 25); 3]);
        assert_eq!(out_a, out_b);
        assert_eq!(out_a, primary);

        // Changing an unused constant register is also invisible
        gpu.ctx.texcomb_const[0] = Rgba::new(99, 99, 99, 99);
        let out_c = gpu.combine_textures(primary, &[Rgba::new(1, 2, 3, 4); 3]);
        assert_eq!(out_c, out_a);
    }

    #[test]
    fn test_combiner_dot3() {
        let mut gpu = gpu_with_stage0(0, 0, 6, 0);
        gpu.ctx.texcomb_rgb_source[0] = [3, 4, 0];
        gpu.ctx.texcomb_alpha_source[0] = [0, 0, 0];

        // Both vectors point straight "up" in tangent space
        let tex = [
            Rgba::new(128, 128, 255, 255),
            Rgba::new(128, 128, 255, 255),
            Rgba::default(),
        ];
        let out = gpu.combine_textures(Rgba::new(0, 0, 0, 255), &tex);
        let expected = (127 * 127) * 4 / 255;
        assert_eq!(out.r, expected.clamp(0, 255));
        assert_eq!(out.r, out.g);
        assert_eq!(out.g, out.b);
    }

    #[test]
    fn test_blend_one_zero_passes_source() {
        let gpu = Gpu::new(); // defaults: src factor one, dst zero, add
        let src = Rgba::new(10, 20, 30, 40);
        let dst = Rgba::new(200, 200, 200, 200);
        assert_eq!(gpu.blend_fragment(src, dst), src);
    }

    #[test]
    fn test_blend_additive_and_min_max() {
        let mut gpu = Gpu::new();
        gpu.ctx.blend_rgb_src_func = 1;
        gpu.ctx.blend_rgb_dst_func = 1;
        gpu.ctx.blend_alpha_src_func = 1;
        gpu.ctx.blend_alpha_dst_func = 1;

        let src = Rgba::new(100, 10, 0, 50);
        let dst = Rgba::new(50, 5, 1, 60);
        assert_eq!(gpu.blend_fragment(src, dst), Rgba::new(150, 15, 1, 110));

        gpu.ctx.blend_rgb_equation = 3; // min
        gpu.ctx.blend_alpha_equation = 4; // max
        assert_eq!(gpu.blend_fragment(src, dst), Rgba::new(50, 5, 0, 60));
    }

    #[test]
    fn test_blend_src_alpha_over() {
        let mut gpu = Gpu::new();
        gpu.ctx.blend_rgb_src_func = 6; // src alpha
        gpu.ctx.blend_rgb_dst_func = 7; // 1 - src alpha

        let src = Rgba::new(255, 0, 0, 255);
        let dst = Rgba::new(0, 255, 0, 255);
        // Fully opaque source wins (up to /255 rounding)
        let out = gpu.blend_fragment(src, dst);
        assert_eq!(out, Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_depth_compare_functions() {
        assert!(!compare(0, 1, 1));
        assert!(compare(1, 1, 1));
        assert!(compare(2, 5, 5));
        assert!(compare(3, 5, 6));
        assert!(compare(4, 4, 5));
        assert!(compare(5, 5, 5));
        assert!(compare(6, 6, 5));
        assert!(compare(7, 5, 5));
    }

    #[test]
    fn test_sample_i8_texture_swizzled() {
        let mut gpu = Gpu::new();
        gpu.ctx.tex_enable[0] = true;
        gpu.ctx.tex_width[0] = 8;
        gpu.ctx.tex_height[0] = 8;
        gpu.ctx.tex_addr[0] = 0x1800_0000;
        gpu.ctx.tex_type[0] = 7; // I8

        // Texel (1, 0) of the *bottom-up* image lives at row 7, morton 5
        let addr = swizzled_tile_addr(0x1800_0000, 8, 1, 7, 1);
        gpu.write_vram8(addr, 0x77);

        let mut frag = Vertex::default();
        frag.texcoords[0] = Vec4::new(
            Float24::from_f32(1.5 / 8.0),
            Float24::from_f32(0.5 / 8.0),
            Float24::ZERO,
            Float24::ZERO,
        );
        let c = gpu.sample_texture(0, &frag);
        assert_eq!(c, Rgba::new(0x77, 0x77, 0x77, 255));
    }

    #[test]
    fn test_sample_rgba8_texture() {
        let mut gpu = Gpu::new();
        gpu.ctx.tex_enable[0] = true;
        gpu.ctx.tex_width[0] = 8;
        gpu.ctx.tex_height[0] = 8;
        gpu.ctx.tex_addr[0] = 0x1800_0000;
        gpu.ctx.tex_type[0] = 0;

        let addr = swizzled_tile_addr(0x1800_0000, 8, 0, 7, 4);
        // r=0x11 g=0x22 b=0x33 a=0x44, packed r-high
        gpu.write_vram32(addr, 0x1122_3344);

        let mut frag = Vertex::default();
        frag.texcoords[0] = Vec4::new(
            Float24::from_f32(0.5 / 8.0),
            Float24::from_f32(0.5 / 8.0),
            Float24::ZERO,
            Float24::ZERO,
        );
        let c = gpu.sample_texture(0, &frag);
        assert_eq!(c, Rgba::new(0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_unsupported_texture_format_uses_border() {
        let mut gpu = Gpu::new();
        gpu.ctx.tex_enable[0] = true;
        gpu.ctx.tex_width[0] = 8;
        gpu.ctx.tex_height[0] = 8;
        gpu.ctx.tex_type[0] = 12; // ETC1
        gpu.ctx.tex_border[0] = Rgba::new(1, 2, 3, 4);

        let frag = Vertex::default();
        assert_eq!(gpu.sample_texture(0, &frag), Rgba::new(1, 2, 3, 4));
    }
}
