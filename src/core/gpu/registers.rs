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

//! GPU register bank and decoded pipeline state
//!
//! Every observable pipeline register lives in a flat `[u32; 0x300]`
//! bank, written only through the masked-write routine. Frequently-read
//! configuration is decoded once at write time into shadow fields here so
//! the hot paths (vertex fetch, rasterizer, combiner) never re-parse raw
//! words.
//!
//! Register ids follow the hardware numbering; the named constants below
//! are the ones with side effects or decoded shadows.

use super::float24::Float24;
use super::rasterizer::Vertex;
use super::shader::ShaderUnit;
use super::vector::Vec4;

// Rasterizer
pub const VIEWPORT_WIDTH: u32 = 0x041;
pub const VIEWPORT_INVW: u32 = 0x042;
pub const VIEWPORT_HEIGHT: u32 = 0x043;
pub const VIEWPORT_INVH: u32 = 0x044;
pub const SH_OUTMAP_TOTAL: u32 = 0x04F;
pub const SH_OUTMAP_BASE: u32 = 0x050; // 0x050-0x056
pub const VIEWPORT_XY: u32 = 0x068;

// Texture units
pub const TEX_UNIT_CONFIG: u32 = 0x080;
pub const TEX0_BORDER: u32 = 0x081;
pub const TEX0_DIM: u32 = 0x082;
pub const TEX0_ADDR1: u32 = 0x085;
pub const TEX0_ADDR2: u32 = 0x086; // 0x086-0x089: mip levels 2-5
pub const TEX0_TYPE: u32 = 0x08E;
pub const TEX1_BORDER: u32 = 0x091;
pub const TEX1_DIM: u32 = 0x092;
pub const TEX1_ADDR: u32 = 0x095;
pub const TEX1_TYPE: u32 = 0x096;
pub const TEX2_BORDER: u32 = 0x099;
pub const TEX2_DIM: u32 = 0x09A;
pub const TEX2_ADDR: u32 = 0x09D;
pub const TEX2_TYPE: u32 = 0x09E;

// Texture combiner: stages 0-3 at 0x0C0+8i, stages 4-5 at 0x0F0+8(i-4)
pub const TEXCOMB0_BASE: u32 = 0x0C0;
pub const TEXCOMB4_BASE: u32 = 0x0F0;

// Fragment operations
pub const COLOR_OPERATION: u32 = 0x100;
pub const BLEND_CONFIG: u32 = 0x101;
pub const BLEND_COLOR: u32 = 0x103;
pub const STENCIL_TEST: u32 = 0x105;
pub const DEPTH_COLOR_MASK: u32 = 0x107;

// Framebuffer
pub const DEPTH_BUFFER_BASE: u32 = 0x11C;
pub const COLOR_BUFFER_BASE: u32 = 0x11D;
pub const FRAMEBUFFER_DIM: u32 = 0x11E;

// Geometry pipeline
pub const ATTR_BUFFER_BASE: u32 = 0x200;
pub const ATTR_FORMAT_LOW: u32 = 0x201;
pub const ATTR_FORMAT_HIGH: u32 = 0x202;
pub const ATTR_BUFFER0_OFFSET: u32 = 0x203; // 3 regs per buffer, 12 buffers
pub const INDEX_BUFFER_CONFIG: u32 = 0x227;
pub const VERTEX_COUNT: u32 = 0x228;
pub const VERTEX_OFFSET: u32 = 0x22A;
pub const DRAW_ARRAYS: u32 = 0x22E;
pub const DRAW_ELEMENTS: u32 = 0x22F;
pub const FIXED_ATTR_INDEX: u32 = 0x232;
pub const FIXED_ATTR_DATA0: u32 = 0x233; // 0x233-0x235
pub const CMDBUF_SIZE: u32 = 0x238;
pub const CMDBUF_ADDR: u32 = 0x23A;
pub const CMDBUF_JUMP: u32 = 0x23C;
pub const PRIMITIVE_CONFIG: u32 = 0x25E;
pub const PRIMITIVE_RESTART: u32 = 0x25F;

// Geometry shader block (same layout as the vertex shader block)
pub const GSH_BOOL_UNIFORM: u32 = 0x280;
pub const GSH_INT_UNIFORM0: u32 = 0x281;
pub const GSH_INPUT_CONFIG: u32 = 0x289;
pub const GSH_ENTRY_POINT: u32 = 0x28A;
pub const GSH_PERM_LOW: u32 = 0x28B;
pub const GSH_PERM_HIGH: u32 = 0x28C;
pub const GSH_FLOAT_CONFIG: u32 = 0x290;
pub const GSH_FLOAT_DATA0: u32 = 0x291; // 0x291-0x298
pub const GSH_CODE_INDEX: u32 = 0x29B;
pub const GSH_CODE_DATA0: u32 = 0x29C; // 0x29C-0x2A3
pub const GSH_OPDESC_INDEX: u32 = 0x2A5;
pub const GSH_OPDESC_DATA0: u32 = 0x2A6; // 0x2A6-0x2AD

// Vertex shader block
pub const VSH_BOOL_UNIFORM: u32 = 0x2B0;
pub const VSH_INT_UNIFORM0: u32 = 0x2B1;
pub const VSH_INPUT_CONFIG: u32 = 0x2B9;
pub const VSH_ENTRY_POINT: u32 = 0x2BA;
pub const VSH_PERM_LOW: u32 = 0x2BB;
pub const VSH_PERM_HIGH: u32 = 0x2BC;
pub const VSH_FLOAT_CONFIG: u32 = 0x2C0;
pub const VSH_FLOAT_DATA0: u32 = 0x2C1; // 0x2C1-0x2C8
pub const VSH_CODE_INDEX: u32 = 0x2CB;
pub const VSH_CODE_DATA0: u32 = 0x2CC; // 0x2CC-0x2D3
pub const VSH_OPDESC_INDEX: u32 = 0x2D5;
pub const VSH_OPDESC_DATA0: u32 = 0x2D6; // 0x2D6-0x2DD

/// Integer RGBA color, 0-255 per channel (intermediate math may exceed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Rgba {
    pub fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed RGBA8 register value (r in the top byte)
    pub fn from_reg(value: u32) -> Self {
        Self {
            r: ((value >> 24) & 0xFF) as i32,
            g: ((value >> 16) & 0xFF) as i32,
            b: ((value >> 8) & 0xFF) as i32,
            a: (value & 0xFF) as i32,
        }
    }

    /// Clamp every channel into [0, 255]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0, 255),
            g: self.g.clamp(0, 255),
            b: self.b.clamp(0, 255),
            a: self.a.clamp(0, 255),
        }
    }
}

/// Decoded pipeline state shadowing the register bank
pub struct GpuContext {
    /// The flat bank every masked write lands in
    pub regs: [u32; 0x300],

    // Rasterizer
    pub viewport_width: Float24,
    pub viewport_height: Float24,
    pub viewport_invw: Float24,
    pub viewport_invh: Float24,
    pub viewport_x: i16,
    pub viewport_y: i16,

    pub vsh_output_total: u8,
    pub vsh_output_mapping: [[u8; 4]; 7],

    // Texturing
    pub tex_enable: [bool; 3],
    pub tex_border: [Rgba; 3],
    pub tex_width: [u32; 3],
    pub tex_height: [u32; 3],
    pub tex_addr: [u32; 3],
    /// Unit 0 mipmap base pool (level 0 aliases `tex_addr[0]`)
    pub tex0_addr: [u32; 5],
    pub tex_type: [u8; 3],

    // Combiner
    pub texcomb_rgb_source: [[u8; 3]; 6],
    pub texcomb_alpha_source: [[u8; 3]; 6],
    pub texcomb_rgb_operand: [[u8; 3]; 6],
    pub texcomb_alpha_operand: [[u8; 3]; 6],
    pub texcomb_rgb_op: [u8; 6],
    pub texcomb_alpha_op: [u8; 6],
    pub texcomb_const: [Rgba; 6],
    pub texcomb_rgb_scale: [u8; 6],
    pub texcomb_alpha_scale: [u8; 6],

    // Fragment operations
    pub blend_color: Rgba,
    pub blend_rgb_equation: u8,
    pub blend_alpha_equation: u8,
    pub blend_rgb_src_func: u8,
    pub blend_rgb_dst_func: u8,
    pub blend_alpha_src_func: u8,
    pub blend_alpha_dst_func: u8,
    pub depth_test_enable: bool,
    pub depth_func: u8,
    pub depth_write: bool,
    pub stencil_enable: bool,
    pub stencil_func: u8,
    pub stencil_ref: u8,

    // Framebuffer
    pub depth_buffer_base: u32,
    pub color_buffer_base: u32,
    pub frame_width: u16,
    pub frame_height: u16,

    // Geometry pipeline
    pub vtx_buffer_base: u32,
    pub attr_buffer_format_low: u32,
    pub attr_buffer_format_hi: u32,
    pub fixed_attr_mask: u16,
    pub total_vtx_attrs: u8,

    pub attr_buffer_offs: [u32; 12],
    pub attr_buffer_cfg1: [u32; 12],
    pub attr_buffer_cfg2: [u16; 12],
    pub attr_buffer_vtx_size: [u8; 12],
    pub attr_buffer_components: [u8; 12],

    pub index_buffer_offs: u32,
    pub index_buffer_short: bool,

    pub vertices: u32,
    pub vtx_offset: u32,

    /// Fixed-attribute upload cursor and three-word staging area
    pub fixed_attr_index: u8,
    pub fixed_attr_buffer: [u32; 3],
    pub fixed_attr_count: usize,
    pub fixed_attr_values: [Vec4<Float24>; 16],

    pub prim_mode: u8,

    /// Rolling three-vertex primitive-assembly queue
    pub vertex_queue: [Vertex; 3],
    pub submitted_vertices: usize,

    /// Geometry shader unit
    pub gsh: ShaderUnit,
    /// Vertex shader unit
    pub vsh: ShaderUnit,
}

impl GpuContext {
    pub fn new() -> Self {
        Self {
            regs: [0; 0x300],
            viewport_width: Float24::ZERO,
            viewport_height: Float24::ZERO,
            viewport_invw: Float24::ZERO,
            viewport_invh: Float24::ZERO,
            viewport_x: 0,
            viewport_y: 0,
            vsh_output_total: 0,
            vsh_output_mapping: [[0; 4]; 7],
            tex_enable: [false; 3],
            tex_border: [Rgba::default(); 3],
            tex_width: [0; 3],
            tex_height: [0; 3],
            tex_addr: [0; 3],
            tex0_addr: [0; 5],
            tex_type: [0; 3],
            texcomb_rgb_source: [[0; 3]; 6],
            texcomb_alpha_source: [[0; 3]; 6],
            texcomb_rgb_operand: [[0; 3]; 6],
            texcomb_alpha_operand: [[0; 3]; 6],
            texcomb_rgb_op: [0; 6],
            texcomb_alpha_op: [0; 6],
            texcomb_const: [Rgba::default(); 6],
            texcomb_rgb_scale: [0; 6],
            texcomb_alpha_scale: [0; 6],
            blend_color: Rgba::default(),
            blend_rgb_equation: 0,
            blend_alpha_equation: 0,
            blend_rgb_src_func: 1,
            blend_rgb_dst_func: 0,
            blend_alpha_src_func: 1,
            blend_alpha_dst_func: 0,
            depth_test_enable: false,
            depth_func: 1,
            depth_write: true,
            stencil_enable: false,
            stencil_func: 1,
            stencil_ref: 0,
            depth_buffer_base: 0,
            color_buffer_base: 0,
            frame_width: 0,
            frame_height: 0,
            vtx_buffer_base: 0,
            attr_buffer_format_low: 0,
            attr_buffer_format_hi: 0,
            fixed_attr_mask: 0,
            total_vtx_attrs: 0,
            attr_buffer_offs: [0; 12],
            attr_buffer_cfg1: [0; 12],
            attr_buffer_cfg2: [0; 12],
            attr_buffer_vtx_size: [0; 12],
            attr_buffer_components: [0; 12],
            index_buffer_offs: 0,
            index_buffer_short: false,
            vertices: 0,
            vtx_offset: 0,
            fixed_attr_index: 0,
            fixed_attr_buffer: [0; 3],
            fixed_attr_count: 0,
            fixed_attr_values: [Vec4::zero(); 16],
            prim_mode: 0,
            vertex_queue: [Vertex::default(); 3],
            submitted_vertices: 0,
            gsh: ShaderUnit::new(),
            vsh: ShaderUnit::new(),
        }
    }

    /// Decode one bank write into the shadow fields
    ///
    /// Pure state capture: register writes with side effects beyond the
    /// context (draw kicks) are intercepted before this runs.
    pub fn store(&mut self, reg: u32, value: u32) {
        match reg {
            VIEWPORT_WIDTH => self.viewport_width = Float24::from_raw(value),
            VIEWPORT_INVW => self.viewport_invw = Float24::from_raw(value),
            VIEWPORT_HEIGHT => self.viewport_height = Float24::from_raw(value),
            VIEWPORT_INVH => self.viewport_invh = Float24::from_raw(value),
            VIEWPORT_XY => {
                self.viewport_x = (value & 0xFFFF) as i16;
                self.viewport_y = ((value >> 16) & 0xFFFF) as i16;
            }
            SH_OUTMAP_TOTAL => self.vsh_output_total = (value & 0x7) as u8,
            0x050..=0x056 => {
                let out = (reg - SH_OUTMAP_BASE) as usize;
                for comp in 0..4 {
                    self.vsh_output_mapping[out][comp] = ((value >> (8 * comp)) & 0x1F) as u8;
                }
            }

            TEX_UNIT_CONFIG => {
                for unit in 0..3 {
                    self.tex_enable[unit] = value & (1 << unit) != 0;
                }
            }
            TEX0_BORDER => self.tex_border[0] = Rgba::from_reg(value),
            TEX0_DIM => {
                self.tex_height[0] = value & 0x7FF;
                self.tex_width[0] = (value >> 16) & 0x7FF;
            }
            TEX0_ADDR1 => {
                self.tex_addr[0] = value << 3;
                self.tex0_addr[0] = value << 3;
            }
            0x086..=0x089 => {
                self.tex0_addr[(reg - TEX0_ADDR2 + 1) as usize] = value << 3;
            }
            TEX0_TYPE => self.tex_type[0] = (value & 0xF) as u8,
            TEX1_BORDER => self.tex_border[1] = Rgba::from_reg(value),
            TEX1_DIM => {
                self.tex_height[1] = value & 0x7FF;
                self.tex_width[1] = (value >> 16) & 0x7FF;
            }
            TEX1_ADDR => self.tex_addr[1] = value << 3,
            TEX1_TYPE => self.tex_type[1] = (value & 0xF) as u8,
            TEX2_BORDER => self.tex_border[2] = Rgba::from_reg(value),
            TEX2_DIM => {
                self.tex_height[2] = value & 0x7FF;
                self.tex_width[2] = (value >> 16) & 0x7FF;
            }
            TEX2_ADDR => self.tex_addr[2] = value << 3,
            TEX2_TYPE => self.tex_type[2] = (value & 0xF) as u8,

            0x0C0..=0x0DF | 0x0F0..=0x0FF => self.store_texcomb(reg, value),

            BLEND_CONFIG => {
                self.blend_rgb_equation = (value & 0x7) as u8;
                self.blend_alpha_equation = ((value >> 8) & 0x7) as u8;
                self.blend_rgb_src_func = ((value >> 16) & 0xF) as u8;
                self.blend_rgb_dst_func = ((value >> 20) & 0xF) as u8;
                self.blend_alpha_src_func = ((value >> 24) & 0xF) as u8;
                self.blend_alpha_dst_func = ((value >> 28) & 0xF) as u8;
            }
            BLEND_COLOR => self.blend_color = Rgba::from_reg(value),
            STENCIL_TEST => {
                self.stencil_enable = value & 1 != 0;
                self.stencil_func = ((value >> 4) & 0x7) as u8;
                self.stencil_ref = ((value >> 16) & 0xFF) as u8;
            }
            DEPTH_COLOR_MASK => {
                self.depth_test_enable = value & 1 != 0;
                self.depth_func = ((value >> 4) & 0x7) as u8;
                self.depth_write = value & (1 << 12) != 0;
            }

            DEPTH_BUFFER_BASE => self.depth_buffer_base = value << 3,
            COLOR_BUFFER_BASE => self.color_buffer_base = value << 3,
            FRAMEBUFFER_DIM => {
                self.frame_width = (value & 0x7FF) as u16;
                self.frame_height = (((value >> 12) & 0x3FF) + 1) as u16;
            }

            ATTR_BUFFER_BASE => self.vtx_buffer_base = value << 3,
            ATTR_FORMAT_LOW => self.attr_buffer_format_low = value,
            ATTR_FORMAT_HIGH => {
                self.attr_buffer_format_hi = value & 0xFFFF;
                self.fixed_attr_mask = ((value >> 16) & 0xFFF) as u16;
                self.total_vtx_attrs = (((value >> 28) & 0xF) + 1) as u8;
            }
            0x203..=0x226 => {
                let buf = ((reg - ATTR_BUFFER0_OFFSET) / 3) as usize;
                match (reg - ATTR_BUFFER0_OFFSET) % 3 {
                    0 => self.attr_buffer_offs[buf] = value & 0x0FFF_FFFF,
                    1 => self.attr_buffer_cfg1[buf] = value,
                    _ => {
                        self.attr_buffer_cfg2[buf] = (value & 0xFFFF) as u16;
                        self.attr_buffer_vtx_size[buf] = ((value >> 16) & 0xFF) as u8;
                        self.attr_buffer_components[buf] = ((value >> 28) & 0xF) as u8;
                    }
                }
            }
            INDEX_BUFFER_CONFIG => {
                self.index_buffer_offs = value & 0x0FFF_FFFF;
                self.index_buffer_short = value & (1 << 31) != 0;
            }
            VERTEX_COUNT => self.vertices = value,
            VERTEX_OFFSET => self.vtx_offset = value,

            FIXED_ATTR_INDEX => {
                self.fixed_attr_index = (value & 0xF) as u8;
                self.fixed_attr_count = 0;
            }
            FIXED_ATTR_DATA0..=0x235 => {
                self.fixed_attr_buffer[self.fixed_attr_count.min(2)] = value;
                self.fixed_attr_count += 1;
                if self.fixed_attr_count == 3 {
                    self.fixed_attr_count = 0;
                    let v = unpack_float24_triplet(&self.fixed_attr_buffer);
                    let index = (self.fixed_attr_index & 0xF) as usize;
                    self.fixed_attr_values[index] = v;
                    self.fixed_attr_index = self.fixed_attr_index.wrapping_add(1);
                }
            }

            PRIMITIVE_CONFIG => {
                self.prim_mode = ((value >> 8) & 0x3) as u8;
                self.submitted_vertices = 0;
            }
            PRIMITIVE_RESTART => self.submitted_vertices = 0,

            GSH_BOOL_UNIFORM => self.gsh.write_bool_uniform(value),
            0x281..=0x284 => self.gsh.write_int_uniform((reg - GSH_INT_UNIFORM0) as usize, value),
            GSH_INPUT_CONFIG => self.gsh.total_inputs = ((value & 0xF) + 1) as u8,
            GSH_ENTRY_POINT => self.gsh.entry_point = (value & 0xFFFF) as u16,
            GSH_PERM_LOW => store_permutation(&mut self.gsh.input_mapping, 0, value),
            GSH_PERM_HIGH => store_permutation(&mut self.gsh.input_mapping, 8, value),
            GSH_FLOAT_CONFIG => self.gsh.set_uniform_config(value),
            0x291..=0x298 => self.gsh.write_float_uniform(value),
            GSH_CODE_INDEX => self.gsh.code_index = value & 0xFFF,
            0x29C..=0x2A3 => self.gsh.write_code(value),
            GSH_OPDESC_INDEX => self.gsh.op_desc_index = value & 0x7F,
            0x2A6..=0x2AD => self.gsh.write_op_desc(value),

            VSH_BOOL_UNIFORM => self.vsh.write_bool_uniform(value),
            0x2B1..=0x2B4 => self.vsh.write_int_uniform((reg - VSH_INT_UNIFORM0) as usize, value),
            VSH_INPUT_CONFIG => self.vsh.total_inputs = ((value & 0xF) + 1) as u8,
            VSH_ENTRY_POINT => self.vsh.entry_point = (value & 0xFFFF) as u16,
            VSH_PERM_LOW => store_permutation(&mut self.vsh.input_mapping, 0, value),
            VSH_PERM_HIGH => store_permutation(&mut self.vsh.input_mapping, 8, value),
            VSH_FLOAT_CONFIG => self.vsh.set_uniform_config(value),
            0x2C1..=0x2C8 => self.vsh.write_float_uniform(value),
            VSH_CODE_INDEX => self.vsh.code_index = value & 0xFFF,
            0x2CC..=0x2D3 => self.vsh.write_code(value),
            VSH_OPDESC_INDEX => self.vsh.op_desc_index = value & 0x7F,
            0x2D6..=0x2DD => self.vsh.write_op_desc(value),

            _ => {}
        }
    }

    /// Combiner stage registers: sources, operands, op, constant, scale
    fn store_texcomb(&mut self, reg: u32, value: u32) {
        let (stage, offset) = if reg < TEXCOMB4_BASE {
            (
                ((reg - TEXCOMB0_BASE) / 8) as usize,
                (reg - TEXCOMB0_BASE) % 8,
            )
        } else {
            (
                (4 + (reg - TEXCOMB4_BASE) / 8) as usize,
                (reg - TEXCOMB4_BASE) % 8,
            )
        };
        if stage >= 6 {
            return;
        }
        match offset {
            0 => {
                for src in 0..3 {
                    self.texcomb_rgb_source[stage][src] = ((value >> (4 * src)) & 0xF) as u8;
                    self.texcomb_alpha_source[stage][src] =
                        ((value >> (16 + 4 * src)) & 0xF) as u8;
                }
            }
            1 => {
                for src in 0..3 {
                    self.texcomb_rgb_operand[stage][src] = ((value >> (4 * src)) & 0xF) as u8;
                    self.texcomb_alpha_operand[stage][src] =
                        ((value >> (12 + 4 * src)) & 0x7) as u8;
                }
            }
            2 => {
                self.texcomb_rgb_op[stage] = (value & 0xF) as u8;
                self.texcomb_alpha_op[stage] = ((value >> 16) & 0xF) as u8;
            }
            3 => self.texcomb_const[stage] = Rgba::from_reg(value),
            4 => {
                self.texcomb_rgb_scale[stage] = (value & 0x3) as u8;
                self.texcomb_alpha_scale[stage] = ((value >> 16) & 0x3) as u8;
            }
            _ => {}
        }
    }
}

impl Default for GpuContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unpack the three-word 24-bit float encoding used by fixed attributes
/// (identical to the shader uniform packing, w first)
pub fn unpack_float24_triplet(words: &[u32; 3]) -> Vec4<Float24> {
    Vec4::new(
        Float24::from_raw(words[2] & 0xFF_FFFF),
        Float24::from_raw(((words[1] & 0xFFFF) << 8) | (words[2] >> 24)),
        Float24::from_raw(((words[0] & 0xFF) << 16) | (words[1] >> 16)),
        Float24::from_raw(words[0] >> 8),
    )
}

/// Spread one permutation register across eight mapping slots
fn store_permutation(mapping: &mut [u8; 16], base: usize, value: u32) {
    for slot in 0..8 {
        mapping[base + slot] = ((value >> (4 * slot)) & 0xF) as u8;
    }
}
