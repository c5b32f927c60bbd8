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

//! System integration
//!
//! [`System`] owns every component and drives the single-threaded
//! cooperative loop: step both cores a quantum, advance the scheduler,
//! drain completed GPU events, repeat until the frame's vblank fires,
//! then present.
//!
//! Component wiring is borrow-based: each CPU step receives a bus view
//! assembled from split borrows of the system's fields, so no component
//! ever holds a reference to another.

use log::{debug, info};

use crate::core::cpu::{CoreId, Cpu};
use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::Gpu;
use crate::core::hid::{ButtonState, Hid};
use crate::core::interrupt::{sources, InterruptController, CORE_ARM11, CORE_ARM9};
use crate::core::memory::{Arm11Bus, Arm9Bus, Memory};
use crate::core::scheduler::{EventKind, Scheduler};

/// ARM11 clock over a 60 Hz refresh
pub const DEFAULT_CYCLES_PER_FRAME: u64 = 268_111_856 / 60;

/// Instructions executed per core between scheduler checks
const STEP_QUANTUM: u64 = 64;

/// The whole machine
pub struct System {
    pub arm9: Cpu,
    pub arm11: Cpu,
    pub gpu: Gpu,
    pub mem: Memory,
    pub sched: Scheduler,
    pub irq: InterruptController,
    pub hid: Hid,

    cycles_per_frame: u64,
    frames: u64,
}

impl System {
    pub fn new() -> Self {
        Self {
            arm9: Cpu::new(CoreId::Arm9),
            arm11: Cpu::new(CoreId::Arm11),
            gpu: Gpu::new(),
            mem: Memory::new(),
            sched: Scheduler::new(),
            irq: InterruptController::new(),
            hid: Hid::new(),
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            frames: 0,
        }
    }

    /// Full machine reset: boot contract for both cores, all engines
    /// idle, event queue empty
    pub fn reset(&mut self) {
        self.arm9.reset();
        self.arm11.reset();
        self.gpu.reset();
        self.sched.reset();
        self.irq.reset();
        self.frames = 0;
        info!("system reset");
    }

    /// Install both boot ROM images
    pub fn load_boot_roms(&mut self, boot9: &[u8], boot11: &[u8]) {
        self.mem.load_boot9(boot9);
        self.mem.load_boot11(boot11);
        debug!(
            "boot ROMs loaded ({} / {} bytes)",
            boot9.len(),
            boot11.len()
        );
    }

    /// Override the frame length (mostly for tests and benchmarks)
    pub fn set_cycles_per_frame(&mut self, cycles: u64) {
        self.cycles_per_frame = cycles;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Update the button latch from the input collaborator
    pub fn set_buttons(&mut self, buttons: ButtonState) {
        self.hid.set_buttons(buttons);
    }

    /// Run the machine for one frame
    ///
    /// Interleaves both cores in quanta against the event clock. When the
    /// vblank event fires the presenter copies both screens out and the
    /// vertical interrupts are raised.
    pub fn run_frame(&mut self) -> Result<()> {
        self.sched.schedule(EventKind::VBlank, self.cycles_per_frame);

        loop {
            for _ in 0..STEP_QUANTUM {
                let mut bus = Arm11Bus {
                    mem: &mut self.mem,
                    gpu: &mut self.gpu,
                    sched: &mut self.sched,
                    irq: &mut self.irq,
                    hid: &self.hid,
                };
                self.arm11.step(&mut bus)?;

                let mut bus = Arm9Bus {
                    mem: &mut self.mem,
                    gpu: &mut self.gpu,
                    sched: &mut self.sched,
                    irq: &mut self.irq,
                    hid: &self.hid,
                };
                self.arm9.step(&mut bus)?;
            }
            self.sched.advance(STEP_QUANTUM);

            let mut vblank = false;
            while let Some(kind) = self.sched.pop_due() {
                if kind == EventKind::VBlank {
                    vblank = true;
                    continue;
                }
                self.gpu
                    .handle_event(kind, &mut self.mem, &mut self.sched, &mut self.irq)?;
            }

            // Interrupt latches are sampled at quantum boundaries
            self.arm9.set_int_signal(self.irq.pending(CORE_ARM9));
            self.arm11.set_int_signal(self.irq.pending(CORE_ARM11));

            if vblank {
                break;
            }
        }

        self.gpu.render_frame(&self.mem);
        self.irq
            .assert_irq(sources::VBLANK_TOP | sources::VBLANK_BOTTOM);
        self.arm9.set_int_signal(self.irq.pending(CORE_ARM9));
        self.arm11.set_int_signal(self.irq.pending(CORE_ARM11));

        self.frames += 1;
        Ok(())
    }

    /// Run until `frames` have been presented or a fatal error surfaces
    pub fn run_frames(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            self.run_frame().map_err(|e| {
                // A fatal error ends emulation; report which frame died
                debug!("emulation stopped during frame {}: {e}", self.frames);
                e
            })?;
        }
        Ok(())
    }

    /// Convenience wrapper for loading boot ROMs from disk
    pub fn load_boot_roms_from(&mut self, boot9_path: &str, boot11_path: &str) -> Result<()> {
        let boot9 = std::fs::read(boot9_path)
            .map_err(|e| EmulatorError::BootRomError(format!("{boot9_path}: {e}")))?;
        let boot11 = std::fs::read(boot11_path)
            .map_err(|e| EmulatorError::BootRomError(format!("{boot11_path}: {e}")))?;
        self.load_boot_roms(&boot9, &boot11);
        Ok(())
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cpu::Mode;
    use crate::core::gpu::float24::Float24;
    use crate::core::gpu::registers;
    use crate::core::gpu::vector::Vec4;

    #[test]
    fn test_boot_contract_after_reset() {
        let mut sys = System::new();
        sys.reset();

        assert_eq!(sys.arm11.reg(15), 0x0000_0004);
        assert_eq!(sys.arm9.reg(15), 0xFFFF_0004);
        for cpu in [&sys.arm11, &sys.arm9] {
            assert_eq!(cpu.cpsr().mode, Mode::Supervisor);
            assert!(cpu.cpsr().irq_disable);
            assert!(cpu.cpsr().fiq_disable);
            assert!(!cpu.cpsr().thumb);
        }
    }

    #[test]
    fn test_guest_program_drives_memfill() {
        let mut sys = System::new();
        sys.set_cycles_per_frame(8192);

        // ARM11 boot code: configure memory-fill unit 0 over MMIO with
        // start 0x18000000, end 0x18000010, value 0xAABBCCDD, 32-bit
        // width, then start it and sleep.
        let program: [u32; 13] = [
            0xE300_0010, // movw r0, #0x0010
            0xE341_0040, // movt r0, #0x1040
            0xE300_1000, // movw r1, #0
            0xE341_1800, // movt r1, #0x1800
            0xE580_1000, // str r1, [r0]
            0xE300_2010, // movw r2, #0x0010
            0xE341_2800, // movt r2, #0x1800
            0xE580_2004, // str r2, [r0, #4]
            0xE30C_3CDD, // movw r3, #0xCCDD
            0xE34A_3ABB, // movt r3, #0xAABB
            0xE580_3008, // str r3, [r0, #8]
            0xE300_4201, // movw r4, #0x0201
            0xE580_400C, // str r4, [r0, #12]
        ];
        let mut boot11 = Vec::new();
        for w in program {
            boot11.extend_from_slice(&w.to_le_bytes());
        }
        boot11.extend_from_slice(&0xE320_F003u32.to_le_bytes()); // wfi
        let wfi = 0xE320_F003u32.to_le_bytes();
        sys.load_boot_roms(&wfi, &boot11); // arm9 parks immediately

        sys.run_frame().unwrap();

        for k in 0..4u32 {
            assert_eq!(sys.gpu.read_vram32(0x1800_0000 + k * 4), 0xAABB_CCDD);
        }
        assert_eq!(sys.gpu.read_vram32(0x1800_0010), 0);
        assert!(sys.gpu.memfill[0].finished);
        assert!(!sys.gpu.memfill[0].busy);
    }

    #[test]
    fn test_vblank_latches_interrupts() {
        let mut sys = System::new();
        sys.set_cycles_per_frame(256);
        // Both cores parked
        sys.mem.load_boot9(&0xE320_F003u32.to_le_bytes());
        sys.mem.load_boot11(&0xE320_F003u32.to_le_bytes());
        sys.irq.write_enable(CORE_ARM11, sources::VBLANK_TOP);

        sys.run_frame().unwrap();

        assert_eq!(sys.frames(), 1);
        assert!(sys.irq.read_pending(CORE_ARM11) & sources::VBLANK_TOP != 0);
        // Masked sources stay latched but below the level output
        assert!(sys.irq.read_pending(CORE_ARM9) & sources::VBLANK_TOP != 0);
        assert!(!sys.irq.pending(CORE_ARM9));
    }

    /// The full register-driven draw path: shader upload, attribute
    /// configuration, draw kick, presented pixels
    fn write(sys: &mut System, reg: u32, value: u32) {
        sys.gpu
            .write_cmd_register(reg, value, 0xF, &sys.mem, &mut sys.sched)
            .unwrap();
    }

    #[test]
    fn test_draw_triangle_through_register_interface() {
        let mut sys = System::new();

        // Vertex shader: mov o0, v0 ; mov o1, v1 ; end
        // Both MOVs use operand descriptor 0 (identity swizzle, full mask)
        write(&mut sys, registers::VSH_CODE_INDEX, 0);
        write(&mut sys, registers::VSH_CODE_DATA0, 0x13 << 26);
        write(
            &mut sys,
            registers::VSH_CODE_DATA0,
            (0x13 << 26) | (1 << 21) | (1 << 12),
        );
        write(&mut sys, registers::VSH_CODE_DATA0, 0x22 << 26);
        write(&mut sys, registers::VSH_OPDESC_INDEX, 0);
        write(&mut sys, registers::VSH_OPDESC_DATA0, 0x36F);

        write(&mut sys, registers::VSH_ENTRY_POINT, 0);
        write(&mut sys, registers::VSH_INPUT_CONFIG, 1); // two inputs
        write(&mut sys, registers::VSH_PERM_LOW, 0x10);

        // Outputs: o0 = position, o1 = color
        write(&mut sys, registers::SH_OUTMAP_TOTAL, 2);
        write(&mut sys, registers::SH_OUTMAP_BASE, 0x0302_0100);
        write(&mut sys, registers::SH_OUTMAP_BASE + 1, 0x0B0A_0908);

        // Viewport: identity for window coords in [0, 64)
        write(
            &mut sys,
            registers::VIEWPORT_WIDTH,
            Float24::from_f32(32.0).raw(),
        );
        write(
            &mut sys,
            registers::VIEWPORT_HEIGHT,
            Float24::from_f32(32.0).raw(),
        );

        // Framebuffer: 64x64 at the start of VRAM
        write(&mut sys, registers::COLOR_BUFFER_BASE, 0x1800_0000 >> 3);
        write(&mut sys, registers::DEPTH_BUFFER_BASE, 0x1810_0000 >> 3);
        write(&mut sys, registers::FRAMEBUFFER_DIM, (63 << 12) | 64);

        // Combiner: stage 0 replaces with primary color, rest pass
        write(&mut sys, registers::TEXCOMB0_BASE, 0x000F_0000);
        write(&mut sys, registers::TEXCOMB0_BASE + 2, 0);
        for stage in 1..6u32 {
            let base = if stage < 4 {
                registers::TEXCOMB0_BASE + 8 * stage
            } else {
                registers::TEXCOMB4_BASE + 8 * (stage - 4)
            };
            write(&mut sys, base, 0x000F_000F);
            write(&mut sys, base + 2, 0);
        }

        // Attribute 0: position from a buffer of 4 x f32 in FCRAM;
        // attribute 1: fixed white color
        let verts: [[f32; 4]; 3] = [
            [0.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
            [0.0, 10.0, 0.0, 1.0],
        ];
        for (i, v) in verts.iter().enumerate() {
            for (j, f) in v.iter().enumerate() {
                let ndc = if j < 2 { f / 32.0 - 1.0 } else { *f };
                sys.mem
                    .write_phys32(
                        0x2000_0000 + (i * 16 + j * 4) as u32,
                        ndc.to_bits(),
                    )
                    .unwrap();
            }
        }

        write(&mut sys, registers::ATTR_BUFFER_BASE, 0x2000_0000 >> 3);
        write(&mut sys, registers::ATTR_FORMAT_LOW, 0xF); // attr 0: f32 x4
        write(
            &mut sys,
            registers::ATTR_FORMAT_HIGH,
            (1 << 28) | (0b10 << 16), // two attrs, attr 1 fixed
        );
        write(&mut sys, registers::ATTR_BUFFER0_OFFSET, 0);
        write(&mut sys, registers::ATTR_BUFFER0_OFFSET + 1, 0); // comp 0 -> attr 0
        write(&mut sys, registers::ATTR_BUFFER0_OFFSET + 2, (1 << 28) | (16 << 16));

        // Fixed attribute 1 = opaque white
        write(&mut sys, registers::FIXED_ATTR_INDEX, 1);
        let one = Float24::from_f32(1.0).raw();
        let words = [
            (one << 8) | (one >> 16),
            ((one & 0xFFFF) << 16) | (one >> 8),
            ((one & 0xFF) << 24) | one,
        ];
        for w in words {
            write(&mut sys, registers::FIXED_ATTR_DATA0, w);
        }

        write(&mut sys, registers::PRIMITIVE_CONFIG, 0);
        write(&mut sys, registers::VERTEX_COUNT, 3);
        write(&mut sys, registers::VERTEX_OFFSET, 0);
        write(&mut sys, registers::DRAW_ARRAYS, 1);

        // 55 white pixels, the half-open right triangle
        let mut count = 0;
        for y in 0..64u32 {
            for x in 0..64u32 {
                if sys.gpu.read_vram32(0x1800_0000 + (y * 64 + x) * 4) == 0xFFFF_FFFF {
                    count += 1;
                }
            }
        }
        assert_eq!(count, 55);

        // Shader scenario check: input attribute 0 passed through o0
        assert_eq!(
            sys.gpu.ctx.vsh.output_regs[1],
            Vec4::new(
                Float24::from_f32(1.0),
                Float24::from_f32(1.0),
                Float24::from_f32(1.0),
                Float24::from_f32(1.0)
            )
        );
    }
}
