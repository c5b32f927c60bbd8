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

//! ctrx: A Nintendo 3DS (CTR) emulator core
//!
//! This crate implements the hard center of a 3DS emulator: the ARM11
//! application processor and ARM9 security processor interpreters, and the
//! PICA-style programmable graphics pipeline that together define the
//! platform's observable behavior.
//!
//! # Architecture
//!
//! The emulator is organized into the following modules:
//!
//! - [`core`]: Core emulation components (CPU, Memory, GPU, System)
//!
//! # Example
//!
//! ```no_run
//! use ctrx::core::system::System;
//!
//! let mut system = System::new();
//! system.reset();
//! // system.run_frame()?;
//! # Ok::<(), ctrx::core::error::EmulatorError>(())
//! ```
//!
//! # Modules
//!
//! - [`core::cpu`]: ARM11 application / ARM9 security processor emulation
//! - [`core::memory`]: Memory storage and per-core bus dispatch
//! - [`core::gpu`]: Graphics pipeline (DMA engines, command engine,
//!   shader unit, rasterizer, fragment stage, presenter)
//! - [`core::scheduler`]: Timed event queue driving asynchronous GPU work
//! - [`core::system`]: System integration and the frame loop
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an
//! alias for `Result<T, EmulatorError>`.

pub mod core;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
