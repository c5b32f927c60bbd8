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

//! Emulator configuration
//!
//! A small TOML file consumed by the CLI front-end. Every field has a
//! default so a missing file or a partial one both work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{EmulatorError, Result};
use crate::core::system::DEFAULT_CYCLES_PER_FRAME;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CtrxConfig {
    /// ARM9 boot ROM image
    pub boot9_path: Option<PathBuf>,
    /// ARM11 boot ROM image
    pub boot11_path: Option<PathBuf>,
    /// Frames to run before exiting (0 = run until killed)
    pub frame_limit: u64,
    /// Emulated cycles per frame
    pub cycles_per_frame: u64,
    /// Dump both screens as PPM images after the last frame
    pub dump_screens: bool,
}

impl Default for CtrxConfig {
    fn default() -> Self {
        Self {
            boot9_path: None,
            boot11_path: None,
            frame_limit: 0,
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            dump_screens: false,
        }
    }
}

impl CtrxConfig {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EmulatorError::ConfigError(format!("{}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| EmulatorError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Load `path` if given, otherwise the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
