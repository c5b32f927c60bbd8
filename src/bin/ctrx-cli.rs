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

//! Headless emulator front-end
//!
//! Boots the core from ROM images and runs a fixed number of frames.
//! Useful for bring-up, regression runs, and dumping what the screens
//! would show; windowed presentation lives elsewhere.

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use ctrx::core::config::CtrxConfig;
use ctrx::core::gpu::{BOTTOM_HEIGHT, SCREEN_WIDTH, TOP_HEIGHT};
use ctrx::core::system::System;
use ctrx::Result;

/// A Nintendo 3DS emulator core, headless
#[derive(Parser, Debug)]
#[command(name = "ctrx-cli", version, about)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ARM9 boot ROM (overrides the config file)
    #[arg(long)]
    boot9: Option<PathBuf>,

    /// ARM11 boot ROM (overrides the config file)
    #[arg(long)]
    boot11: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short, long)]
    frames: Option<u64>,

    /// Write top.ppm / bottom.ppm after the last frame
    #[arg(long)]
    dump_screens: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = CtrxConfig::load_or_default(args.config.as_deref())?;

    if let Some(p) = args.boot9 {
        config.boot9_path = Some(p);
    }
    if let Some(p) = args.boot11 {
        config.boot11_path = Some(p);
    }
    if let Some(f) = args.frames {
        config.frame_limit = f;
    }
    config.dump_screens |= args.dump_screens;

    let mut system = System::new();
    system.set_cycles_per_frame(config.cycles_per_frame);

    match (&config.boot9_path, &config.boot11_path) {
        (Some(b9), Some(b11)) => {
            system.load_boot_roms_from(&b9.to_string_lossy(), &b11.to_string_lossy())?;
        }
        _ => {
            info!("no boot ROMs configured; running empty memory");
        }
    }

    let frames = if config.frame_limit == 0 {
        u64::MAX
    } else {
        config.frame_limit
    };
    info!("running {frames} frame(s)");
    system.run_frames(frames)?;

    if config.dump_screens {
        write_ppm("top.ppm", system.gpu.top_buffer(), SCREEN_WIDTH, TOP_HEIGHT)?;
        write_ppm(
            "bottom.ppm",
            system.gpu.bottom_buffer(),
            SCREEN_WIDTH,
            BOTTOM_HEIGHT,
        )?;
        info!("screens dumped to top.ppm / bottom.ppm");
    }

    Ok(())
}

/// Write an RGBA8 surface as binary PPM (alpha dropped)
fn write_ppm(path: &str, rgba: &[u8], width: usize, height: usize) -> Result<()> {
    use std::io::Write;

    let mut out = Vec::with_capacity(width * height * 3 + 32);
    out.extend_from_slice(format!("P6\n{width} {height}\n255\n").as_bytes());
    for px in rgba.chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
    std::fs::File::create(path)
        .and_then(|mut f| f.write_all(&out))
        .map_err(|e| ctrx::EmulatorError::ConfigError(format!("{path}: {e}")))
}
