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

//! Button input latch
//!
//! The input collaborator (a host window, a test) writes the pressed-set;
//! guest code reads the PAD register at `0x10146000`, which is active-low
//! in hardware fashion: a pressed button reads as 0.

use bitflags::bitflags;

bitflags! {
    /// Pressed buttons, one bit per key
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonState: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
        const X      = 1 << 10;
        const Y      = 1 << 11;
    }
}

/// HID front-end latch
pub struct Hid {
    buttons: ButtonState,
}

impl Hid {
    pub fn new() -> Self {
        Self {
            buttons: ButtonState::empty(),
        }
    }

    /// Replace the pressed-set; called by the input collaborator once per
    /// host poll
    pub fn set_buttons(&mut self, buttons: ButtonState) {
        self.buttons = buttons;
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    /// PAD register value: active low over the 12 defined bits
    pub fn read_pad(&self) -> u16 {
        !self.buttons.bits() & 0x0FFF
    }
}

impl Default for Hid {
    fn default() -> Self {
        Self::new()
    }
}
