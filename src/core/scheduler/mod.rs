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

//! Timed event scheduler
//!
//! Long-running GPU work is split into a "start" that sets a busy flag
//! and a "finish" posted here. The core loop advances the clock, drains
//! due events in firing order, and routes each to the owning component's
//! completion handler.
//!
//! Events cannot be cancelled individually; a reset clears them all.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

/// What to do when an event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    /// Memory-fill unit 0 or 1 finished
    MemoryFillComplete(usize),
    /// Display-transfer blit finished
    DisplayTransferComplete,
    /// Texture-copy blit finished
    TextureCopyComplete,
    /// Command-list walk finished
    CommandListComplete,
    /// End of frame: present and raise the vertical interrupts
    VBlank,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Event {
    time: u64,
    /// Tie-breaker so same-cycle events fire in scheduling order
    seq: u64,
    kind: EventKind,
}

/// Min-heap of pending events plus the current emulation clock
pub struct Scheduler {
    now: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<Event>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current emulation time in cycles
    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward
    #[inline(always)]
    pub fn advance(&mut self, cycles: u64) {
        self.now += cycles;
    }

    /// Post an event `delay` cycles from now
    pub fn schedule(&mut self, kind: EventKind, delay: u64) {
        trace!("schedule {:?} at t={}", kind, self.now + delay);
        self.queue.push(Reverse(Event {
            time: self.now + delay,
            seq: self.seq,
            kind,
        }));
        self.seq += 1;
    }

    /// Pop the next event whose time has come, if any
    pub fn pop_due(&mut self) -> Option<EventKind> {
        match self.queue.peek() {
            Some(Reverse(ev)) if ev.time <= self.now => {
                let Reverse(ev) = self.queue.pop().unwrap();
                trace!("fire {:?} at t={}", ev.kind, self.now);
                Some(ev.kind)
            }
            _ => None,
        }
    }

    /// Time of the nearest pending event
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(ev)| ev.time)
    }

    /// Drop every pending event and rewind the clock
    pub fn reset(&mut self) {
        self.now = 0;
        self.seq = 0;
        self.queue.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
