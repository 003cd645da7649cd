// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle command definitions and the outgoing command queue.
//!
//! Commands are user intents, not wire frames: they are queued FIFO and the
//! driver drains at most one per tick, spaced by [`DEBOUNCE_INTERVAL_MS`],
//! so callers can enqueue freely regardless of connection phase. Nothing is
//! coalesced: two `SetTemperature` intents are two transmissions.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum spacing between consecutive command transmissions, in
/// milliseconds. The kettle misbehaves when written faster than this.
pub const DEBOUNCE_INTERVAL_MS: u64 = 200;

/// A user intent destined for the kettle.
///
/// Temperature values carried here are already clamped to the range the
/// kettle accepts for the active unit; clamping happens at enqueue time.
///
/// # Examples
///
/// ```
/// use stagg_lib::command::Command;
///
/// assert_eq!(Command::PowerOn.wire_bytes(), (0x00, 0x01));
/// assert_eq!(Command::PowerOff.wire_bytes(), (0x00, 0x00));
/// assert_eq!(Command::SetTemperature(93).wire_bytes(), (0x01, 93));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Start heating.
    PowerOn,
    /// Stop heating.
    PowerOff,
    /// Change the target temperature (value is a unitless byte).
    SetTemperature(u8),
}

impl Command {
    /// The `(kind, value)` byte pair carried in the outgoing frame.
    #[must_use]
    pub const fn wire_bytes(&self) -> (u8, u8) {
        match self {
            Self::PowerOn => (0x00, 0x01),
            Self::PowerOff => (0x00, 0x00),
            Self::SetTemperature(value) => (0x01, *value),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerOn => write!(f, "on"),
            Self::PowerOff => write!(f, "off"),
            Self::SetTemperature(value) => write!(f, "set temperature {value}"),
        }
    }
}

/// FIFO queue of pending commands.
///
/// Deliberately dumb: no deduplication, no reordering, no priorities.
/// Rate limiting lives in the driver's tick, which owns the clock.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command; never blocks, never fails.
    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Removes and returns the oldest pending command.
    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut queue = CommandQueue::new();
        queue.push(Command::PowerOn);
        queue.push(Command::SetTemperature(93));
        queue.push(Command::PowerOff);

        assert_eq!(queue.pop(), Some(Command::PowerOn));
        assert_eq!(queue.pop(), Some(Command::SetTemperature(93)));
        assert_eq!(queue.pop(), Some(Command::PowerOff));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn repeated_commands_are_kept() {
        let mut queue = CommandQueue::new();
        queue.push(Command::SetTemperature(80));
        queue.push(Command::SetTemperature(80));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn empty_queue_pops_none() {
        let mut queue = CommandQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(Command::PowerOn.to_string(), "on");
        assert_eq!(Command::PowerOff.to_string(), "off");
        assert_eq!(Command::SetTemperature(71).to_string(), "set temperature 71");
    }
}
