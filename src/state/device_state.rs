// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ConnectionPhase, TempUnit};

use super::StateChange;

/// Tracked state of a kettle.
///
/// One instance lives for the lifetime of a driver and is shared between
/// the tick loop and the transport callbacks, guarded by the driver's lock.
/// Temperatures are unitless bytes exactly as the kettle reports them;
/// [`unit`](Self::unit) says how to read them and follows the most recently
/// received temperature frame.
///
/// On disconnect only the phase and the discovered name are reset. The
/// remaining fields keep their last-known values: stale but harmless, and
/// convenient for a status display across a brief reconnect.
///
/// # Examples
///
/// ```
/// use stagg_lib::state::{DeviceState, StateChange};
/// use stagg_lib::types::TempUnit;
///
/// let mut state = DeviceState::new();
/// state.apply(&StateChange::Batch(vec![
///     StateChange::TargetTemp(205),
///     StateChange::Unit(TempUnit::Fahrenheit),
/// ]));
/// assert_eq!(state.target_temp(), 205);
/// assert_eq!(state.unit(), TempUnit::Fahrenheit);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Connection lifecycle phase.
    phase: ConnectionPhase,
    /// Advertised device name, set once per session.
    name: String,
    /// Heating element on.
    power: bool,
    /// Temperature hold enabled.
    hold: bool,
    /// Kettle lifted from its base.
    lifted: bool,
    /// Last reported temperature (unitless byte).
    current_temp: u8,
    /// Target temperature (unitless byte).
    target_temp: u8,
    /// Unit from the most recent temperature frame.
    unit: TempUnit,
    /// Countdown value, reported while lifted.
    countdown: u8,
    /// Outgoing frame sequence counter, wraps at 256.
    sequence: u8,
    /// Last-seen payload per unrecognized frame type, kept only to
    /// suppress repeated diagnostics for unchanged data.
    unknown_frames: HashMap<u8, Vec<u8>>,
}

impl DeviceState {
    /// Creates a fresh state: inactive, nameless, everything zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Connection ==========

    /// Current connection phase.
    #[must_use]
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Sets the connection phase.
    pub fn set_phase(&mut self, phase: ConnectionPhase) {
        self.phase = phase;
    }

    /// Advertised name of the connected kettle; empty before discovery.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records the advertised name for this session.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Forgets the advertised name (session ended).
    pub fn clear_name(&mut self) {
        self.name.clear();
    }

    // ========== Reported attributes ==========

    /// Returns `true` if the heating element is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power
    }

    /// Returns `true` if temperature hold is enabled.
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.hold
    }

    /// Returns `true` if the kettle is lifted from its base.
    #[must_use]
    pub fn is_lifted(&self) -> bool {
        self.lifted
    }

    /// Last reported temperature, in [`unit`](Self::unit) degrees.
    #[must_use]
    pub fn current_temp(&self) -> u8 {
        self.current_temp
    }

    /// Target temperature, in [`unit`](Self::unit) degrees.
    #[must_use]
    pub fn target_temp(&self) -> u8 {
        self.target_temp
    }

    /// Unit of the temperature fields.
    #[must_use]
    pub fn unit(&self) -> TempUnit {
        self.unit
    }

    /// Countdown value from the latest lifted-countdown frame.
    #[must_use]
    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    // ========== Sequence counter ==========

    /// Sequence number for the next outgoing command frame.
    #[must_use]
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Advances the sequence counter after a transmitted frame.
    pub fn bump_sequence(&mut self) {
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Resets the sequence counter for a new session.
    pub fn reset_sequence(&mut self) {
        self.sequence = 0;
    }

    // ========== Unknown frame cache ==========

    /// Records the payload of an unrecognized or malformed frame.
    ///
    /// Returns `true` if the payload differs from the last one cached for
    /// this frame type, in which case the caller should report it. Returns
    /// `false` for exact repeats, which keeps chatty unmodeled frames quiet.
    pub fn record_unknown(&mut self, frame_type: u8, payload: &[u8]) -> bool {
        match self.unknown_frames.get(&frame_type) {
            Some(cached) if cached.as_slice() == payload => false,
            _ => {
                self.unknown_frames.insert(frame_type, payload.to_vec());
                true
            }
        }
    }

    /// Last cached payload for an unrecognized frame type.
    #[must_use]
    pub fn unknown_frame(&self, frame_type: u8) -> Option<&[u8]> {
        self.unknown_frames.get(&frame_type).map(Vec::as_slice)
    }

    // ========== State changes ==========

    /// Applies a state change and returns whether anything actually moved.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Power(on) => Self::replace(&mut self.power, *on),
            StateChange::Hold(on) => Self::replace(&mut self.hold, *on),
            StateChange::TargetTemp(value) => Self::replace(&mut self.target_temp, *value),
            StateChange::CurrentTemp(value) => Self::replace(&mut self.current_temp, *value),
            StateChange::Unit(unit) => Self::replace(&mut self.unit, *unit),
            StateChange::Countdown(value) => Self::replace(&mut self.countdown, *value),
            StateChange::Lifted(lifted) => Self::replace(&mut self.lifted, *lifted),
            StateChange::Batch(changes) => {
                let mut any_changed = false;
                for c in changes {
                    if self.apply(c) {
                        any_changed = true;
                    }
                }
                any_changed
            }
        }
    }

    fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    }
}
