// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle event types.

use serde::{Deserialize, Serialize};

use crate::state::{DeviceState, StateChange};
use crate::types::ConnectionPhase;

/// Events emitted by the kettle driver.
///
/// Subscribers get connection lifecycle transitions, decoded state updates,
/// and diagnostics for protocol traffic the driver does not model yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KettleEvent {
    /// The connection lifecycle moved to a new phase.
    PhaseChanged {
        /// The phase just entered.
        phase: ConnectionPhase,
    },

    /// A decoded frame changed the device state.
    StateChanged {
        /// The specific change that occurred.
        change: StateChange,
        /// Snapshot of the state after applying the change.
        state: DeviceState,
    },

    /// A frame arrived that the driver cannot account for.
    ///
    /// Emitted once per distinct payload for unmodeled frame types,
    /// unexpected values inside known types, and truncated best-effort
    /// captures. Useful for extending protocol coverage from live traffic.
    UnknownFrame {
        /// The frame's type byte.
        frame_type: u8,
        /// Raw captured bytes, type byte included.
        payload: Vec<u8>,
    },
}

impl KettleEvent {
    /// Returns `true` if this is a connection lifecycle event.
    #[must_use]
    pub fn is_phase_change(&self) -> bool {
        matches!(self, Self::PhaseChanged { .. })
    }

    /// Returns `true` if this is a decoded state update.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this is an unknown-frame diagnostic.
    #[must_use]
    pub fn is_unknown_frame(&self) -> bool {
        matches!(self, Self::UnknownFrame { .. })
    }

    /// Creates a phase change event.
    #[must_use]
    pub fn phase_changed(phase: ConnectionPhase) -> Self {
        Self::PhaseChanged { phase }
    }

    /// Creates a state change event.
    #[must_use]
    pub fn state_changed(change: StateChange, state: DeviceState) -> Self {
        Self::StateChanged { change, state }
    }

    /// Creates an unknown-frame diagnostic event.
    #[must_use]
    pub fn unknown_frame(frame_type: u8, payload: Vec<u8>) -> Self {
        Self::UnknownFrame {
            frame_type,
            payload,
        }
    }
}
