// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the discrete updates decoded from kettle frames. The
//! interpreter produces them and [`DeviceState`](super::DeviceState) applies
//! them, reporting whether anything actually moved so the driver knows when
//! to notify watchers.
//!
//! # Examples
//!
//! ```
//! use stagg_lib::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Power(true)));
//!
//! // Applying the same change again returns false
//! assert!(!state.apply(&StateChange::Power(true)));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::TempUnit;

/// A change in the kettle's reported state.
///
/// A single frame can carry more than one field (temperature frames carry
/// both the value and the unit); those become a [`StateChange::Batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// Heating turned on or off.
    Power(bool),
    /// Temperature hold enabled or disabled.
    Hold(bool),
    /// Target temperature report (unitless byte).
    TargetTemp(u8),
    /// Current temperature report (unitless byte).
    CurrentTemp(u8),
    /// Display unit taken from the latest temperature frame.
    Unit(TempUnit),
    /// Countdown value, reported while the kettle is lifted.
    Countdown(u8),
    /// Kettle lifted from, or returned to, its base.
    Lifted(bool),
    /// Multiple changes decoded from one frame.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this change affects a temperature field.
    #[must_use]
    pub fn is_temperature(&self) -> bool {
        matches!(
            self,
            Self::TargetTemp(_) | Self::CurrentTemp(_) | Self::Unit(_)
        )
    }

    /// Returns `true` if this is a batch of changes.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Returns the number of individual changes, batches flattened.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }
}
