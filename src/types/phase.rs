// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the connection lifecycle state machine.
///
/// The driver cycles `Inactive → Scanning → Found → Connecting → Connected`,
/// and any phase can fall back to `Inactive` on failure or disconnection.
/// Device attributes other than the name are only meaningful while
/// `Connected`; they are left stale (but harmless) across reconnects.
///
/// # Examples
///
/// ```
/// use stagg_lib::types::ConnectionPhase;
///
/// assert!(ConnectionPhase::Connected.is_connected());
/// assert!(!ConnectionPhase::Scanning.is_connected());
/// assert_eq!(ConnectionPhase::Scanning.to_string(), "Scanning...");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionPhase {
    /// Idle; a discovery request is issued after the retry delay.
    #[default]
    Inactive,
    /// Actively scanning for an advertising kettle.
    Scanning,
    /// A matching advertiser was seen; session setup is pending.
    Found,
    /// Session setup in progress, waiting for connect completion.
    Connecting,
    /// Live session; frames flow and commands drain.
    Connected,
}

impl ConnectionPhase {
    /// Returns `true` if a live session is established.
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Human-readable phase name, suitable for a status display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Scanning => "Scanning...",
            Self::Found => "Found",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
