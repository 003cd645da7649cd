// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `stagg_lib` library.
//!
//! Protocol-level oddities (malformed or unmodeled frames) are not errors:
//! the driver logs them and keeps the stream alive. The types here cover the
//! failures that can actually surface to a caller: transport and session
//! problems, plus driver-surface misuse.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the BLE transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No kettle has been discovered yet.
    #[error("no kettle has been discovered")]
    DeviceNotFound,
}

/// Errors reported by the BLE transport collaborator.
///
/// Every variant is recoverable: the driver reacts by tearing down the
/// partial session and cycling back through its retry loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Starting or stopping device discovery failed.
    #[error("discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Connecting to the peer failed or timed out.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// The expected GATT service is not present on the peer.
    #[error("service {0} not found")]
    ServiceNotFound(uuid::Uuid),

    /// The expected characteristic is not present under the service.
    #[error("characteristic {0} not found")]
    CharacteristicNotFound(uuid::Uuid),

    /// Subscribing to notifications failed.
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),

    /// A characteristic write failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// No connection is currently established.
    #[error("not connected")]
    NotConnected,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
