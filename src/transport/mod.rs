// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BLE transport collaborator interface.
//!
//! The driver owns the protocol and the connection policy; the actual radio
//! work of scanning, GATT connections, and characteristic I/O belongs to a
//! platform [`Transport`] implementation supplied by the embedding
//! application.
//!
//! Everything the stack reports asynchronously is reframed as a typed
//! [`TransportEvent`] that the application forwards into
//! [`KettleDriver::handle_event`](crate::KettleDriver::handle_event). The
//! driver never registers callbacks with the transport, so no process-wide
//! registry mapping radio handles back to driver instances is needed.
//!
//! Time is injected the same way: the driver only ever asks a [`Clock`] for
//! monotonic milliseconds, which keeps the retry and debounce logic
//! testable without waiting on real time.

use std::fmt;
use std::time::Instant;

use uuid::Uuid;

use crate::error::TransportError;

/// Opaque peer address assigned by the platform BLE stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Wraps a platform address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as the platform reported it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One advertisement seen during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Peer address for a later connect call.
    pub address: DeviceAddress,
    /// Advertised device name, possibly empty.
    pub name: String,
    /// Service UUIDs carried in the advertisement.
    pub services: Vec<Uuid>,
}

impl Advertisement {
    /// Returns `true` if the advertiser offers the given service.
    #[must_use]
    pub fn advertises(&self, service: Uuid) -> bool {
        self.services.contains(&service)
    }
}

/// Asynchronous reports from the transport, forwarded into the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Discovery saw an advertiser.
    DeviceFound(Advertisement),
    /// A previously requested connection completed.
    Connected,
    /// The peer connection was lost or closed.
    Disconnected,
    /// Notification bytes arrived on the subscribed characteristic.
    ///
    /// Chunk boundaries are arbitrary: a chunk may hold part of a frame or
    /// several frames back to back.
    Notification(Vec<u8>),
}

/// Platform BLE operations the driver depends on.
///
/// All methods are expected to return promptly. Discovery and connect may
/// take seconds to *finish*, but kicking them off must not block beyond a
/// bounded platform timeout; completion is reported via
/// [`TransportEvent`]s. `write` must complete or fail quickly; it is the
/// only call the driver issues while holding its internal lock.
pub trait Transport: Send {
    /// Starts an active scan for advertisers, reporting each one as a
    /// [`TransportEvent::DeviceFound`]. `window_ms` is a hint for the
    /// platform scan window; the driver stops discovery itself.
    fn start_discovery(&mut self, window_ms: u64) -> Result<(), TransportError>;

    /// Stops an in-progress scan. Must be safe to call when idle.
    fn stop_discovery(&mut self);

    /// Connects to a discovered peer. Completion is reported via
    /// [`TransportEvent::Connected`].
    fn connect(&mut self, address: &DeviceAddress) -> Result<(), TransportError>;

    /// Locates `characteristic` under `service` on the connected peer.
    fn discover_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<(), TransportError>;

    /// Subscribes to notifications on the discovered characteristic,
    /// delivered as [`TransportEvent::Notification`] chunks.
    fn subscribe(&mut self) -> Result<(), TransportError>;

    /// Writes bytes to the discovered characteristic.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Drops the connection and any discovered handles. Must be safe to
    /// call at any point during session setup.
    fn disconnect(&mut self);
}

/// Monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`std::time::Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
