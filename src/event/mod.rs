// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for kettle notifications.
//!
//! A pub/sub layer over tokio's broadcast channel so a status display or
//! telemetry forwarder can react to the driver without polling it.
//!
//! # Examples
//!
//! ```
//! use stagg_lib::event::{EventBus, KettleEvent};
//! use stagg_lib::types::ConnectionPhase;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//! bus.publish(KettleEvent::PhaseChanged {
//!     phase: ConnectionPhase::Scanning,
//! });
//! ```

mod bus;
mod kettle_event;

pub use bus::EventBus;
pub use kettle_event::KettleEvent;
