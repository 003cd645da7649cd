// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Stagg` Lib - A Rust driver for Fellow Stagg EKG+ kettles.
//!
//! This library speaks the kettle's reverse-engineered BLE serial protocol:
//! it discovers an advertising kettle, establishes and maintains a session,
//! decodes the fragmented notification stream into state updates, and turns
//! user intents into correctly sequenced, checksummed command frames.
//!
//! # Supported Features
//!
//! - **Power control**: start and stop heating
//! - **Target temperature**: set the setpoint, clamped to the range the
//!   kettle accepts (65–100 °C / 160–212 °F)
//! - **Live state**: power, hold, lifted-from-base, current and target
//!   temperature, unit, countdown
//! - **Self-healing sessions**: scan timeouts, connect failures, and
//!   disconnects all cycle back through automatic retry
//!
//! The BLE radio itself is not included: the embedding application supplies
//! a [`Transport`] implementation for its platform stack and forwards the
//! stack's reports into the driver as [`TransportEvent`]s.
//!
//! # Quick Start
//!
//! ```no_run
//! use stagg_lib::{KettleDriver, Transport, TransportError, DeviceAddress};
//!
//! # struct MyBleStack;
//! # impl Transport for MyBleStack {
//! #     fn start_discovery(&mut self, _w: u64) -> Result<(), TransportError> { Ok(()) }
//! #     fn stop_discovery(&mut self) {}
//! #     fn connect(&mut self, _a: &DeviceAddress) -> Result<(), TransportError> { Ok(()) }
//! #     fn discover_characteristic(
//! #         &mut self,
//! #         _s: uuid::Uuid,
//! #         _c: uuid::Uuid,
//! #     ) -> Result<(), TransportError> { Ok(()) }
//! #     fn subscribe(&mut self) -> Result<(), TransportError> { Ok(()) }
//! #     fn write(&mut self, _b: &[u8]) -> Result<(), TransportError> { Ok(()) }
//! #     fn disconnect(&mut self) {}
//! # }
//! fn main() -> stagg_lib::Result<()> {
//!     // MyBleStack implements stagg_lib::Transport for the platform radio.
//!     let driver = KettleDriver::new(MyBleStack);
//!
//!     // Wire the stack's callbacks into the driver:
//!     //   advertisement seen  -> driver.handle_event(TransportEvent::DeviceFound(..))
//!     //   connect completed   -> driver.handle_event(TransportEvent::Connected)
//!     //   connection lost     -> driver.handle_event(TransportEvent::Disconnected)
//!     //   notification bytes  -> driver.handle_event(TransportEvent::Notification(..))
//!
//!     driver.scan()?;
//!     driver.set_temperature(93);
//!     driver.on();
//!
//!     loop {
//!         driver.tick();
//!         println!(
//!             "[{}] {} -> {}{}",
//!             driver.phase(),
//!             driver.current_temp(),
//!             driver.target_temp(),
//!             driver.unit(),
//!         );
//!         std::thread::sleep(std::time::Duration::from_millis(100));
//!     }
//! }
//! ```
//!
//! # Watching for Changes
//!
//! Instead of polling accessors, subscribe to events or watch state
//! snapshots:
//!
//! ```ignore
//! let mut events = driver.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             KettleEvent::StateChanged { state, .. } => {
//!                 println!("now {} degrees", state.current_temp());
//!             }
//!             KettleEvent::PhaseChanged { phase } => println!("{phase}"),
//!             KettleEvent::UnknownFrame { frame_type, payload } => {
//!                 eprintln!("unmodeled frame {frame_type}: {payload:02X?}");
//!             }
//!         }
//!     }
//! });
//! ```

pub mod command;
mod driver;
pub mod error;
pub mod event;
pub mod interpreter;
pub mod protocol;
pub mod state;
pub mod transport;
pub mod types;

pub use command::Command;
pub use driver::{KettleDriver, RETRY_DELAY_MS, SCAN_WINDOW_MS};
pub use error::{Error, Result, TransportError};
pub use event::{EventBus, KettleEvent};
pub use state::{DeviceState, StateChange};
pub use transport::{
    Advertisement, Clock, DeviceAddress, SystemClock, Transport, TransportEvent,
};
pub use types::{ConnectionPhase, TempUnit};
