// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The kettle driver: the connection state machine and everything it owns.
//!
//! [`KettleDriver`] is driven from two directions: a periodic [`tick`]
//! advances the connection state machine and drains queued commands, while
//! [`handle_event`] ingests the transport's asynchronous reports. Both can
//! be called from different threads; a single internal lock serializes them,
//! so frames from one notification are fully applied before the next is
//! considered, and a tick never observes a half-applied update.
//!
//! No failure here is fatal. Session-level failures of any kind route back
//! to [`ConnectionPhase::Inactive`], where the next tick after the retry
//! delay starts scanning again.
//!
//! [`tick`]: KettleDriver::tick
//! [`handle_event`]: KettleDriver::handle_event

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};

use crate::command::{Command, CommandQueue, DEBOUNCE_INTERVAL_MS};
use crate::error::{Error, Result, TransportError};
use crate::event::{EventBus, KettleEvent};
use crate::interpreter;
use crate::protocol::{
    FrameDecoder, INIT_HANDSHAKE, SERIAL_CHARACTERISTIC_UUID, SERVICE_UUID, encode_command,
};
use crate::state::DeviceState;
use crate::transport::{
    Advertisement, Clock, DeviceAddress, SystemClock, Transport, TransportEvent,
};
use crate::types::ConnectionPhase;

/// Delay before a discovery request is reissued after going inactive.
pub const RETRY_DELAY_MS: u64 = 5000;

/// How long a scan runs before giving up on finding a kettle.
pub const SCAN_WINDOW_MS: u64 = RETRY_DELAY_MS;

/// Shared mutable core: device state, decoder, and the command queue all
/// live behind one lock, touched by ticks and transport events alike.
struct Core {
    state: DeviceState,
    decoder: FrameDecoder,
    queue: CommandQueue,
    /// The advertisement we matched during the last scan.
    found: Option<Advertisement>,
    /// Clock reading at the last phase transition.
    time_phase_change: u64,
    /// Clock reading at the last transmitted frame.
    time_last_command: u64,
}

/// Driver for a Fellow Stagg EKG+ kettle.
///
/// The driver is a cheap-to-clone handle; clones share the same session.
/// Typical wiring: the application forwards transport reports into
/// [`handle_event`](Self::handle_event) as they arrive and calls
/// [`tick`](Self::tick) a few times per second. Retry and rate-limit
/// behavior is internal policy.
///
/// See the crate documentation for a full usage example.
#[derive(Clone)]
pub struct KettleDriver {
    core: Arc<Mutex<Core>>,
    transport: Arc<Mutex<Box<dyn Transport>>>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    state_tx: watch::Sender<DeviceState>,
}

impl KettleDriver {
    /// Creates a driver over the given transport, using the system clock.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_clock(transport, Arc::new(SystemClock::new()))
    }

    /// Creates a driver with an explicit clock. Tests use this to drive
    /// the retry and debounce timing by hand.
    pub fn with_clock(transport: impl Transport + 'static, clock: Arc<dyn Clock>) -> Self {
        let state = DeviceState::new();
        let (state_tx, _) = watch::channel(state.clone());
        let now = clock.now_ms();

        Self {
            core: Arc::new(Mutex::new(Core {
                state,
                decoder: FrameDecoder::new(),
                queue: CommandQueue::new(),
                found: None,
                time_phase_change: now,
                time_last_command: now,
            })),
            transport: Arc::new(Mutex::new(Box::new(transport))),
            clock,
            events: EventBus::new(),
            state_tx,
        }
    }

    // =========================================================================
    // Public surface
    // =========================================================================

    /// Starts scanning for a kettle now instead of waiting out the retry
    /// delay. No-op unless the driver is inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport refuses to start discovery; the
    /// driver falls back to inactive and retries on its own.
    pub fn scan(&self) -> Result<()> {
        let now = self.clock.now_ms();
        let mut core = self.core.lock();
        if core.state.phase() != ConnectionPhase::Inactive {
            tracing::debug!(phase = %core.state.phase(), "scan requested while busy");
            return Ok(());
        }
        self.begin_scan(&mut core, now)
    }

    /// Forces a session-establishment attempt for the kettle found by the
    /// last scan. [`tick`](Self::tick) performs the same transition
    /// automatically; this exists for callers that want to connect without
    /// waiting for the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no matching kettle has been
    /// discovered. Session setup failures are not returned; they follow
    /// the normal retry path.
    pub fn connect(&self) -> Result<()> {
        let now = self.clock.now_ms();
        {
            let core = self.core.lock();
            match core.state.phase() {
                ConnectionPhase::Found => {}
                ConnectionPhase::Connecting | ConnectionPhase::Connected => return Ok(()),
                _ => return Err(Error::DeviceNotFound),
            }
        }
        self.establish_session(now);
        Ok(())
    }

    /// Queues a power-on command. Safe to call in any phase; the queue
    /// drains once connected.
    pub fn on(&self) {
        self.core.lock().queue.push(Command::PowerOn);
    }

    /// Queues a power-off command. Safe to call in any phase.
    pub fn off(&self) {
        self.core.lock().queue.push(Command::PowerOff);
    }

    /// Queues a target-temperature command, clamping the requested value
    /// to the range the kettle accepts for the current unit (65–100 °C or
    /// 160–212 °F). Returns the value actually queued.
    pub fn set_temperature(&self, value: u8) -> u8 {
        let mut core = self.core.lock();
        let clamped = core.state.unit().clamp_setpoint(value);
        if clamped != value {
            tracing::debug!(requested = value, clamped, "setpoint out of range");
        }
        core.queue.push(Command::SetTemperature(clamped));
        clamped
    }

    /// Advances the connection state machine and drains at most one queued
    /// command. Call this a few times per second from the application's
    /// main loop or a timer.
    pub fn tick(&self) {
        let now = self.clock.now_ms();
        let mut core = self.core.lock();

        // A clock that jumps backwards must not stall the state machine.
        if now < core.time_last_command {
            core.time_last_command = now;
        }
        if now < core.time_phase_change {
            core.time_phase_change = now;
        }

        match core.state.phase() {
            ConnectionPhase::Inactive => {
                if now - core.time_phase_change >= RETRY_DELAY_MS {
                    let _ = self.begin_scan(&mut core, now);
                }
            }
            ConnectionPhase::Scanning => {
                if now - core.time_phase_change >= SCAN_WINDOW_MS {
                    tracing::debug!("scan window elapsed without a kettle");
                    self.transport.lock().stop_discovery();
                    self.set_phase(&mut core, ConnectionPhase::Inactive, now);
                }
            }
            ConnectionPhase::Found => {
                drop(core);
                self.establish_session(now);
            }
            ConnectionPhase::Connecting => {
                // The transport never confirmed the connect request.
                if now - core.time_phase_change >= RETRY_DELAY_MS {
                    tracing::warn!("connect completion never arrived, tearing down");
                    self.transport.lock().disconnect();
                    self.set_phase(&mut core, ConnectionPhase::Inactive, now);
                }
            }
            ConnectionPhase::Connected => self.drain_one_command(&mut core, now),
        }
    }

    /// Ingests one asynchronous transport report.
    ///
    /// The embedding application calls this from whatever context its BLE
    /// stack delivers callbacks on; the driver serializes internally.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::DeviceFound(adv) => self.on_device_found(adv),
            TransportEvent::Connected => self.on_connected(),
            TransportEvent::Disconnected => self.on_disconnected(),
            TransportEvent::Notification(bytes) => self.on_notification(&bytes),
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current connection phase.
    #[must_use]
    pub fn phase(&self) -> ConnectionPhase {
        self.core.lock().state.phase()
    }

    /// Advertised name of the connected kettle; empty outside a session.
    #[must_use]
    pub fn name(&self) -> String {
        self.core.lock().state.name().to_string()
    }

    /// Returns `true` if the heating element is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.core.lock().state.is_on()
    }

    /// Returns `true` if temperature hold is enabled.
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.core.lock().state.is_holding()
    }

    /// Returns `true` if the kettle is lifted from its base.
    #[must_use]
    pub fn is_lifted(&self) -> bool {
        self.core.lock().state.is_lifted()
    }

    /// Last reported temperature, in [`unit`](Self::unit) degrees.
    #[must_use]
    pub fn current_temp(&self) -> u8 {
        self.core.lock().state.current_temp()
    }

    /// Target temperature, in [`unit`](Self::unit) degrees.
    #[must_use]
    pub fn target_temp(&self) -> u8 {
        self.core.lock().state.target_temp()
    }

    /// Unit of the temperature fields, from the latest temperature frame.
    #[must_use]
    pub fn unit(&self) -> crate::types::TempUnit {
        self.core.lock().state.unit()
    }

    /// Countdown value from the latest lifted-countdown frame.
    #[must_use]
    pub fn countdown(&self) -> u8 {
        self.core.lock().state.countdown()
    }

    /// Snapshot of the full device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.core.lock().state.clone()
    }

    /// Number of commands waiting to be transmitted.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.core.lock().queue.len()
    }

    /// Watch channel observing device-state snapshots. Receivers see the
    /// latest snapshot without taking the driver lock.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DeviceState> {
        self.state_tx.subscribe()
    }

    /// Subscribes to driver events (phase changes, state changes,
    /// unknown-frame diagnostics).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KettleEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // State machine internals
    // =========================================================================

    fn set_phase(&self, core: &mut Core, phase: ConnectionPhase, now: u64) {
        if core.state.phase() == phase {
            return;
        }
        tracing::info!(from = %core.state.phase(), to = %phase, "phase change");
        core.state.set_phase(phase);
        core.time_phase_change = now;
        self.state_tx.send_replace(core.state.clone());
        self.events.publish(KettleEvent::phase_changed(phase));
    }

    fn begin_scan(&self, core: &mut Core, now: u64) -> Result<()> {
        self.set_phase(core, ConnectionPhase::Scanning, now);
        match self.transport.lock().start_discovery(SCAN_WINDOW_MS) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(error = %error, "failed to start discovery");
                self.set_phase(core, ConnectionPhase::Inactive, now);
                Err(error.into())
            }
        }
    }

    /// Runs session setup against the found kettle: connect, locate the
    /// serial characteristic, subscribe. The platform calls can take
    /// seconds, so they run without the core lock; the `Connecting` phase
    /// keeps concurrent ticks out in the meantime.
    fn establish_session(&self, now: u64) {
        let adv = {
            let mut core = self.core.lock();
            if core.state.phase() != ConnectionPhase::Found {
                return;
            }
            let Some(adv) = core.found.clone() else {
                self.set_phase(&mut core, ConnectionPhase::Inactive, now);
                return;
            };
            self.set_phase(&mut core, ConnectionPhase::Connecting, now);
            // Any partial frame left over from a previous session is junk.
            core.decoder.reset();
            adv
        };

        fn setup(
            transport: &mut dyn Transport,
            address: &DeviceAddress,
        ) -> std::result::Result<(), TransportError> {
            transport.connect(address)?;
            transport.discover_characteristic(SERVICE_UUID, SERIAL_CHARACTERISTIC_UUID)?;
            transport.subscribe()
        }

        tracing::info!(name = %adv.name, address = %adv.address, "connecting to kettle");
        let result = {
            let mut transport = self.transport.lock();
            setup(&mut **transport, &adv.address)
        };

        if let Err(error) = result {
            tracing::warn!(error = %error, "session setup failed");
            self.transport.lock().disconnect();
            let mut core = self.core.lock();
            self.set_phase(&mut core, ConnectionPhase::Inactive, self.clock.now_ms());
        }
    }

    fn drain_one_command(&self, core: &mut Core, now: u64) {
        if now - core.time_last_command < DEBOUNCE_INTERVAL_MS {
            return;
        }
        let Some(command) = core.queue.pop() else {
            return;
        };

        let sequence = core.state.sequence();
        let frame = encode_command(&command, sequence);
        match self.transport.lock().write(&frame) {
            Ok(()) => {
                tracing::debug!(command = %command, sequence, "sent command");
                core.state.bump_sequence();
            }
            Err(error) => {
                // Dropped rather than requeued: if the link is gone the
                // disconnect report will reset the session anyway.
                tracing::warn!(error = %error, command = %command, "command write failed");
            }
        }
        core.time_last_command = now;
    }

    // =========================================================================
    // Transport event handlers
    // =========================================================================

    fn on_device_found(&self, adv: Advertisement) {
        let now = self.clock.now_ms();
        let mut core = self.core.lock();
        if core.state.phase() != ConnectionPhase::Scanning {
            tracing::trace!(name = %adv.name, "advertisement outside scan, ignored");
            return;
        }
        tracing::debug!(name = %adv.name, address = %adv.address, "advertisement");
        if !adv.advertises(SERVICE_UUID) {
            return;
        }

        self.transport.lock().stop_discovery();
        core.found = Some(adv);
        self.set_phase(&mut core, ConnectionPhase::Found, now);
    }

    fn on_connected(&self) {
        let now = self.clock.now_ms();
        let mut core = self.core.lock();
        if core.state.phase() != ConnectionPhase::Connecting {
            tracing::debug!(phase = %core.state.phase(), "unexpected connect completion");
            return;
        }

        let name = core
            .found
            .as_ref()
            .map(|adv| adv.name.clone())
            .unwrap_or_default();
        core.state.set_name(name);
        core.state.reset_sequence();
        self.set_phase(&mut core, ConnectionPhase::Connected, now);
        tracing::info!(name = %core.state.name(), "kettle session established");

        let handshake = self.transport.lock().write(&INIT_HANDSHAKE);
        match handshake {
            Ok(()) => {
                // The handshake counts as a transmission for rate limiting.
                core.time_last_command = now;
            }
            Err(error) => {
                tracing::warn!(error = %error, "init handshake write failed");
                self.transport.lock().disconnect();
                core.state.clear_name();
                self.set_phase(&mut core, ConnectionPhase::Inactive, now);
            }
        }
    }

    fn on_disconnected(&self) {
        let now = self.clock.now_ms();
        let mut core = self.core.lock();
        if core.state.phase() == ConnectionPhase::Inactive {
            return;
        }
        tracing::info!(name = %core.state.name(), "kettle disconnected");

        // Release whatever handles the transport still holds. Reported
        // attributes stay as-is: stale but harmless for a status display.
        self.transport.lock().disconnect();
        core.state.clear_name();
        self.set_phase(&mut core, ConnectionPhase::Inactive, now);
    }

    fn on_notification(&self, bytes: &[u8]) {
        let mut core = self.core.lock();
        if core.state.phase() != ConnectionPhase::Connected {
            return;
        }
        tracing::trace!(len = bytes.len(), "notification chunk");

        let frames = core.decoder.push(bytes);
        for frame in frames {
            let interpretation = interpreter::interpret(&frame, &mut core.state);
            if let Some(payload) = interpretation.unmodeled {
                self.events
                    .publish(KettleEvent::unknown_frame(frame.frame_type(), payload));
            }
            if let Some(change) = interpretation.change
                && core.state.apply(&change)
            {
                let snapshot = core.state.clone();
                self.state_tx.send_replace(snapshot.clone());
                self.events.publish(KettleEvent::state_changed(change, snapshot));
            }
        }
    }
}

impl std::fmt::Debug for KettleDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.core.lock();
        f.debug_struct("KettleDriver")
            .field("phase", &core.state.phase())
            .field("name", &core.state.name())
            .field("pending_commands", &core.queue.len())
            .finish_non_exhaustive()
    }
}
