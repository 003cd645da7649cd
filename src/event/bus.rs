// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast bus for kettle events.

use tokio::sync::broadcast;

use super::KettleEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Broadcast bus delivering [`KettleEvent`]s to any number of subscribers.
///
/// Built on tokio's broadcast channel: each subscriber gets its own copy of
/// every event published after it subscribed. A subscriber that falls more
/// than the channel capacity behind loses the oldest events and sees a
/// `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<KettleEvent>,
}

impl EventBus {
    /// Creates an event bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates an event bus buffering up to `capacity` events per
    /// subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KettleEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// With no subscribers the event is silently discarded.
    pub fn publish(&self, event: KettleEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
