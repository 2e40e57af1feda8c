//! Room activity notifications
//!
//! Every recorded activity is pushed to the members of its room over a
//! per-room `tokio::sync::broadcast` channel. A transport (WebSocket, SSE)
//! subscribes to a room and forwards whatever arrives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::debug;

use core_kernel::{DomainPort, PortError, RoomId};
use domain_ledger::{ActivityCategory, ActivityEvent, ActivitySink};

/// Per-room channel capacity; slow subscribers lag past this
const BROADCAST_CAPACITY: usize = 1000;

/// Payload pushed to room members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityNotification {
    pub description: String,
    #[serde(rename = "type")]
    pub category: ActivityCategory,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ActivityEvent> for ActivityNotification {
    fn from(event: &ActivityEvent) -> Self {
        Self {
            description: event.description.clone(),
            category: event.category,
            user_name: event.actor_name.clone(),
            timestamp: event.occurred_at,
        }
    }
}

/// Fans notifications out to the subscribers of each room
#[derive(Debug, Default)]
pub struct RoomBroadcaster {
    rooms: RwLock<HashMap<RoomId, broadcast::Sender<ActivityNotification>>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a room's notifications
    pub fn subscribe(&self, room_id: RoomId) -> broadcast::Receiver<ActivityNotification> {
        let mut rooms = self
            .rooms
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rooms
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Broadcast to everyone subscribed to the room
    ///
    /// Returns the number of subscribers reached. A room nobody listens to
    /// is not an error.
    pub fn broadcast(&self, room_id: RoomId, notification: ActivityNotification) -> usize {
        let rooms = self
            .rooms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let reached = rooms
            .get(&room_id)
            .and_then(|tx| tx.send(notification).ok())
            .unwrap_or(0);
        debug!(room_id = %room_id, reached, "Broadcast activity");
        reached
    }

    /// Number of live subscribers of a room
    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.rooms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&room_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Drops a room's channel; its subscribers see the stream close
    pub fn remove_room(&self, room_id: RoomId) {
        self.rooms
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&room_id);
    }
}

/// Records activity through an inner sink, then broadcasts it to the room
pub struct BroadcastingActivitySink {
    inner: Arc<dyn ActivitySink>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl BroadcastingActivitySink {
    pub fn new(inner: Arc<dyn ActivitySink>, broadcaster: Arc<RoomBroadcaster>) -> Self {
        Self { inner, broadcaster }
    }
}

impl DomainPort for BroadcastingActivitySink {}

#[async_trait]
impl ActivitySink for BroadcastingActivitySink {
    async fn record(&self, event: ActivityEvent) -> Result<(), PortError> {
        let notification = ActivityNotification::from(&event);
        let room_id = event.room_id;
        self.inner.record(event).await?;
        self.broadcaster.broadcast(room_id, notification);
        Ok(())
    }
}
