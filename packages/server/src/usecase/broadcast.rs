//! Broadcast engine: deliver one event to the live members of a room.

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, ConnectionId, ConnectionRepository, Membership, MessagePusher, RelayEvent,
    RoomId, Timestamp,
};

/// Computes the recipient snapshot of a room and hands it to the pusher.
///
/// Callers hold the room's lock across the registry change that triggered the
/// broadcast and the broadcast itself.
pub struct RoomBroadcaster {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Deliver `event` to every live connection in `room_id` except `exclude`.
    ///
    /// Per-recipient failures are logged by the pusher and reported; they never
    /// abort delivery to the remaining recipients.
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        event: &RelayEvent,
        exclude: Option<&ConnectionId>,
    ) -> BroadcastReport {
        let targets = self.repository.broadcast_targets(room_id, exclude).await;
        let report = self.message_pusher.broadcast(targets, event).await;

        tracing::debug!(
            room_id = %room_id,
            kind = event.kind(),
            delivered = report.delivered,
            failed = report.failures.len(),
            "broadcast complete"
        );
        report
    }

    /// Broadcast `user_left` for `membership` with the room's refreshed active users.
    ///
    /// The departing connection must already be out of the room.
    pub async fn announce_departure(
        &self,
        membership: &Membership,
        timestamp: Timestamp,
    ) -> BroadcastReport {
        let active_users = self.repository.active_users_in(&membership.room_id).await;
        let event = RelayEvent::UserLeft {
            room_id: membership.room_id.clone(),
            user_id: membership.user_id.clone(),
            username: membership.username.clone(),
            active_users,
            timestamp,
        };
        self.broadcast(&membership.room_id, &event, None).await
    }
}
