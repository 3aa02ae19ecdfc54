//! Shared dependencies of the relay use cases.

use std::sync::Arc;

use roomrelay_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, Membership, MessagePusher, RoomId, Timestamp, UserId,
};

use super::{broadcast::RoomBroadcaster, error::RelayError, room_lock::RoomLocks};

/// Repository, pusher, room locks and clock, shared by every use case.
#[derive(Clone)]
pub struct RelayContext {
    pub repository: Arc<dyn ConnectionRepository>,
    pub message_pusher: Arc<dyn MessagePusher>,
    pub broadcaster: Arc<RoomBroadcaster>,
    pub room_locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl RelayContext {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let broadcaster = Arc::new(RoomBroadcaster::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        Self {
            repository,
            message_pusher,
            broadcaster,
            room_locks: Arc::new(RoomLocks::new()),
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// Resolve the membership of a connection that claims to act as `user_id` in `room_id`.
    pub async fn require_member(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Membership, RelayError> {
        let connection = self
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        let membership = connection
            .membership()
            .filter(|m| &m.room_id == room_id)
            .ok_or_else(|| RelayError::NotInRoom(room_id.to_string()))?;

        if &membership.user_id != user_id {
            return Err(RelayError::SenderMismatch {
                claimed: user_id.to_string(),
                joined: membership.user_id.to_string(),
            });
        }

        Ok(membership.clone())
    }
}
