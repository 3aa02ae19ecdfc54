//! UseCase: 既読通知の中継

use crate::domain::{ConnectionId, MessageId, RelayEvent, RoomId, UserId};

use super::{context::RelayContext, error::RelayError};

/// 既読通知を送信者を含むルーム全体にそのまま中継するユースケース
///
/// 送信者の参加状態や userId は検証せず、ログに残すだけにする。
pub struct MarkReadUseCase {
    context: RelayContext,
}

impl MarkReadUseCase {
    pub fn new(context: RelayContext) -> Self {
        Self { context }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        message_id: MessageId,
        user_id: UserId,
    ) -> Result<(), RelayError> {
        let _guard = self.context.room_locks.lock(&room_id).await;
        let membership = self
            .context
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?
            .membership()
            .cloned();
        match membership {
            Some(m) if m.room_id == room_id && m.user_id == user_id => {}
            Some(m) => tracing::debug!(
                connection_id = %connection_id,
                joined_room = %m.room_id,
                joined_user = %m.user_id,
                room_id = %room_id,
                user_id = %user_id,
                "relaying read receipt that does not match the sender's membership"
            ),
            None => tracing::debug!(
                connection_id = %connection_id,
                room_id = %room_id,
                "relaying read receipt from unjoined connection"
            ),
        }

        let event = RelayEvent::MessageRead {
            room_id: room_id.clone(),
            message_id,
            user_id,
            timestamp: self.context.now(),
        };
        self.context
            .broadcaster
            .broadcast(&room_id, &event, None)
            .await;
        Ok(())
    }
}
