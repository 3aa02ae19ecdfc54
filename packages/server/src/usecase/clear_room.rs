//! UseCase: グローバルルームの消去通知

use crate::domain::{ConnectionId, RelayEvent, RoomId};

use super::{context::RelayContext, error::RelayError};

/// グローバルルームの履歴消去を参加者に通知するユースケース
///
/// 送信者はグローバルルームに参加している必要がある。
pub struct ClearRoomUseCase {
    context: RelayContext,
    global_room: RoomId,
}

impl ClearRoomUseCase {
    pub fn new(context: RelayContext, global_room: RoomId) -> Self {
        Self {
            context,
            global_room,
        }
    }

    /// `cleared_by` が省略された場合は送信者の表示名を使う
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        cleared_by: Option<String>,
    ) -> Result<(), RelayError> {
        if room_id != self.global_room {
            return Err(RelayError::NotGlobalRoom(room_id.to_string()));
        }

        let _guard = self.context.room_locks.lock(&room_id).await;
        let connection = self
            .context
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;
        let membership = connection
            .membership()
            .filter(|m| m.room_id == room_id)
            .ok_or_else(|| RelayError::NotInRoom(room_id.to_string()))?;

        let cleared_by = cleared_by.unwrap_or_else(|| membership.username.to_string());
        tracing::info!(
            connection_id = %connection_id,
            room_id = %room_id,
            cleared_by = %cleared_by,
            "room cleared"
        );

        let event = RelayEvent::RoomCleared {
            room_id: room_id.clone(),
            cleared_by,
            timestamp: self.context.now(),
        };
        self.context
            .broadcaster
            .broadcast(&room_id, &event, Some(connection_id))
            .await;
        Ok(())
    }
}
