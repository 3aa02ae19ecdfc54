//! UseCase: チャットメッセージの送信
//!
//! 未参加の接続からのメッセージは暗黙の参加を行ってから配信する。
//! `new_message` は送信者を含むルーム全体に配信される（重複排除はクライアント側で
//! messageId をキーに行う）。

use std::sync::Arc;

use crate::domain::{ChatMessageCommand, ConnectionId, MessageId, RelayEvent};

use super::{
    context::RelayContext,
    error::RelayError,
    join_room::{JoinMode, JoinRoomUseCase},
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    context: RelayContext,
    join_room: Arc<JoinRoomUseCase>,
}

impl SendMessageUseCase {
    pub fn new(context: RelayContext, join_room: Arc<JoinRoomUseCase>) -> Self {
        Self { context, join_room }
    }

    /// メッセージを配信し、採用した messageId を返す
    ///
    /// # Errors
    ///
    /// * `NotInRoom` - 別のルームに参加中の接続が、参加していないルームに送信した
    /// * `SenderMismatch` - `sender` が参加中のユーザーと異なる
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        command: ChatMessageCommand,
    ) -> Result<MessageId, RelayError> {
        let connection = self
            .context
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        if connection.membership().is_none() {
            self.join_room
                .execute(
                    connection_id,
                    command.room_id.clone(),
                    command.sender.clone(),
                    command.username.clone(),
                    JoinMode::Implicit,
                )
                .await?;
        }

        let _guard = self.context.room_locks.lock(&command.room_id).await;
        let membership = self
            .context
            .require_member(connection_id, &command.room_id, &command.sender)
            .await?;

        let message_id = command.message_id.unwrap_or_else(MessageId::generate);
        let event = RelayEvent::NewMessage {
            room_id: membership.room_id.clone(),
            content: command.text,
            sender: membership.user_id,
            username: command.username.unwrap_or(membership.username),
            message_id: message_id.clone(),
            timestamp: self.context.now(),
        };
        let report = self
            .context
            .broadcaster
            .broadcast(&membership.room_id, &event, None)
            .await;

        tracing::info!(
            connection_id = %connection_id,
            room_id = %membership.room_id,
            message_id = %message_id,
            recipients = report.attempted(),
            "message relayed"
        );
        Ok(message_id)
    }
}
