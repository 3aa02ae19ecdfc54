//! Event dispatcher: routes a validated client command to its use case.

use std::sync::Arc;

use crate::domain::{ClientCommand, ConnectionId};

use super::{
    clear_room::ClearRoomUseCase,
    error::RelayError,
    join_room::{JoinMode, JoinRoomUseCase},
    mark_read::MarkReadUseCase,
    send_message::SendMessageUseCase,
    typing_status::TypingStatusUseCase,
    update_user_info::UpdateUserInfoUseCase,
};

pub struct EventDispatcher {
    join_room: Arc<JoinRoomUseCase>,
    send_message: Arc<SendMessageUseCase>,
    typing_status: Arc<TypingStatusUseCase>,
    mark_read: Arc<MarkReadUseCase>,
    update_user_info: Arc<UpdateUserInfoUseCase>,
    clear_room: Arc<ClearRoomUseCase>,
}

impl EventDispatcher {
    pub fn new(
        join_room: Arc<JoinRoomUseCase>,
        send_message: Arc<SendMessageUseCase>,
        typing_status: Arc<TypingStatusUseCase>,
        mark_read: Arc<MarkReadUseCase>,
        update_user_info: Arc<UpdateUserInfoUseCase>,
        clear_room: Arc<ClearRoomUseCase>,
    ) -> Self {
        Self {
            join_room,
            send_message,
            typing_status,
            mark_read,
            update_user_info,
            clear_room,
        }
    }

    /// Handle one command from `connection_id`.
    ///
    /// An error means the command was dropped; the connection stays open.
    pub async fn dispatch(
        &self,
        connection_id: &ConnectionId,
        command: ClientCommand,
    ) -> Result<(), RelayError> {
        tracing::debug!(connection_id = %connection_id, kind = command.kind(), "dispatching");

        match command {
            ClientCommand::Join {
                room_id,
                user_id,
                username,
            } => self
                .join_room
                .execute(connection_id, room_id, user_id, username, JoinMode::Explicit)
                .await
                .map(|_| ()),
            ClientCommand::SendMessage(message) => self
                .send_message
                .execute(connection_id, message)
                .await
                .map(|_| ()),
            ClientCommand::Typing {
                room_id,
                user_id,
                username,
                is_typing,
            } => {
                self.typing_status
                    .execute(connection_id, room_id, user_id, username, is_typing)
                    .await
            }
            ClientCommand::MarkRead {
                room_id,
                message_id,
                user_id,
            } => {
                self.mark_read
                    .execute(connection_id, room_id, message_id, user_id)
                    .await
            }
            ClientCommand::UpdateUserInfo { user_id, username } => {
                self.update_user_info
                    .execute(connection_id, user_id, username)
                    .await
            }
            ClientCommand::ClearRoom {
                room_id,
                cleared_by,
            } => {
                self.clear_room
                    .execute(connection_id, room_id, cleared_by)
                    .await
            }
        }
    }
}
