//! Validated inbound commands, one per client envelope kind.

use super::value_object::{MessageContent, MessageId, RoomId, UserId, Username};

/// Payload of a `chat_message` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageCommand {
    pub room_id: RoomId,
    pub text: MessageContent,
    pub sender: UserId,
    pub message_id: Option<MessageId>,
    pub username: Option<Username>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Join {
        room_id: RoomId,
        user_id: UserId,
        username: Option<Username>,
    },
    SendMessage(ChatMessageCommand),
    Typing {
        room_id: RoomId,
        user_id: UserId,
        username: Option<Username>,
        is_typing: bool,
    },
    MarkRead {
        room_id: RoomId,
        message_id: MessageId,
        user_id: UserId,
    },
    UpdateUserInfo {
        user_id: UserId,
        username: Username,
    },
    ClearRoom {
        room_id: RoomId,
        cleared_by: Option<String>,
    },
}

impl ClientCommand {
    /// Wire name of the inbound envelope kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join_chat",
            Self::SendMessage(_) => "chat_message",
            Self::Typing { .. } => "typing_status",
            Self::MarkRead { .. } => "message_read",
            Self::UpdateUserInfo { .. } => "user_info_update",
            Self::ClearRoom { .. } => "broadcast_clear_chat",
        }
    }
}
