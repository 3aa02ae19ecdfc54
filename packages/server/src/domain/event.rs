//! Events emitted by the relay to connected clients.

use super::{
    entity::ActiveUser,
    value_object::{MessageContent, MessageId, RoomId, Timestamp, UserId, Username},
};

/// Server-emitted event. Each variant maps to one outbound envelope kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Acknowledges an explicit join; sent to the joiner only.
    JoinSuccess {
        room_id: RoomId,
        timestamp: Timestamp,
    },
    NewMessage {
        room_id: RoomId,
        content: MessageContent,
        sender: UserId,
        username: Username,
        message_id: MessageId,
        timestamp: Timestamp,
    },
    TypingStatus {
        room_id: RoomId,
        user_id: UserId,
        username: Option<Username>,
        is_typing: bool,
        timestamp: Timestamp,
    },
    MessageRead {
        room_id: RoomId,
        message_id: MessageId,
        user_id: UserId,
        timestamp: Timestamp,
    },
    UserInfoUpdate {
        user_id: UserId,
        username: Username,
        timestamp: Timestamp,
    },
    UserJoined {
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        active_users: Vec<ActiveUser>,
        timestamp: Timestamp,
    },
    UserLeft {
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        active_users: Vec<ActiveUser>,
        timestamp: Timestamp,
    },
    RoomCleared {
        room_id: RoomId,
        cleared_by: String,
        timestamp: Timestamp,
    },
}

impl RelayEvent {
    /// Wire name of the envelope kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinSuccess { .. } => "join_success",
            Self::NewMessage { .. } => "new_message",
            Self::TypingStatus { .. } => "typing_status",
            Self::MessageRead { .. } => "message_read",
            Self::UserInfoUpdate { .. } => "user_info_update",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::RoomCleared { .. } => "global_chat_cleared",
        }
    }
}
