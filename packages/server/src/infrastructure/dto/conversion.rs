//! Conversion logic between DTOs and domain types.

use roomrelay_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ActiveUser, ChatMessageCommand, ClientCommand, MessageContent, MessageId, RelayEvent, RoomId,
    UserId, Username, ValueObjectError,
};
use crate::infrastructure::dto::websocket::{
    ActiveUserDto, ClientEnvelope, EnvelopeError, ServerEnvelope,
};

// ========================================
// DTO → Domain Command
// ========================================

/// Empty optional strings are treated as absent.
fn optional<T>(value: Option<String>) -> Result<Option<T>, ValueObjectError>
where
    T: TryFrom<String, Error = ValueObjectError>,
{
    value
        .filter(|v| !v.trim().is_empty())
        .map(T::try_from)
        .transpose()
}

impl TryFrom<ClientEnvelope> for ClientCommand {
    type Error = EnvelopeError;

    fn try_from(envelope: ClientEnvelope) -> Result<Self, Self::Error> {
        let kind = envelope_kind(&envelope);
        let invalid = |e: ValueObjectError| EnvelopeError::InvalidField {
            kind,
            reason: e.to_string(),
        };

        let command = match envelope {
            ClientEnvelope::JoinChat {
                chat_id,
                user_id,
                username,
            } => ClientCommand::Join {
                room_id: RoomId::new(chat_id).map_err(invalid)?,
                user_id: UserId::new(user_id).map_err(invalid)?,
                username: optional(username).map_err(invalid)?,
            },
            ClientEnvelope::ChatMessage {
                chat_id,
                text,
                sender,
                message_id,
                username,
            } => ClientCommand::SendMessage(ChatMessageCommand {
                room_id: RoomId::new(chat_id).map_err(invalid)?,
                text: MessageContent::new(text).map_err(invalid)?,
                sender: UserId::new(sender).map_err(invalid)?,
                message_id: optional(message_id).map_err(invalid)?,
                username: optional(username).map_err(invalid)?,
            }),
            ClientEnvelope::TypingStatus {
                chat_id,
                user_id,
                username,
                is_typing,
            } => ClientCommand::Typing {
                room_id: RoomId::new(chat_id).map_err(invalid)?,
                user_id: UserId::new(user_id).map_err(invalid)?,
                username: optional(username).map_err(invalid)?,
                is_typing,
            },
            ClientEnvelope::MessageRead {
                chat_id,
                message_id,
                user_id,
            } => ClientCommand::MarkRead {
                room_id: RoomId::new(chat_id).map_err(invalid)?,
                message_id: MessageId::new(message_id).map_err(invalid)?,
                user_id: UserId::new(user_id).map_err(invalid)?,
            },
            ClientEnvelope::UserInfoUpdate { user_id, username } => ClientCommand::UpdateUserInfo {
                user_id: UserId::new(user_id).map_err(invalid)?,
                username: Username::new(username).map_err(invalid)?,
            },
            ClientEnvelope::BroadcastClearChat {
                chat_id,
                cleared_by,
            } => ClientCommand::ClearRoom {
                room_id: RoomId::new(chat_id).map_err(invalid)?,
                cleared_by: cleared_by.filter(|v| !v.trim().is_empty()),
            },
        };

        Ok(command)
    }
}

fn envelope_kind(envelope: &ClientEnvelope) -> &'static str {
    match envelope {
        ClientEnvelope::JoinChat { .. } => "join_chat",
        ClientEnvelope::ChatMessage { .. } => "chat_message",
        ClientEnvelope::TypingStatus { .. } => "typing_status",
        ClientEnvelope::MessageRead { .. } => "message_read",
        ClientEnvelope::UserInfoUpdate { .. } => "user_info_update",
        ClientEnvelope::BroadcastClearChat { .. } => "broadcast_clear_chat",
    }
}

// ========================================
// Domain Event → DTO
// ========================================

impl From<&ActiveUser> for ActiveUserDto {
    fn from(user: &ActiveUser) -> Self {
        Self {
            user_id: user.user_id.as_str().to_string(),
            username: user.username.as_str().to_string(),
        }
    }
}

fn active_user_dtos(users: &[ActiveUser]) -> Vec<ActiveUserDto> {
    users.iter().map(ActiveUserDto::from).collect()
}

impl From<&RelayEvent> for ServerEnvelope {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::JoinSuccess { room_id, timestamp } => Self::JoinSuccess {
                chat_id: room_id.to_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::NewMessage {
                room_id,
                content,
                sender,
                username,
                message_id,
                timestamp,
            } => Self::NewMessage {
                chat_id: room_id.to_string(),
                content: content.to_string(),
                sender: sender.to_string(),
                username: username.to_string(),
                message_id: message_id.to_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::TypingStatus {
                room_id,
                user_id,
                username,
                is_typing,
                timestamp,
            } => Self::TypingStatus {
                chat_id: room_id.to_string(),
                user_id: user_id.to_string(),
                username: username.as_ref().map(Username::to_string),
                is_typing: *is_typing,
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::MessageRead {
                room_id,
                message_id,
                user_id,
                timestamp,
            } => Self::MessageRead {
                chat_id: room_id.to_string(),
                message_id: message_id.to_string(),
                user_id: user_id.to_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::UserInfoUpdate {
                user_id,
                username,
                timestamp,
            } => Self::UserInfoUpdate {
                user_id: user_id.to_string(),
                username: username.to_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::UserJoined {
                room_id,
                user_id,
                username,
                active_users,
                timestamp,
            } => Self::UserJoined {
                chat_id: room_id.to_string(),
                user_id: user_id.to_string(),
                username: username.to_string(),
                active_users: active_user_dtos(active_users),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::UserLeft {
                room_id,
                user_id,
                username,
                active_users,
                timestamp,
            } => Self::UserLeft {
                chat_id: room_id.to_string(),
                user_id: user_id.to_string(),
                username: username.to_string(),
                active_users: active_user_dtos(active_users),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            RelayEvent::RoomCleared {
                room_id,
                cleared_by,
                timestamp,
            } => Self::GlobalChatCleared {
                chat_id: room_id.to_string(),
                cleared_by: cleared_by.clone(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    #[test]
    fn test_chat_message_envelope_to_command() {
        // テスト項目: chat_message の DTO がドメインコマンドに変換される（空の messageId は未指定扱い）
        // given (前提条件):
        let envelope = ClientEnvelope::ChatMessage {
            chat_id: "r1".to_string(),
            text: "hi".to_string(),
            sender: "u1".to_string(),
            message_id: Some(String::new()),
            username: Some("Alice".to_string()),
        };

        // when (操作):
        let command = ClientCommand::try_from(envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            ClientCommand::SendMessage(ChatMessageCommand {
                room_id: RoomId::try_from("r1").unwrap(),
                text: MessageContent::try_from("hi").unwrap(),
                sender: UserId::try_from("u1").unwrap(),
                message_id: None,
                username: Some(Username::try_from("Alice").unwrap()),
            })
        );
    }

    #[test]
    fn test_empty_room_id_is_invalid_field() {
        // テスト項目: 空の chatId は InvalidField エラーになる
        // given (前提条件):
        let envelope = ClientEnvelope::JoinChat {
            chat_id: String::new(),
            user_id: "u1".to_string(),
            username: None,
        };

        // when (操作):
        let result = ClientCommand::try_from(envelope);

        // then (期待する結果):
        match result {
            Err(EnvelopeError::InvalidField { kind, reason }) => {
                assert_eq!(kind, "join_chat");
                assert!(reason.contains("chatId"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_is_invalid_field() {
        // テスト項目: 本文が空の chat_message は InvalidField エラーになる
        // given (前提条件):
        let envelope = ClientEnvelope::ChatMessage {
            chat_id: "r1".to_string(),
            text: "  ".to_string(),
            sender: "u1".to_string(),
            message_id: None,
            username: None,
        };

        // when (操作):
        let result = ClientCommand::try_from(envelope);

        // then (期待する結果):
        assert!(matches!(result, Err(EnvelopeError::InvalidField { .. })));
    }

    #[test]
    fn test_user_joined_event_to_envelope() {
        // テスト項目: user_joined イベントがアクティブユーザー一覧付きの DTO に変換される
        // given (前提条件):
        let event = RelayEvent::UserJoined {
            room_id: RoomId::try_from("r1").unwrap(),
            user_id: UserId::try_from("u2").unwrap(),
            username: Username::try_from("Bob").unwrap(),
            active_users: vec![ActiveUser {
                user_id: UserId::try_from("u1").unwrap(),
                username: Username::try_from("Alice").unwrap(),
            }],
            timestamp: Timestamp::new(1672531200000),
        };

        // when (操作):
        let envelope = ServerEnvelope::from(&event);

        // then (期待する結果):
        assert_eq!(
            envelope,
            ServerEnvelope::UserJoined {
                chat_id: "r1".to_string(),
                user_id: "u2".to_string(),
                username: "Bob".to_string(),
                active_users: vec![ActiveUserDto {
                    user_id: "u1".to_string(),
                    username: "Alice".to_string(),
                }],
                timestamp: "2023-01-01T00:00:00.000Z".to_string(),
            }
        );
    }
}
