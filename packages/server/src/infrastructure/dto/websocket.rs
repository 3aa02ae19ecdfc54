//! WebSocket envelope DTOs.
//!
//! Every envelope is a JSON object tagged by its `type` field; payload fields
//! are camelCase.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope kinds a client may send.
pub const CLIENT_ENVELOPE_KINDS: [&str; 6] = [
    "join_chat",
    "chat_message",
    "typing_status",
    "message_read",
    "user_info_update",
    "broadcast_clear_chat",
];

/// Inbound envelope (client -> relay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEnvelope {
    #[serde(rename_all = "camelCase")]
    JoinChat {
        chat_id: String,
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        chat_id: String,
        text: String,
        sender: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TypingStatus {
        chat_id: String,
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        is_typing: bool,
    },
    #[serde(rename_all = "camelCase")]
    MessageRead {
        chat_id: String,
        message_id: String,
        user_id: String,
    },
    #[serde(rename_all = "camelCase")]
    UserInfoUpdate { user_id: String, username: String },
    #[serde(rename_all = "camelCase")]
    BroadcastClearChat {
        chat_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cleared_by: Option<String>,
    },
}

/// One entry of `activeUsers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUserDto {
    pub user_id: String,
    pub username: String,
}

/// Outbound envelope (relay -> client). `timestamp` is RFC 3339 UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEnvelope {
    #[serde(rename_all = "camelCase")]
    JoinSuccess { chat_id: String, timestamp: String },
    #[serde(rename_all = "camelCase")]
    NewMessage {
        chat_id: String,
        content: String,
        sender: String,
        username: String,
        message_id: String,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    TypingStatus {
        chat_id: String,
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        is_typing: bool,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    MessageRead {
        chat_id: String,
        message_id: String,
        user_id: String,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    UserInfoUpdate {
        user_id: String,
        username: String,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    UserJoined {
        chat_id: String,
        user_id: String,
        username: String,
        active_users: Vec<ActiveUserDto>,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft {
        chat_id: String,
        user_id: String,
        username: String,
        active_users: Vec<ActiveUserDto>,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    GlobalChatCleared {
        chat_id: String,
        cleared_by: String,
        timestamp: String,
    },
}

/// Inbound envelope decoding errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("envelope has no string `type` field")]
    MissingKind,

    #[error("unknown envelope kind '{0}'")]
    UnknownKind(String),

    #[error("invalid '{kind}' envelope: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid field in '{kind}' envelope: {reason}")]
    InvalidField { kind: &'static str, reason: String },
}

/// Decode a raw text frame into a client envelope.
///
/// Unknown kinds are reported separately from malformed payloads so they can
/// be logged as such.
pub fn decode_client_envelope(raw: &str) -> Result<ClientEnvelope, EnvelopeError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(EnvelopeError::Malformed)?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(EnvelopeError::MissingKind)?
        .to_string();

    if !CLIENT_ENVELOPE_KINDS.contains(&kind.as_str()) {
        return Err(EnvelopeError::UnknownKind(kind));
    }

    serde_json::from_value(value).map_err(|source| EnvelopeError::InvalidPayload { kind, source })
}

pub fn encode_server_envelope(envelope: &ServerEnvelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_join_chat() {
        // テスト項目: join_chat エンベロープが camelCase のフィールドで読み取れる
        // given (前提条件):
        let raw = r#"{"type":"join_chat","chatId":"r1","userId":"u1","username":"Alice"}"#;

        // when (操作):
        let result = decode_client_envelope(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            ClientEnvelope::JoinChat {
                chat_id: "r1".to_string(),
                user_id: "u1".to_string(),
                username: Some("Alice".to_string()),
            }
        );
    }

    #[test]
    fn test_decode_chat_message_without_optional_fields() {
        // テスト項目: messageId と username を省略した chat_message を読み取れる（余分なフィールドは無視）
        // given (前提条件):
        let raw = r#"{"type":"chat_message","chatId":"r1","text":"hi","sender":"u1","timestamp":"x"}"#;

        // when (操作):
        let result = decode_client_envelope(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            ClientEnvelope::ChatMessage {
                chat_id: "r1".to_string(),
                text: "hi".to_string(),
                sender: "u1".to_string(),
                message_id: None,
                username: None,
            }
        );
    }

    #[test]
    fn test_decode_rejects_non_json() {
        // テスト項目: JSON でない入力は Malformed になる
        // given (前提条件):
        let raw = "hello there";

        // when (操作):
        let result = decode_client_envelope(raw);

        // then (期待する結果):
        assert!(matches!(result, Err(EnvelopeError::Malformed(_))));
    }

    #[test]
    fn test_decode_reports_missing_kind() {
        // テスト項目: type フィールドがない場合は MissingKind になる
        // given (前提条件):
        let raw = r#"{"chatId":"r1"}"#;

        // when (操作):
        let result = decode_client_envelope(raw);

        // then (期待する結果):
        assert!(matches!(result, Err(EnvelopeError::MissingKind)));
    }

    #[test]
    fn test_decode_reports_unknown_kind() {
        // テスト項目: 未知の type は UnknownKind として区別される
        // given (前提条件):
        let raw = r#"{"type":"client_init","data":"Hello"}"#;

        // when (操作):
        let result = decode_client_envelope(raw);

        // then (期待する結果):
        match result {
            Err(EnvelopeError::UnknownKind(kind)) => assert_eq!(kind, "client_init"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_reports_missing_required_field() {
        // テスト項目: 必須フィールドが欠けた既知の type は InvalidPayload になる
        // given (前提条件):
        let raw = r#"{"type":"typing_status","chatId":"r1","userId":"u1"}"#;

        // when (操作):
        let result = decode_client_envelope(raw);

        // then (期待する結果):
        match result {
            Err(EnvelopeError::InvalidPayload { kind, .. }) => assert_eq!(kind, "typing_status"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_encode_user_left_uses_wire_names() {
        // テスト項目: user_left が type タグと camelCase フィールドでエンコードされる
        // given (前提条件):
        let envelope = ServerEnvelope::UserLeft {
            chat_id: "r1".to_string(),
            user_id: "u2".to_string(),
            username: "Bob".to_string(),
            active_users: vec![ActiveUserDto {
                user_id: "u1".to_string(),
                username: "Alice".to_string(),
            }],
            timestamp: "2023-01-01T00:00:00.000Z".to_string(),
        };

        // when (操作):
        let json: serde_json::Value =
            serde_json::from_str(&encode_server_envelope(&envelope).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "user_left");
        assert_eq!(json["chatId"], "r1");
        assert_eq!(json["activeUsers"][0]["userId"], "u1");
        assert_eq!(json["activeUsers"][0]["username"], "Alice");
    }

    #[test]
    fn test_encode_room_cleared_kind() {
        // テスト項目: ルームクリア通知は global_chat_cleared としてエンコードされる
        // given (前提条件):
        let envelope = ServerEnvelope::GlobalChatCleared {
            chat_id: "global".to_string(),
            cleared_by: "Alice".to_string(),
            timestamp: "2023-01-01T00:00:00.000Z".to_string(),
        };

        // when (操作):
        let json: serde_json::Value =
            serde_json::from_str(&encode_server_envelope(&envelope).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "global_chat_cleared");
        assert_eq!(json["clearedBy"], "Alice");
    }
}
