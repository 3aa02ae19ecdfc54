//! Message formatting utilities for client display.

use chrono::Local;
use roomrelay_server::infrastructure::dto::websocket::{ActiveUserDto, ServerEnvelope};
use roomrelay_shared::time::parse_rfc3339;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render a relay envelope for the terminal.
    ///
    /// `me` is the local user id; it marks the local user in presence lists.
    pub fn format(envelope: &ServerEnvelope, me: &str) -> String {
        match envelope {
            ServerEnvelope::JoinSuccess { chat_id, timestamp } => {
                format!("\n* joined #{} at {}\n", chat_id, Self::local_time(timestamp))
            }
            ServerEnvelope::NewMessage {
                content,
                sender,
                username,
                message_id,
                timestamp,
                ..
            } => Self::format_chat_message(username, sender == me, content, message_id, timestamp),
            ServerEnvelope::TypingStatus {
                user_id,
                username,
                is_typing,
                ..
            } => {
                let who = username.as_deref().unwrap_or(user_id);
                if *is_typing {
                    format!("\n  {} is typing...\n", who)
                } else {
                    format!("\n  {} stopped typing\n", who)
                }
            }
            ServerEnvelope::MessageRead {
                message_id,
                user_id,
                ..
            } => format!("\n  {} read {}\n", user_id, message_id),
            ServerEnvelope::UserInfoUpdate {
                user_id, username, ..
            } => format!("\n* {} is now known as {}\n", user_id, username),
            ServerEnvelope::UserJoined {
                username,
                active_users,
                timestamp,
                ..
            } => format!(
                "\n+ {} entered at {}\n{}",
                username,
                Self::local_time(timestamp),
                Self::format_active_users(active_users, me)
            ),
            ServerEnvelope::UserLeft {
                username,
                active_users,
                timestamp,
                ..
            } => format!(
                "\n- {} left at {}\n{}",
                username,
                Self::local_time(timestamp),
                Self::format_active_users(active_users, me)
            ),
            ServerEnvelope::GlobalChatCleared {
                cleared_by,
                timestamp,
                ..
            } => format!(
                "\n* chat cleared by {} at {}\n",
                cleared_by,
                Self::local_time(timestamp)
            ),
        }
    }

    fn format_chat_message(
        username: &str,
        is_me: bool,
        content: &str,
        message_id: &str,
        timestamp: &str,
    ) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "\n{RULE}\n@{}{}: {}\nsent at {}  [{}]\n{RULE}\n",
            username,
            me_suffix,
            content,
            Self::local_time(timestamp),
            message_id
        )
    }

    /// Format the active-user list carried by presence envelopes
    pub fn format_active_users(active_users: &[ActiveUserDto], me: &str) -> String {
        if active_users.is_empty() {
            return "  (No participants)\n".to_string();
        }
        let names: Vec<String> = active_users
            .iter()
            .map(|user| {
                if user.user_id == me {
                    format!("{} (me)", user.username)
                } else {
                    user.username.clone()
                }
            })
            .collect();
        format!("  online: {}\n", names.join(", "))
    }

    /// Format a raw text frame that is not a known envelope
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Relay timestamps are RFC 3339 UTC; show them in local time, or verbatim if unparsable.
    fn local_time(timestamp: &str) -> String {
        parse_rfc3339(timestamp)
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| timestamp.to_string())
    }
}
