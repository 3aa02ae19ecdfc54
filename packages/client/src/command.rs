//! Turns one line of user input into an outbound envelope.
//!
//! Plain text is sent as a chat message. Lines starting with `/` are commands:
//!
//! - `/typing on|off`
//! - `/read <messageId>`
//! - `/name <new name>`
//! - `/clear`

use roomrelay_server::infrastructure::dto::websocket::ClientEnvelope;
use thiserror::Error;

use crate::session::Identity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '/{0}'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_input(line: &str, identity: &Identity) -> Result<ClientEnvelope, InputError> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(ClientEnvelope::ChatMessage {
            chat_id: identity.room.clone(),
            text: line.to_string(),
            sender: identity.user_id.clone(),
            message_id: None,
            username: identity.username.clone(),
        });
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "typing" => {
            let is_typing = match argument {
                "on" => true,
                "off" => false,
                _ => return Err(InputError::Usage("/typing on|off")),
            };
            Ok(ClientEnvelope::TypingStatus {
                chat_id: identity.room.clone(),
                user_id: identity.user_id.clone(),
                username: identity.username.clone(),
                is_typing,
            })
        }
        "read" if !argument.is_empty() => Ok(ClientEnvelope::MessageRead {
            chat_id: identity.room.clone(),
            message_id: argument.to_string(),
            user_id: identity.user_id.clone(),
        }),
        "read" => Err(InputError::Usage("/read <messageId>")),
        "name" if !argument.is_empty() => Ok(ClientEnvelope::UserInfoUpdate {
            user_id: identity.user_id.clone(),
            username: argument.to_string(),
        }),
        "name" => Err(InputError::Usage("/name <new name>")),
        "clear" => Ok(ClientEnvelope::BroadcastClearChat {
            chat_id: identity.room.clone(),
            cleared_by: identity.username.clone(),
        }),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
