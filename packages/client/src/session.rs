//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use roomrelay_server::infrastructure::dto::websocket::{ClientEnvelope, ServerEnvelope};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::parse_input,
    error::ClientError,
    formatter::MessageFormatter,
    ui::{prompt, redisplay_prompt},
};

/// Who the client joins as, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub room: String,
    pub user_id: String,
    pub username: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.user_id)
    }

    fn join_envelope(&self) -> ClientEnvelope {
        ClientEnvelope::JoinChat {
            chat_id: self.room.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Run one connection: join the room, then relay stdin lines and print incoming envelopes.
///
/// `Ok(())` means the user ended the session; any `Err` is a lost connection.
pub async fn run_client_session(url: &str, identity: &mut Identity) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await?;
    tracing::info!("Connected to chat relay!");

    let (mut write, mut read) = ws_stream.split();

    let join = serde_json::to_string(&identity.join_envelope())?;
    write
        .send(Message::Text(join.into()))
        .await
        .map_err(|_| ClientError::ConnectionLost)?;

    println!(
        "\nYou are '{}' in #{}. Type messages and press Enter to send. Commands: /typing on|off, /read <id>, /name <name>, /clear. Press Ctrl+C to exit.\n",
        identity.display_name(),
        identity.room
    );

    // Spawn a task to handle incoming envelopes
    let user_id = identity.user_id.clone();
    let display_name = identity.display_name().to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerEnvelope>(text.as_str()) {
                        Ok(envelope) => MessageFormatter::format(&envelope, &user_id),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&display_name);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Relay closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let line_prompt = prompt(identity.display_name());
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&line_prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Input closed");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Forward input lines to the relay
    let mut outgoing = identity.clone();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let envelope = match parse_input(&line, &outgoing) {
                Ok(envelope) => envelope,
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt(outgoing.display_name());
                    continue;
                }
            };
            if let ClientEnvelope::UserInfoUpdate { username, .. } = &envelope {
                outgoing.username = Some(username.clone());
            }

            let json = match serde_json::to_string(&envelope) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize envelope: {}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send envelope: {}", e);
                return Err(ClientError::ConnectionLost);
            }
        }
        Ok(outgoing)
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Err(ClientError::ConnectionLost)
        }
        write_result = &mut write_task => {
            read_task.abort();
            match write_result {
                Ok(Ok(updated)) => {
                    *identity = updated;
                    Ok(())
                }
                _ => Err(ClientError::ConnectionLost),
            }
        }
    }
}
