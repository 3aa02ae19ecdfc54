//! WebSocket connection handler.
//!
//! Each socket is split into two tasks: a pusher loop that drains the
//! connection's outbound channel into the socket, and a receive loop that
//! decodes inbound envelopes and dispatches them one at a time. Whichever task
//! ends first aborts the other, and the connection is then disconnected.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ClientCommand, ConnectionId, OutboundFrame},
    infrastructure::dto::websocket::decode_client_envelope,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards frames from the connection's channel to the socket.
///
/// The task ends after sending a `Close` frame, when the channel is closed, or
/// when the socket rejects a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                OutboundFrame::Text(json) => Message::Text(json.into()),
                OutboundFrame::Ping => Message::Ping(Bytes::new()),
                OutboundFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let envelope = match decode_client_envelope(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "dropping inbound envelope");
            return;
        }
    };

    let command = match ClientCommand::try_from(envelope) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "dropping invalid envelope");
            return;
        }
    };

    let kind = command.kind();
    if let Err(e) = state.dispatcher.dispatch(connection_id, command).await {
        tracing::warn!(connection_id = %connection_id, kind, error = %e, "event rejected");
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_usecase.execute(tx).await;

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&recv_state, &connection_id, text.as_str()).await;
                }
                Message::Pong(_) => {
                    recv_state
                        .liveness_usecase
                        .record_pong(&connection_id)
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_id, "client requested close");
                    break;
                }
                // Pings are answered by the transport.
                Message::Ping(_) | Message::Binary(_) => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_usecase.execute(&connection_id).await;
}
