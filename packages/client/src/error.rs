//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open the WebSocket connection
    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// The relay closed the connection or a read/write failed mid-session
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
