//! Server configuration: command-line flags with environment fallbacks.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::domain::{RoomId, ValueObjectError};

#[derive(Parser, Debug, Clone)]
#[command(name = "roomrelay-server")]
#[command(about = "Real-time chat relay over WebSocket", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "ROOMRELAY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "ROOMRELAY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds between liveness probes; a connection silent for two probes is evicted
    #[arg(long, env = "ROOMRELAY_HEARTBEAT_INTERVAL_SECS", default_value_t = 30)]
    pub heartbeat_interval_secs: u64,

    /// Delay before announcing `user_joined` after a join
    #[arg(long, env = "ROOMRELAY_JOIN_SETTLE_MS", default_value_t = 0)]
    pub join_settle_ms: u64,

    /// The only room that accepts `broadcast_clear_chat`
    #[arg(long, env = "ROOMRELAY_GLOBAL_ROOM", default_value = "global")]
    pub global_room: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("heartbeat interval must be greater than zero")]
    ZeroHeartbeatInterval,

    #[error("invalid global room: {0}")]
    InvalidGlobalRoom(#[from] ValueObjectError),
}

/// Validated relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub heartbeat_interval: Duration,
    pub join_settle_delay: Duration,
    pub global_room: RoomId,
}

impl RelayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TryFrom<ServerArgs> for RelayConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        if args.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ZeroHeartbeatInterval);
        }
        Ok(Self {
            host: args.host,
            port: args.port,
            heartbeat_interval: Duration::from_secs(args.heartbeat_interval_secs),
            join_settle_delay: Duration::from_millis(args.join_settle_ms),
            global_room: RoomId::new(args.global_room)?,
        })
    }
}
