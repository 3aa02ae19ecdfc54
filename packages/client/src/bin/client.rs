//! Interactive chat relay client with reconnection support.
//!
//! Joins a room, sends each input line as a chat message and prints everything
//! the relay delivers. Reconnects on disconnection (max 5 attempts with 5
//! second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomrelay-client -- --user-id u1 --username Alice
//! cargo run --bin roomrelay-client -- -i u2 -n Bob -r r1
//! ```

use clap::Parser;
use roomrelay_client::{Identity, run_client};
use roomrelay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomrelay-client")]
#[command(about = "Interactive client for the chat relay", long_about = None)]
struct Args {
    /// User id to join as
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name (defaults to the user id)
    #[arg(short = 'n', long)]
    username: Option<String>,

    /// Room to join
    #[arg(short = 'r', long, default_value = "global")]
    room: String,

    /// WebSocket relay URL
    #[arg(short = 'u', long, env = "ROOMRELAY_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let identity = Identity {
        room: args.room,
        user_id: args.user_id,
        username: args.username,
    };

    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
