//! Chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomrelay-server
//! cargo run --bin roomrelay-server -- --host 0.0.0.0 --port 3000
//! ```

use clap::Parser;
use roomrelay_server::{
    config::{RelayConfig, ServerArgs},
    ui::Server,
};
use roomrelay_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = ServerArgs::parse();
    let config = match RelayConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = Server::in_memory(config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
