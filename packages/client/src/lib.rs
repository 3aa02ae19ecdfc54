//! Interactive command-line client for the chat relay.

mod command;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use command::{InputError, parse_input};
pub use error::ClientError;
pub use formatter::MessageFormatter;
pub use runner::run_client;
pub use session::Identity;
