//! Real-time chat relay: rooms, presence, typing state and read receipts over WebSocket.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
