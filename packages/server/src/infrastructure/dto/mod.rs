//! Data Transfer Objects (DTOs) for the relay.
//!
//! - `websocket`: JSON envelopes exchanged over the WebSocket
//! - `conversion`: mapping between envelopes and domain commands/events

pub mod conversion;
pub mod websocket;
