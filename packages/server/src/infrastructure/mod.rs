//! Infrastructure layer: wire formats, WebSocket delivery and in-memory storage.

pub mod dto;
pub mod message_pusher;
pub mod repository;
