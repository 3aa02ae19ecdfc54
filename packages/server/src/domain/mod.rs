//! Domain layer: connections, rooms and the events the relay fans out.
//!
//! This layer has no knowledge of WebSocket or JSON. The infrastructure layer
//! implements the traits defined here (dependency inversion).

pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod room;
pub mod value_object;

pub use command::{ChatMessageCommand, ClientCommand};
pub use entity::{ActiveUser, Connection, ConnectionState, Membership};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::RelayEvent;
pub use message_pusher::{BroadcastReport, MessagePusher, OutboundFrame, PusherChannel};
pub use repository::ConnectionRepository;
pub use value_object::{
    ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId, Username,
};
