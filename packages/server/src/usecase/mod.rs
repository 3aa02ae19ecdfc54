//! UseCase layer: one use case per relay operation.
//!
//! Every use case that reads or writes a room's membership holds that room's
//! lock (`RoomLocks`) from the registry change through the broadcast, so
//! broadcasts within a room go out in the order their events were processed.

mod broadcast;
mod clear_room;
mod connect_connection;
mod context;
mod disconnect_connection;
mod dispatch;
mod error;
mod join_room;
mod liveness_monitor;
mod mark_read;
mod room_lock;
mod send_message;
mod typing_status;
mod update_user_info;

#[cfg(test)]
mod test_support;

pub use broadcast::RoomBroadcaster;
pub use clear_room::ClearRoomUseCase;
pub use connect_connection::ConnectConnectionUseCase;
pub use context::RelayContext;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use dispatch::EventDispatcher;
pub use error::RelayError;
pub use join_room::{JoinMode, JoinRoomUseCase};
pub use liveness_monitor::{LivenessMonitorUseCase, LivenessTick};
pub use mark_read::MarkReadUseCase;
pub use room_lock::{RoomGuard, RoomLocks};
pub use send_message::SendMessageUseCase;
pub use typing_status::TypingStatusUseCase;
pub use update_user_info::UpdateUserInfoUseCase;
