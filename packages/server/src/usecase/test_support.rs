//! Fixtures shared by the use case tests.

use std::{collections::HashMap, sync::Arc};

use roomrelay_shared::time::FixedClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        ConnectionId, ConnectionRepository, Membership, OutboundFrame, RoomId, UserId, Username,
    },
    infrastructure::{
        dto::websocket::ServerEnvelope, message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository,
    },
};

use super::{connect_connection::ConnectConnectionUseCase, context::RelayContext};

/// 2023-01-01T00:00:00.000Z
pub const FIXED_NOW: i64 = 1_672_531_200_000;

pub type Inbox = mpsc::UnboundedReceiver<OutboundFrame>;

pub fn create_test_context() -> RelayContext {
    let repository = Arc::new(InMemoryConnectionRepository::new());
    let clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(clients));
    RelayContext::new(repository, message_pusher, Arc::new(FixedClock::new(FIXED_NOW)))
}

pub fn room(value: &str) -> RoomId {
    RoomId::try_from(value).unwrap()
}

pub fn user(value: &str) -> UserId {
    UserId::try_from(value).unwrap()
}

pub fn name(value: &str) -> Username {
    Username::try_from(value).unwrap()
}

/// Register a fresh connection and return its outbound inbox.
pub async fn connect(context: &RelayContext) -> (ConnectionId, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = ConnectConnectionUseCase::new(context.clone()).execute(tx).await;
    (id, rx)
}

/// Put a connection straight into a room, bypassing the join flow.
pub async fn seat(context: &RelayContext, id: &ConnectionId, room_id: &str, user_id: &str) {
    context
        .repository
        .update_membership(
            id,
            Membership {
                room_id: room(room_id),
                user_id: user(user_id),
                username: name(user_id),
            },
        )
        .await
        .unwrap();
}

/// Drain every envelope queued for a connection so far.
pub fn drain(inbox: &mut Inbox) -> Vec<ServerEnvelope> {
    let mut envelopes = Vec::new();
    while let Ok(frame) = inbox.try_recv() {
        if let OutboundFrame::Text(json) = frame {
            envelopes.push(serde_json::from_str(&json).unwrap());
        }
    }
    envelopes
}

/// Drain and return the raw frames, including pings and closes.
pub fn drain_frames(inbox: &mut Inbox) -> Vec<OutboundFrame> {
    let mut frames = Vec::new();
    while let Ok(frame) = inbox.try_recv() {
        frames.push(frame);
    }
    frames
}
