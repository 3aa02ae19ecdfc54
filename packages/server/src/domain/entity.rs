//! Entities.

use super::value_object::{ConnectionId, RoomId, Timestamp, UserId, Username};

/// Room membership of a joined connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: Username,
}

/// Per-connection state machine: `Unjoined -> Joined(room)`.
///
/// An unjoined connection may already know who it is (via `user_info_update`);
/// that identity is used to fill in a later join that omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined {
        user_id: Option<UserId>,
        username: Option<Username>,
    },
    Joined(Membership),
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Unjoined {
            user_id: None,
            username: None,
        }
    }
}

/// One live client-to-relay link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub state: ConnectionState,
    /// Set on registration and on every liveness response; cleared by each heartbeat probe.
    /// Only eviction reads it.
    pub alive: bool,
    pub connected_at: Timestamp,
    /// Registry-wide sequence number of the last membership/profile update.
    pub revision: u64,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            state: ConnectionState::default(),
            alive: true,
            connected_at,
            revision: 0,
        }
    }

    pub fn membership(&self) -> Option<&Membership> {
        match &self.state {
            ConnectionState::Joined(membership) => Some(membership),
            ConnectionState::Unjoined { .. } => None,
        }
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.membership().map(|m| &m.room_id)
    }

    pub fn is_in_room(&self, room_id: &RoomId) -> bool {
        self.room_id() == Some(room_id)
    }

    /// Best known display name, joined or not.
    pub fn known_username(&self) -> Option<&Username> {
        match &self.state {
            ConnectionState::Joined(membership) => Some(&membership.username),
            ConnectionState::Unjoined { username, .. } => username.as_ref(),
        }
    }
}

/// One entry of a room's active-user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    pub user_id: UserId,
    pub username: Username,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(room: &str, user: &str, name: &str) -> Membership {
        Membership {
            room_id: RoomId::try_from(room).unwrap(),
            user_id: UserId::try_from(user).unwrap(),
            username: Username::try_from(name).unwrap(),
        }
    }

    #[test]
    fn test_new_connection_is_unjoined_and_alive() {
        // テスト項目: 新規接続は未参加状態かつ生存フラグが true で作成される
        // given (前提条件):
        let id = ConnectionId::generate();

        // when (操作):
        let connection = Connection::new(id, Timestamp::new(1000));

        // then (期待する結果):
        assert!(connection.alive);
        assert!(connection.membership().is_none());
        assert!(connection.room_id().is_none());
        assert!(connection.known_username().is_none());
    }

    #[test]
    fn test_joined_connection_reports_room() {
        // テスト項目: 参加済み接続はルーム ID とユーザー名を返す
        // given (前提条件):
        let mut connection = Connection::new(ConnectionId::generate(), Timestamp::new(1000));

        // when (操作):
        connection.state = ConnectionState::Joined(membership("r1", "u1", "Alice"));

        // then (期待する結果):
        assert!(connection.is_in_room(&RoomId::try_from("r1").unwrap()));
        assert!(!connection.is_in_room(&RoomId::try_from("r2").unwrap()));
        assert_eq!(connection.known_username().unwrap().as_str(), "Alice");
    }

    #[test]
    fn test_unjoined_connection_keeps_known_username() {
        // テスト項目: 未参加でもプロフィール更新で得たユーザー名を保持できる
        // given (前提条件):
        let mut connection = Connection::new(ConnectionId::generate(), Timestamp::new(1000));

        // when (操作):
        connection.state = ConnectionState::Unjoined {
            user_id: Some(UserId::try_from("u1").unwrap()),
            username: Some(Username::try_from("Alice").unwrap()),
        };

        // then (期待する結果):
        assert!(connection.room_id().is_none());
        assert_eq!(connection.known_username().unwrap().as_str(), "Alice");
    }
}
