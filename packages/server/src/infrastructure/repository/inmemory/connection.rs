//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリのレジストリとして使用し、全ての操作を 1 つの Mutex で直列化します。
//! ルームごとのビュー（アクティブユーザー、配信対象）は `domain::room` の純粋関数で毎回計算します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ActiveUser, Connection, ConnectionId, ConnectionRepository, ConnectionState, Membership,
    RepositoryError, RoomId, UserId, Username, room,
};

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, Connection>,
    /// 参加情報・プロフィール更新ごとに増える通し番号
    last_revision: u64,
}

impl Registry {
    fn next_revision(&mut self) -> u64 {
        self.last_revision += 1;
        self.last_revision
    }

    fn get_mut(&mut self, id: &ConnectionId) -> Result<&mut Connection, RepositoryError> {
        self.connections
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }
}

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    registry: Mutex<Registry>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) {
        let mut registry = self.registry.lock().await;
        registry.connections.insert(connection.id, connection);
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let registry = self.registry.lock().await;
        registry.connections.get(connection_id).cloned()
    }

    async fn update_membership(
        &self,
        connection_id: &ConnectionId,
        membership: Membership,
    ) -> Result<Option<Membership>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let revision = registry.next_revision();
        let connection = registry.get_mut(connection_id)?;

        let previous = std::mem::replace(&mut connection.state, ConnectionState::Joined(membership));
        connection.revision = revision;

        Ok(match previous {
            ConnectionState::Joined(previous) => Some(previous),
            ConnectionState::Unjoined { .. } => None,
        })
    }

    async fn update_profile(
        &self,
        connection_id: &ConnectionId,
        user_id: UserId,
        username: Username,
    ) -> Result<Option<Membership>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let revision = registry.next_revision();
        let connection = registry.get_mut(connection_id)?;
        connection.revision = revision;

        match &mut connection.state {
            ConnectionState::Joined(membership) => {
                membership.username = username;
                Ok(Some(membership.clone()))
            }
            ConnectionState::Unjoined { .. } => {
                connection.state = ConnectionState::Unjoined {
                    user_id: Some(user_id),
                    username: Some(username),
                };
                Ok(None)
            }
        }
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut registry = self.registry.lock().await;
        registry.connections.remove(connection_id)
    }

    async fn active_users_in(&self, room_id: &RoomId) -> Vec<ActiveUser> {
        let registry = self.registry.lock().await;
        room::active_users_in(registry.connections.values(), room_id)
    }

    async fn broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        room::broadcast_targets(registry.connections.values(), room_id, exclude)
    }

    async fn mark_alive(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.get_mut(connection_id)?.alive = true;
        Ok(())
    }

    async fn unresponsive_connections(&self) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        let mut ids: Vec<ConnectionId> = registry
            .connections
            .values()
            .filter(|c| !c.alive)
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    async fn reset_liveness(&self) -> Vec<ConnectionId> {
        let mut registry = self.registry.lock().await;
        let mut probed = Vec::new();

        for connection in registry.connections.values_mut().filter(|c| c.alive) {
            connection.alive = false;
            probed.push(connection.id);
        }

        probed.sort();
        probed
    }

    async fn count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.connections.len()
    }
}
