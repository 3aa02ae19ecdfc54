//! UseCase: 接続の切断
//!
//! トランスポートのクローズと生存確認による強制切断の両方から呼ばれる。
//! Repository からの削除に成功した呼び出しだけが `user_left` を通知するため、
//! 同じ接続に対して何度呼ばれても通知は一度だけになる。

use crate::domain::{BroadcastReport, ConnectionId};

use super::context::RelayContext;

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    context: RelayContext,
}

impl DisconnectConnectionUseCase {
    pub fn new(context: RelayContext) -> Self {
        Self { context }
    }

    /// 接続を削除し、参加中だったルームに `user_left` を通知する
    ///
    /// # Returns
    ///
    /// * `Some(report)` - 参加中の接続を削除し、退出を通知した
    /// * `None` - 未参加の接続だった、または既に削除済み
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<BroadcastReport> {
        let snapshot = self.context.repository.get(connection_id).await;
        let locked_room = snapshot.as_ref().and_then(|c| c.room_id().cloned());

        let mut guard = match &locked_room {
            Some(room_id) => Some(self.context.room_locks.lock(room_id).await),
            None => None,
        };

        let removed = self.context.repository.remove(connection_id).await;
        self.context
            .message_pusher
            .unregister_client(connection_id)
            .await;

        let Some(removed) = removed else {
            tracing::debug!(connection_id = %connection_id, "connection already removed");
            return None;
        };
        tracing::info!(connection_id = %connection_id, "connection removed");

        let membership = removed.membership()?;
        if locked_room.as_ref() != Some(&membership.room_id) {
            // Joined a room after the snapshot; lock the room it actually left.
            drop(guard.take());
            guard = Some(self.context.room_locks.lock(&membership.room_id).await);
        }

        let report = self
            .context
            .broadcaster
            .announce_departure(membership, self.context.now())
            .await;
        drop(guard);

        tracing::info!(
            connection_id = %connection_id,
            room_id = %membership.room_id,
            user_id = %membership.user_id,
            notified = report.delivered,
            "user left room"
        );
        Some(report)
    }
}
