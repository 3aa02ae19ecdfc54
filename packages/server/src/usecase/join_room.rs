//! UseCase: ルーム参加（明示的な join と、メッセージによる暗黙の参加）
//!
//! ## 処理の流れ
//!
//! 1. 旧ルームと新ルームのロックを取得（ソート順）
//! 2. Repository の参加情報を上書き
//! 3. 明示的な参加なら送信者に `join_success` を返す
//! 4. 別ルームからの移動なら旧ルームに `user_left` を通知
//! 5. ロックを解放し、設定された待機時間の後に新ルームのロックを取り直して
//!    `user_joined` を送信者以外に通知

use std::time::Duration;

use crate::domain::{ConnectionId, Membership, RelayEvent, RoomId, UserId, Username};

use super::{context::RelayContext, error::RelayError};

/// 参加のきっかけ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// `join_chat` による参加（`join_success` を返す）
    Explicit,
    /// 未参加状態での `chat_message` による参加（`join_success` は返さない）
    Implicit,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    context: RelayContext,
    /// `user_joined` の通知前に置く待機時間
    settle_delay: Duration,
}

impl JoinRoomUseCase {
    pub fn new(context: RelayContext, settle_delay: Duration) -> Self {
        Self {
            context,
            settle_delay,
        }
    }

    /// ルーム参加を実行
    ///
    /// ユーザー名が省略された場合は、接続が既に知っている名前、なければ
    /// `Anonymous` を使う。確定した参加情報を返す。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        user_id: UserId,
        username: Option<Username>,
        mode: JoinMode,
    ) -> Result<Membership, RelayError> {
        let connection = self
            .context
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        let username = username
            .or_else(|| connection.known_username().cloned())
            .unwrap_or_else(Username::anonymous);
        let membership = Membership {
            room_id,
            user_id,
            username,
        };

        {
            let _guard = self
                .context
                .room_locks
                .lock_all(connection.room_id().into_iter().chain([&membership.room_id]))
                .await;

            let previous = self
                .context
                .repository
                .update_membership(connection_id, membership.clone())
                .await?;
            let now = self.context.now();

            if mode == JoinMode::Explicit {
                let ack = RelayEvent::JoinSuccess {
                    room_id: membership.room_id.clone(),
                    timestamp: now,
                };
                if let Err(e) = self.context.message_pusher.push_to(connection_id, &ack).await {
                    tracing::warn!(connection_id = %connection_id, error = %e, "failed to send join_success");
                }
            }

            if let Some(previous) = previous.filter(|p| p.room_id != membership.room_id) {
                tracing::info!(
                    connection_id = %connection_id,
                    from = %previous.room_id,
                    to = %membership.room_id,
                    "connection switched rooms"
                );
                self.context
                    .broadcaster
                    .announce_departure(&previous, now)
                    .await;
            }
        }

        tracing::info!(
            connection_id = %connection_id,
            room_id = %membership.room_id,
            user_id = %membership.user_id,
            mode = ?mode,
            "joined room"
        );

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        self.announce_arrival(connection_id, &membership).await;

        Ok(membership)
    }

    async fn announce_arrival(&self, connection_id: &ConnectionId, membership: &Membership) {
        let _guard = self.context.room_locks.lock(&membership.room_id).await;

        // The connection may have left or moved on during the settle delay.
        let still_here = self
            .context
            .repository
            .get(connection_id)
            .await
            .is_some_and(|c| c.membership() == Some(membership));
        if !still_here {
            tracing::debug!(connection_id = %connection_id, "skipping user_joined for departed connection");
            return;
        }

        let event = RelayEvent::UserJoined {
            room_id: membership.room_id.clone(),
            user_id: membership.user_id.clone(),
            username: membership.username.clone(),
            active_users: self
                .context
                .repository
                .active_users_in(&membership.room_id)
                .await,
            timestamp: self.context.now(),
        };
        self.context
            .broadcaster
            .broadcast(&membership.room_id, &event, Some(connection_id))
            .await;
    }
}
