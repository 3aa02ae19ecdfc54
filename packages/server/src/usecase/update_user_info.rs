//! UseCase: 表示名の更新

use crate::domain::{ConnectionId, RelayEvent, UserId, Username};

use super::{context::RelayContext, error::RelayError};

/// 表示名を更新し、参加中のルームに通知するユースケース
pub struct UpdateUserInfoUseCase {
    context: RelayContext,
}

impl UpdateUserInfoUseCase {
    pub fn new(context: RelayContext) -> Self {
        Self { context }
    }

    /// 参加中なら `user_info_update` を送信者以外のルーム参加者に通知する。
    /// 通知の userId は参加時のものを使う。
    /// 未参加なら識別情報として保持し、以降の参加で使う。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        user_id: UserId,
        username: Username,
    ) -> Result<(), RelayError> {
        let connection = self
            .context
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        let Some(membership) = connection.membership() else {
            self.context
                .repository
                .update_profile(connection_id, user_id, username)
                .await?;
            tracing::debug!(connection_id = %connection_id, "stored identity of unjoined connection");
            return Ok(());
        };

        if membership.user_id != user_id {
            tracing::warn!(
                connection_id = %connection_id,
                claimed = %user_id,
                joined = %membership.user_id,
                "user_info_update names another user; updating the sender's display name"
            );
        }

        let _guard = self.context.room_locks.lock(&membership.room_id).await;
        let updated = self
            .context
            .repository
            .update_profile(connection_id, user_id, username)
            .await?;

        if let Some(updated) = updated {
            let event = RelayEvent::UserInfoUpdate {
                user_id: updated.user_id.clone(),
                username: updated.username.clone(),
                timestamp: self.context.now(),
            };
            self.context
                .broadcaster
                .broadcast(&updated.room_id, &event, Some(connection_id))
                .await;
        }
        Ok(())
    }
}
