//! UseCase: 入力中ステータスの中継

use crate::domain::{ConnectionId, RelayEvent, RoomId, UserId, Username};

use super::{context::RelayContext, error::RelayError};

/// 入力中ステータスを送信者以外のルーム参加者に中継するユースケース
pub struct TypingStatusUseCase {
    context: RelayContext,
}

impl TypingStatusUseCase {
    pub fn new(context: RelayContext) -> Self {
        Self { context }
    }

    /// ユーザー名が省略された場合は参加時の名前を使う
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        user_id: UserId,
        username: Option<Username>,
        is_typing: bool,
    ) -> Result<(), RelayError> {
        let _guard = self.context.room_locks.lock(&room_id).await;
        let membership = self
            .context
            .require_member(connection_id, &room_id, &user_id)
            .await?;

        let event = RelayEvent::TypingStatus {
            room_id,
            user_id,
            username: username.or(Some(membership.username)),
            is_typing,
            timestamp: self.context.now(),
        };
        self.context
            .broadcaster
            .broadcast(&membership.room_id, &event, Some(connection_id))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::ServerEnvelope,
        usecase::test_support::{connect, create_test_context, drain, room, seat, user},
    };

    #[tokio::test]
    async fn test_typing_reaches_others_but_not_sender() {
        // テスト項目: 入力中ステータスは送信者以外のルーム参加者に届く
        // given (前提条件):
        let context = create_test_context();
        let usecase = TypingStatusUseCase::new(context.clone());
        let (alice, mut alice_inbox) = connect(&context).await;
        let (bob, mut bob_inbox) = connect(&context).await;
        seat(&context, &alice, "r1", "u1").await;
        seat(&context, &bob, "r1", "u2").await;

        // when (操作):
        usecase
            .execute(&bob, room("r1"), user("u2"), None, true)
            .await
            .unwrap();

        // then (期待する結果):
        let received = drain(&mut alice_inbox);
        assert_eq!(received.len(), 1);
        match &received[0] {
            ServerEnvelope::TypingStatus {
                user_id,
                username,
                is_typing,
                ..
            } => {
                assert_eq!(user_id, "u2");
                assert_eq!(username.as_deref(), Some("u2"));
                assert!(*is_typing);
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
        assert!(drain(&mut bob_inbox).is_empty());
    }

    #[tokio::test]
    async fn test_typing_from_unjoined_connection_is_rejected() {
        // テスト項目: 未参加の接続からの入力中ステータスは拒否される
        // given (前提条件):
        let context = create_test_context();
        let usecase = TypingStatusUseCase::new(context.clone());
        let (alice, mut alice_inbox) = connect(&context).await;
        let (bob, _b) = connect(&context).await;
        seat(&context, &alice, "r1", "u1").await;

        // when (操作):
        let result = usecase
            .execute(&bob, room("r1"), user("u2"), None, true)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::NotInRoom(_))));
        assert!(drain(&mut alice_inbox).is_empty());
    }
}
