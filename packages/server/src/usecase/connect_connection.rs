//! UseCase: 接続の登録

use crate::domain::{Connection, ConnectionId, PusherChannel};

use super::context::RelayContext;

/// 新しい接続を未参加状態で登録するユースケース
pub struct ConnectConnectionUseCase {
    context: RelayContext,
}

impl ConnectConnectionUseCase {
    pub fn new(context: RelayContext) -> Self {
        Self { context }
    }

    /// 接続を登録し、割り当てた ConnectionId を返す
    ///
    /// 1. Repository に未参加・生存状態で登録
    /// 2. MessagePusher に送信チャンネルを登録
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();

        self.context
            .repository
            .register(Connection::new(connection_id, self.context.now()))
            .await;
        self.context
            .message_pusher
            .register_client(connection_id, sender)
            .await;

        tracing::info!(connection_id = %connection_id, "connection registered");
        connection_id
    }
}
