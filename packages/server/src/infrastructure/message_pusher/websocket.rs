//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel` を管理
//! - ドメインイベントを JSON エンベロープにエンコードして送信（push_to, broadcast）
//! - 生存確認の ping と強制切断フレームの送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、フレームの送信だけを担当します。
//! 送信はチャンネルへの投入のみで完了するため、遅いソケットがブロードキャストを止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        BroadcastReport, ConnectionId, MessagePushError, MessagePusher, OutboundFrame,
        PusherChannel, RelayEvent,
    },
    infrastructure::dto::websocket::{ServerEnvelope, encode_server_envelope},
};

/// ドメインイベントを送信用の JSON にエンコード
pub fn encode_event(event: &RelayEvent) -> Result<String, MessagePushError> {
    encode_server_envelope(&ServerEnvelope::from(event))
        .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&connection_id, &event).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    async fn send_frame(
        &self,
        connection_id: &ConnectionId,
        frame: OutboundFrame,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode_event(event)?;
        self.send_frame(connection_id, OutboundFrame::Text(content))
            .await?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.kind(), connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &RelayEvent) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        let content = match encode_event(event) {
            Ok(content) => content,
            Err(e) => {
                report.failures = targets.into_iter().map(|id| (id, e.clone())).collect();
                return report;
            }
        };

        let clients = self.clients.lock().await;
        for target in targets {
            let result = match clients.get(&target) {
                Some(sender) => sender
                    .send(OutboundFrame::Text(content.clone()))
                    .map_err(|e| MessagePushError::PushFailed(e.to_string())),
                None => Err(MessagePushError::ClientNotFound(target.to_string())),
            };

            // ブロードキャストでは一部の送信失敗を許容
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to push '{}' to connection '{}': {}",
                        event.kind(),
                        target,
                        e
                    );
                    report.failures.push((target, e));
                }
            }
        }

        report
    }

    async fn ping(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError> {
        self.send_frame(connection_id, OutboundFrame::Ping).await
    }

    async fn close(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError> {
        self.send_frame(connection_id, OutboundFrame::Close).await
    }
}
