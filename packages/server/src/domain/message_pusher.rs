//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのフレーム送信（イベント・ping・切断）の抽象化。
//! 具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError, event::RelayEvent, value_object::ConnectionId,
};

/// 接続ごとの送信タスクへ渡すフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// エンコード済みのエンベロープ（JSON）
    Text(String),
    /// 生存確認の ping
    Ping,
    /// 接続を閉じる
    Close,
}

/// 接続ごとの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// ブロードキャスト結果
///
/// 送信失敗は受信者ごとに記録され、ブロードキャスト自体は中断されない。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 配信に成功した接続数
    pub delivered: usize,
    /// 配信に失敗した接続とその理由
    pub failures: Vec<(ConnectionId, MessagePushError)>,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除（存在しなければ何もしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信（受信者ごとの失敗は許容）
    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &RelayEvent) -> BroadcastReport;

    /// 生存確認の ping を送信
    async fn ping(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError>;

    /// 接続を強制的に閉じる
    async fn close(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError>;
}
