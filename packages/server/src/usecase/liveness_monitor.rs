//! UseCase: 生存確認（ハートビート）
//!
//! 一定間隔で全接続を掃引し、前回の ping に応答しなかった接続を強制切断する。
//! 応答のあった接続は生存フラグを false に戻して次の ping を送る。
//! pong を受け取ると `record_pong` で生存フラグが true に戻る。
//! 生存フラグは切断の判定にだけ使い、pong 待ちの接続にもルームの配信は届く。

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::domain::ConnectionId;

use super::{context::RelayContext, disconnect_connection::DisconnectConnectionUseCase};

/// 1 回の掃引結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LivenessTick {
    /// 強制切断した接続
    pub evicted: Vec<ConnectionId>,
    /// ping を送った接続
    pub probed: Vec<ConnectionId>,
}

/// 生存確認のユースケース
pub struct LivenessMonitorUseCase {
    context: RelayContext,
    disconnect: Arc<DisconnectConnectionUseCase>,
}

impl LivenessMonitorUseCase {
    pub fn new(context: RelayContext, disconnect: Arc<DisconnectConnectionUseCase>) -> Self {
        Self {
            context,
            disconnect,
        }
    }

    /// 掃引を 1 回実行
    ///
    /// 応答のない接続の切断（`user_left` の通知を含む）を先に済ませてから、
    /// 残りの接続の生存フラグを落として ping を送る。
    pub async fn tick(&self) -> LivenessTick {
        let evicted = self.context.repository.unresponsive_connections().await;
        for connection_id in &evicted {
            tracing::warn!(connection_id = %connection_id, "liveness expired; terminating connection");
            if let Err(e) = self.context.message_pusher.close(connection_id).await {
                tracing::debug!(connection_id = %connection_id, error = %e, "close frame not delivered");
            }
            self.disconnect.execute(connection_id).await;
        }

        let probed = self.context.repository.reset_liveness().await;
        for connection_id in &probed {
            if let Err(e) = self.context.message_pusher.ping(connection_id).await {
                tracing::debug!(connection_id = %connection_id, error = %e, "ping not delivered");
            }
        }

        tracing::debug!(
            evicted = evicted.len(),
            probed = probed.len(),
            "liveness sweep complete"
        );
        LivenessTick { evicted, probed }
    }

    /// 生存確認の応答（pong）を記録
    pub async fn record_pong(&self, connection_id: &ConnectionId) {
        if let Err(e) = self.context.repository.mark_alive(connection_id).await {
            tracing::debug!(connection_id = %connection_id, error = %e, "pong from unknown connection");
        }
    }

    /// バックグラウンドで定期的に掃引するタスクを起動
    ///
    /// 最初の掃引は起動から `interval` 経過後に行う。
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.tick().await;
            }
        })
    }
}
