//! Repository trait 定義
//!
//! 接続レジストリ（誰が・どのルームに・どの名前で接続しているか）への
//! インターフェースを定義します。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{
    entity::{ActiveUser, Connection, Membership},
    error::RepositoryError,
    value_object::{ConnectionId, RoomId, UserId, Username},
};

/// Connection Repository trait
///
/// 全ての変更は呼び出し直後の読み取りに反映される（結果整合の期間はない）。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 新しい接続を未参加状態で登録
    async fn register(&self, connection: Connection);

    /// 接続のスナップショットを取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// ルーム参加情報を設定・上書き
    ///
    /// 上書き前の参加情報（未参加なら `None`）を返す。
    async fn update_membership(
        &self,
        connection_id: &ConnectionId,
        membership: Membership,
    ) -> Result<Option<Membership>, RepositoryError>;

    /// 表示名を更新
    ///
    /// 未参加の接続では識別情報として保持する。更新後の参加情報（未参加なら `None`）を返す。
    async fn update_profile(
        &self,
        connection_id: &ConnectionId,
        user_id: UserId,
        username: Username,
    ) -> Result<Option<Membership>, RepositoryError>;

    /// 接続を削除
    ///
    /// 削除した接続を返す。未登録・削除済みなら `None`（冪等）。
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// ルームのアクティブユーザー一覧（呼び出し時点のスナップショット）
    async fn active_users_in(&self, room_id: &RoomId) -> Vec<ActiveUser>;

    /// ブロードキャスト対象（ルーム内の全接続から除外対象を除いたもの。生存フラグは見ない）
    async fn broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId>;

    /// 生存確認の応答を記録
    async fn mark_alive(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 前回の ping に応答しなかった接続（生存フラグが false の接続）
    async fn unresponsive_connections(&self) -> Vec<ConnectionId>;

    /// 生存フラグが true の接続をすべて false に戻し、その接続を返す（ping の送信対象）
    async fn reset_liveness(&self) -> Vec<ConnectionId>;

    /// 登録中の接続数
    async fn count(&self) -> usize;
}
