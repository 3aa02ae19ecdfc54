//! UseCase 層のエラー

use thiserror::Error;

use crate::domain::RepositoryError;

/// イベント処理のエラー
///
/// どのエラーも該当するエンベロープを破棄するだけで、接続は維持される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("connection is not joined to room '{0}'")]
    NotInRoom(String),

    #[error("sender '{claimed}' does not match joined user '{joined}'")]
    SenderMismatch { claimed: String, joined: String },

    #[error("room '{0}' is not the global room")]
    NotGlobalRoom(String),
}

impl From<RepositoryError> for RelayError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ConnectionNotFound(id) => Self::ConnectionNotFound(id),
        }
    }
}
