//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectConnectionUseCase, DisconnectConnectionUseCase, EventDispatcher,
    LivenessMonitorUseCase,
};

/// State handed to every handler.
pub struct AppState {
    /// ConnectConnectionUseCase（接続登録のユースケース）
    pub connect_usecase: Arc<ConnectConnectionUseCase>,
    /// DisconnectConnectionUseCase（切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectConnectionUseCase>,
    /// LivenessMonitorUseCase（pong の記録に使う）
    pub liveness_usecase: Arc<LivenessMonitorUseCase>,
    /// EventDispatcher（受信イベントの振り分け）
    pub dispatcher: Arc<EventDispatcher>,
}
