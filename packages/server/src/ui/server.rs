//! Server wiring and execution.

use std::{collections::HashMap, future::Future, sync::Arc};

use axum::{Router, routing::get};
use roomrelay_shared::time::{Clock, SystemClock};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::RelayConfig,
    domain::{ConnectionRepository, MessagePusher},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
    },
    usecase::{
        ClearRoomUseCase, ConnectConnectionUseCase, DisconnectConnectionUseCase, EventDispatcher,
        JoinRoomUseCase, LivenessMonitorUseCase, MarkReadUseCase, RelayContext,
        SendMessageUseCase, TypingStatusUseCase, UpdateUserInfoUseCase,
    },
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Chat relay server
///
/// # Example
///
/// ```ignore
/// let config = RelayConfig::try_from(ServerArgs::parse())?;
/// Server::in_memory(config).run().await?;
/// ```
pub struct Server {
    config: RelayConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Wire every use case on top of the given repository, pusher and clock.
    pub fn new(
        config: RelayConfig,
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // Initialize dependencies in order:
        // 1. Context (repository, pusher, room locks)
        // 2. UseCases
        // 3. AppState
        let context = RelayContext::new(repository, message_pusher, clock);

        let join_room = Arc::new(JoinRoomUseCase::new(
            context.clone(),
            config.join_settle_delay,
        ));
        let disconnect = Arc::new(DisconnectConnectionUseCase::new(context.clone()));
        let dispatcher = Arc::new(EventDispatcher::new(
            join_room.clone(),
            Arc::new(SendMessageUseCase::new(context.clone(), join_room)),
            Arc::new(TypingStatusUseCase::new(context.clone())),
            Arc::new(MarkReadUseCase::new(context.clone())),
            Arc::new(UpdateUserInfoUseCase::new(context.clone())),
            Arc::new(ClearRoomUseCase::new(
                context.clone(),
                config.global_room.clone(),
            )),
        ));

        let state = Arc::new(AppState {
            connect_usecase: Arc::new(ConnectConnectionUseCase::new(context.clone())),
            liveness_usecase: Arc::new(LivenessMonitorUseCase::new(context, disconnect.clone())),
            disconnect_usecase: disconnect,
            dispatcher,
        });

        Self { config, state }
    }

    /// Server backed by the in-memory registry and the WebSocket pusher.
    pub fn in_memory(config: RelayConfig) -> Self {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));
        Self::new(config, repository, message_pusher, Arc::new(SystemClock))
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", self.config.bind_addr());
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// The liveness monitor runs for the lifetime of the server.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let monitor = self
            .state
            .liveness_usecase
            .clone()
            .spawn(self.config.heartbeat_interval);

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        monitor.abort();
        tracing::info!("Server shutdown complete");
        result
    }
}
