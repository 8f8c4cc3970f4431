//! Server execution logic.

use std::{error::Error, sync::Arc};

use axum::{Router, routing::get};
use minix_shared::time::{Clock, SystemClock};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{FeedRepository, MessagePusher, SessionRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryFeedRepository, InMemorySessionRepository},
    },
    usecase::{
        BroadcastHub, BroadcastPolicy, CatchUpUseCase, GetFeedUseCase, GetSessionsUseCase,
        LoginUseCase, LogoutUseCase, PostMessageUseCase, get_feed::DEFAULT_HISTORY_LIMIT,
    },
};

use super::{
    handler::{get_feed, get_feed_since, get_sessions, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Tunables for a feed server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Number of messages replayed to a session right after login
    pub history_limit: usize,
    /// Fan-out behaviour of the broadcast hub
    pub policy: BroadcastPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            policy: BroadcastPolicy::default(),
        }
    }
}

/// WebSocket feed server
///
/// This struct encapsulates the use cases and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory(ServerConfig::default());
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// LoginUseCase（ログインのユースケース）
    login_usecase: Arc<LoginUseCase>,
    /// LogoutUseCase（ログアウトのユースケース）
    logout_usecase: Arc<LogoutUseCase>,
    /// PostMessageUseCase（投稿のユースケース）
    post_message_usecase: Arc<PostMessageUseCase>,
    /// CatchUpUseCase（キャッチアップのユースケース）
    catch_up_usecase: Arc<CatchUpUseCase>,
    /// GetFeedUseCase（フィード取得のユースケース）
    get_feed_usecase: Arc<GetFeedUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    get_sessions_usecase: Arc<GetSessionsUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `login_usecase` - UseCase for login
    /// * `logout_usecase` - UseCase for logout
    /// * `post_message_usecase` - UseCase for posting messages
    /// * `catch_up_usecase` - UseCase for catch-up requests
    /// * `get_feed_usecase` - UseCase for reading the feed
    /// * `get_sessions_usecase` - UseCase for listing sessions
    pub fn new(
        login_usecase: Arc<LoginUseCase>,
        logout_usecase: Arc<LogoutUseCase>,
        post_message_usecase: Arc<PostMessageUseCase>,
        catch_up_usecase: Arc<CatchUpUseCase>,
        get_feed_usecase: Arc<GetFeedUseCase>,
        get_sessions_usecase: Arc<GetSessionsUseCase>,
    ) -> Self {
        Self {
            login_usecase,
            logout_usecase,
            post_message_usecase,
            catch_up_usecase,
            get_feed_usecase,
            get_sessions_usecase,
        }
    }

    /// Wire a server backed by in-memory storage
    ///
    /// Dependencies are created in order:
    /// 1. Clock and repositories
    /// 2. MessagePusher
    /// 3. BroadcastHub
    /// 4. UseCases
    pub fn in_memory(config: ServerConfig) -> Self {
        // 1. Create Repositories (in-memory database)
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let feed: Arc<dyn FeedRepository> = Arc::new(InMemoryFeedRepository::new(clock.clone()));

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());

        // 3. Create BroadcastHub
        let hub = Arc::new(BroadcastHub::new(
            sessions.clone(),
            message_pusher.clone(),
            config.policy,
        ));

        // 4. Create UseCases
        Self::new(
            Arc::new(LoginUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
                hub.clone(),
                clock,
            )),
            Arc::new(LogoutUseCase::new(
                sessions.clone(),
                message_pusher,
                hub.clone(),
            )),
            Arc::new(PostMessageUseCase::new(
                sessions.clone(),
                feed.clone(),
                hub.clone(),
            )),
            Arc::new(CatchUpUseCase::new(sessions.clone(), feed.clone(), hub)),
            Arc::new(GetFeedUseCase::new(feed, config.history_limit)),
            Arc::new(GetSessionsUseCase::new(sessions)),
        )
    }

    /// Run the WebSocket feed server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn Error + Send + Sync>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = self.router();

        tracing::info!(
            "WebSocket feed server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            login_usecase: self.login_usecase,
            logout_usecase: self.logout_usecase,
            post_message_usecase: self.post_message_usecase,
            catch_up_usecase: self.catch_up_usecase,
            get_feed_usecase: self.get_feed_usecase,
            get_sessions_usecase: self.get_sessions_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/sessions", get(get_sessions))
            .route("/api/feed", get(get_feed))
            .route("/api/feed/since", get(get_feed_since))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }
}
