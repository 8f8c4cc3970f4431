//! WebSocket connection handlers.
//!
//! A connection starts anonymous. The first successful `login` frame binds it
//! to a session; `post` and `catch-up` are only accepted afterwards. Closing
//! the socket (or sending `logout`) ends the session and frees the nickname.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{PusherChannel, Session, Timestamp},
    infrastructure::dto::{
        conversion::messages_to_dto,
        websocket::{ClientEvent, ErrorCode, ServerEvent},
    },
    ui::state::AppState,
    usecase::{CatchUpError, LoginError, PostError},
};

/// How long queued frames may take to flush once the connection is closing
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// Every frame for this connection goes through the channel: direct replies as
/// well as broadcasts from other sessions.
///
/// # Arguments
///
/// * `rx` - Channel receiver for outbound frames
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut send_task = pusher_loop(rx, sender);
    let mut connection = Connection::new(state, tx);
    tracing::info!("WebSocket connection opened");

    let outbound_closed = tokio::select! {
        _ = receive_loop(&mut receiver, &mut connection) => false,
        _ = &mut send_task => true,
    };

    // Treat any exit as a disconnect: the session is torn down here
    connection.close().await;

    if !outbound_closed
        && tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        send_task.abort();
    }
    tracing::info!("WebSocket connection closed");
}

async fn receive_loop(receiver: &mut SplitStream<WebSocket>, connection: &mut Connection) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                if connection.handle_text(text.as_str()).await.is_break() {
                    break;
                }
            }
            Message::Binary(data) => {
                tracing::warn!("Ignoring {} bytes of binary data", data.len());
                connection.reply(&ServerEvent::Error {
                    code: ErrorCode::BadRequest,
                    message: "binary frames are not supported".to_string(),
                });
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Client requested close");
                break;
            }
            _ => {}
        }
    }
}

/// State of a single WebSocket connection
struct Connection {
    state: Arc<AppState>,
    outbound: PusherChannel,
    session: Option<Session>,
}

impl Connection {
    fn new(state: Arc<AppState>, outbound: PusherChannel) -> Self {
        Self {
            state,
            outbound,
            session: None,
        }
    }

    /// Queue a frame for this connection only
    fn reply(&self, event: &ServerEvent) {
        match serde_json::to_string(event) {
            Ok(frame) => {
                if self.outbound.send(frame).is_err() {
                    tracing::debug!("Outbound channel closed, dropping reply");
                }
            }
            Err(e) => tracing::error!("Failed to serialize reply: {}", e),
        }
    }

    fn reply_error(&self, code: ErrorCode, message: String) {
        self.reply(&ServerEvent::Error { code, message });
    }

    async fn handle_text(&mut self, text: &str) -> ControlFlow<()> {
        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Failed to parse frame as JSON: {}", e);
                self.reply_error(ErrorCode::BadRequest, format!("invalid frame: {}", e));
                return ControlFlow::Continue(());
            }
        };

        match event {
            ClientEvent::Login { nickname } => self.login(&nickname).await,
            ClientEvent::Post { text } => self.post(&text).await,
            ClientEvent::CatchUp { last_timestamp } => {
                self.catch_up(Timestamp::new(last_timestamp)).await
            }
            ClientEvent::Logout => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    async fn login(&mut self, nickname: &str) {
        if let Some(session) = &self.session {
            self.reply_error(
                ErrorCode::AlreadyLoggedIn,
                format!("already logged in as '{}'", session.nickname),
            );
            return;
        }

        match self
            .state
            .login_usecase
            .execute(nickname, self.outbound.clone())
            .await
        {
            Ok(session) => {
                self.reply(&ServerEvent::login_accepted(
                    session.nickname.as_str().to_string(),
                ));

                let messages = self.state.get_feed_usecase.recent(None).await;
                tracing::info!(
                    "Sending initial feed of {} message(s) to '{}'",
                    messages.len(),
                    session.nickname
                );
                self.reply(&ServerEvent::InitialFeed {
                    messages: messages_to_dto(messages),
                });
                self.session = Some(session);
            }
            Err(e) => {
                tracing::warn!("Rejected login for '{}': {}", nickname.trim(), e);
                self.reply(&ServerEvent::login_rejected(login_error_code(&e), e.to_string()));
            }
        }
    }

    async fn post(&self, text: &str) {
        let Some(session) = &self.session else {
            self.reply_error(ErrorCode::UnknownSession, PostError::UnknownSession.to_string());
            return;
        };

        if let Err(e) = self
            .state
            .post_message_usecase
            .execute(&session.id, text)
            .await
        {
            tracing::warn!("Failed to post message from '{}': {}", session.nickname, e);
            self.reply_error(post_error_code(&e), e.to_string());
        }
    }

    async fn catch_up(&self, last_timestamp: Timestamp) {
        let Some(session) = &self.session else {
            self.reply_error(
                ErrorCode::UnknownSession,
                CatchUpError::UnknownSession.to_string(),
            );
            return;
        };

        match self
            .state
            .catch_up_usecase
            .execute(&session.id, last_timestamp)
            .await
        {
            Ok(messages) => self.reply(&ServerEvent::CatchUpResult {
                messages: messages_to_dto(messages),
            }),
            Err(e) => {
                tracing::warn!("Catch-up failed for '{}': {}", session.nickname, e);
                self.reply_error(ErrorCode::UnknownSession, e.to_string());
            }
        }
    }

    /// Tear down the session bound to this connection, if any
    async fn close(self) {
        if let Some(session) = self.session {
            self.state.logout_usecase.execute(&session.id).await;
        }
    }
}

fn login_error_code(error: &LoginError) -> ErrorCode {
    match error {
        LoginError::EmptyNickname => ErrorCode::EmptyNickname,
        LoginError::NicknameTooLong { .. } => ErrorCode::NicknameTooLong,
        LoginError::NicknameTaken(_) => ErrorCode::NicknameTaken,
    }
}

fn post_error_code(error: &PostError) -> ErrorCode {
    match error {
        PostError::EmptyText => ErrorCode::EmptyText,
        PostError::TextTooLong { .. } => ErrorCode::TextTooLong,
        PostError::UnknownSession => ErrorCode::UnknownSession,
    }
}
