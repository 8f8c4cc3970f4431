//! One WebSocket session: login, then interleave server frames and user input.

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use minix_server::infrastructure::dto::websocket::{
    ClientEvent, ErrorCode, MessageDto, ServerEvent,
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use super::{
    domain::{InputCommand, parse_input},
    error::ClientError,
    feed_view::FeedView,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// How a session ended without an error
enum Exit {
    Quit,
}

/// Run a single session until the user quits or the connection drops
///
/// # Arguments
///
/// * `url` - WebSocket endpoint of the server
/// * `nickname` - Nickname to log in with
/// * `input` - Lines typed by the user
///
/// # Errors
///
/// `NicknameTaken` / `LoginRejected` when the server refuses the login,
/// `ConnectionLost` when the connection fails or drops.
pub async fn run_client_session(
    url: &str,
    nickname: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
    tracing::info!("Connected to feed server");

    let (mut write, mut read) = ws_stream.split();
    let mut session = FeedSession::new(nickname);

    send_event(
        &mut write,
        &ClientEvent::Login {
            nickname: nickname.to_string(),
        },
    )
    .await?;

    loop {
        tokio::select! {
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionLost("closed by server".to_string()));
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionLost(e.to_string()));
                    }
                    Some(Ok(_)) => continue,
                };

                match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(event) => {
                        if let Err(e) = session.handle_event(event) {
                            let _ = write.close().await;
                            return Err(e);
                        }
                    }
                    Err(_) => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
                }
                session.redisplay_prompt();
            }
            line = input.recv(), if session.logged_in => {
                let command = match line {
                    Some(line) => parse_input(&line),
                    // Line reader closed: Ctrl+C or Ctrl+D
                    None => Some(InputCommand::Quit),
                };
                let Some(command) = command else { continue };

                match session.handle_command(command) {
                    Ok(Some(event)) => send_event(&mut write, &event).await?,
                    Ok(None) => {}
                    Err(Exit::Quit) => {
                        send_event(&mut write, &ClientEvent::Logout).await?;
                        let _ = write.close().await;
                        tracing::info!("Logged out");
                        return Ok(());
                    }
                }
            }
        }
    }
}

async fn send_event(write: &mut WsSink, event: &ClientEvent) -> Result<(), ClientError> {
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::ConnectionLost(format!("failed to serialize frame: {}", e)))?;
    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send frame: {}", e);
        ClientError::ConnectionLost(e.to_string())
    })
}

/// Per-connection client state
struct FeedSession {
    nickname: String,
    view: FeedView,
    logged_in: bool,
    /// Pushes that arrived before the initial feed
    early: Option<Vec<MessageDto>>,
}

impl FeedSession {
    fn new(nickname: &str) -> Self {
        Self {
            nickname: nickname.to_string(),
            view: FeedView::new(),
            logged_in: false,
            early: Some(Vec::new()),
        }
    }

    fn redisplay_prompt(&self) {
        if self.logged_in {
            redisplay_prompt(&self.nickname);
        }
    }

    fn handle_event(&mut self, event: ServerEvent) -> Result<(), ClientError> {
        match event {
            ServerEvent::LoginResult {
                success: true,
                nickname,
                ..
            } => {
                if let Some(nickname) = nickname {
                    self.nickname = nickname;
                }
                self.logged_in = true;
                tracing::info!("Logged in as '{}'", self.nickname);
                print!("{}", MessageFormatter::format_logged_in(&self.nickname));
            }
            ServerEvent::LoginResult {
                success: false,
                message,
                code,
                ..
            } => {
                let message = message.unwrap_or_else(|| "login rejected".to_string());
                return Err(match code {
                    Some(ErrorCode::NicknameTaken) => {
                        ClientError::NicknameTaken(self.nickname.clone())
                    }
                    _ => ClientError::LoginRejected(message),
                });
            }
            ServerEvent::InitialFeed { messages } => {
                self.view.apply_snapshot(messages);
                for message in self.early.take().unwrap_or_default() {
                    self.view.apply_push(message);
                }
                print!(
                    "{}",
                    MessageFormatter::format_feed(self.view.messages(), self.view.pending())
                );
            }
            ServerEvent::Message { message } => match &mut self.early {
                Some(early) => early.push(message),
                None => {
                    let formatted = MessageFormatter::format_push(&message);
                    if self.view.apply_push(message) {
                        print!("{}", formatted);
                    }
                }
            },
            ServerEvent::UnseenCount { count } => {
                self.view.apply_unseen_signal(count);
                print!("{}", MessageFormatter::format_unseen(self.view.pending()));
            }
            ServerEvent::CatchUpResult { messages } => {
                let added: Vec<MessageDto> = messages
                    .iter()
                    .filter(|m| !self.view.contains(&m.id))
                    .cloned()
                    .collect();
                let count = self.view.apply_catch_up(messages);
                for message in &added {
                    print!("{}", MessageFormatter::format_push(message));
                }
                print!("{}", MessageFormatter::format_catch_up(count));
            }
            ServerEvent::Error { code, message } => {
                tracing::debug!("Server error {:?}: {}", code, message);
                print!("{}", MessageFormatter::format_error(code, &message));
            }
        }
        Ok(())
    }

    /// Translate a command into the frame to send, if any
    fn handle_command(&self, command: InputCommand) -> Result<Option<ClientEvent>, Exit> {
        let event = match command {
            InputCommand::Post(text) => Some(ClientEvent::Post { text }),
            InputCommand::CatchUp => Some(ClientEvent::CatchUp {
                last_timestamp: self.view.watermark().unwrap_or(0),
            }),
            InputCommand::ShowFeed => {
                print!(
                    "{}",
                    MessageFormatter::format_feed(self.view.messages(), self.view.pending())
                );
                self.redisplay_prompt();
                None
            }
            InputCommand::Quit => return Err(Exit::Quit),
            InputCommand::Unknown(command) => {
                println!("Unknown command '{}'. Try /catchup, /feed or /quit", command);
                self.redisplay_prompt();
                None
            }
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, timestamp: i64) -> MessageDto {
        MessageDto {
            id: id.to_string(),
            nickname: "bob".to_string(),
            text: "hi".to_string(),
            timestamp,
        }
    }

    fn logged_in_session() -> FeedSession {
        let mut session = FeedSession::new("alice");
        session
            .handle_event(ServerEvent::login_accepted("alice".to_string()))
            .unwrap();
        session
    }

    #[test]
    fn test_nickname_taken_maps_to_client_error() {
        // テスト項目: nickname-taken によるログイン拒否は NicknameTaken エラーになる
        // given (前提条件):
        let mut session = FeedSession::new("alice");

        // when (操作):
        let result = session.handle_event(ServerEvent::login_rejected(
            ErrorCode::NicknameTaken,
            "nickname 'alice' is already taken".to_string(),
        ));

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::NicknameTaken(n)) if n == "alice"));
        assert!(!session.logged_in);
    }

    #[test]
    fn test_other_rejection_maps_to_login_rejected() {
        // テスト項目: その他のログイン拒否は LoginRejected エラーになる
        // given (前提条件):
        let mut session = FeedSession::new("   ");

        // when (操作):
        let result = session.handle_event(ServerEvent::login_rejected(
            ErrorCode::EmptyNickname,
            "nickname must not be empty".to_string(),
        ));

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::LoginRejected(_))));
    }

    #[test]
    fn test_login_uses_canonical_nickname() {
        // テスト項目: ログイン成功時はサーバーが返した正規化済みのニックネームを使う
        // given (前提条件):
        let mut session = FeedSession::new("  alice ");

        // when (操作):
        session
            .handle_event(ServerEvent::login_accepted("alice".to_string()))
            .unwrap();

        // then (期待する結果):
        assert!(session.logged_in);
        assert_eq!(session.nickname, "alice");
    }

    #[test]
    fn test_pushes_before_initial_feed_are_kept() {
        // テスト項目: 初期フィードより先に届いたプッシュもキャッシュに残る
        // given (前提条件):
        let mut session = logged_in_session();
        session
            .handle_event(ServerEvent::Message {
                message: message("late", 30),
            })
            .unwrap();

        // when (操作):
        session
            .handle_event(ServerEvent::InitialFeed {
                messages: vec![message("b", 20), message("a", 10)],
            })
            .unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = session.view.messages().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "b", "a"]);
        assert_eq!(session.view.watermark(), Some(20));
    }

    #[test]
    fn test_catch_up_command_uses_watermark() {
        // テスト項目: /catchup はウォーターマークを last_timestamp として送る
        // given (前提条件):
        let mut session = logged_in_session();
        session
            .handle_event(ServerEvent::InitialFeed {
                messages: vec![message("a", 10)],
            })
            .unwrap();

        // when (操作):
        let event = session.handle_command(InputCommand::CatchUp);

        // then (期待する結果):
        assert!(matches!(
            event,
            Ok(Some(ClientEvent::CatchUp { last_timestamp: 10 }))
        ));
    }

    #[test]
    fn test_catch_up_result_resets_pending() {
        // テスト項目: キャッチアップ結果の適用で未読件数が 0 に戻る
        // given (前提条件):
        let mut session = logged_in_session();
        session
            .handle_event(ServerEvent::InitialFeed { messages: vec![] })
            .unwrap();
        session
            .handle_event(ServerEvent::UnseenCount { count: 3 })
            .unwrap();

        // when (操作):
        session
            .handle_event(ServerEvent::CatchUpResult {
                messages: vec![message("a", 10), message("b", 20)],
            })
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.view.pending(), 0);
        assert_eq!(session.view.len(), 2);
        assert_eq!(session.view.watermark(), Some(20));
    }

    #[test]
    fn test_quit_command_ends_session() {
        // テスト項目: /quit でセッションが終了する
        // given (前提条件):
        let session = logged_in_session();

        // when (操作):
        let result = session.handle_command(InputCommand::Quit);

        // then (期待する結果):
        assert!(matches!(result, Err(Exit::Quit)));
    }
}
