//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの `UnboundedSender` を管理
//! - `FeedEvent` を JSON フレームにシリアライズして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket 接続の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! 送信はチャンネルへの書き込みのみで完了するため、遅いクライアントや
//! 切断済みのクライアントが他のセッションへの配信を止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{FeedEvent, MessagePushError, MessagePusher, PusherChannel, SessionId},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.register_client(session_id.clone(), tx).await;
/// pusher.push_to(&session_id, &FeedEvent::UnseenCount(3)).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のセッションの送信チャンネル
    clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &FeedEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
        clients.insert(session_id, sender);
    }

    async fn unregister_client(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(session_id).is_some() {
            tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
        }
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &FeedEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(session_id)
            .ok_or_else(|| MessagePushError::SessionNotFound(session_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to session '{}'", session_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        event: &FeedEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => match sender.send(frame.clone()) {
                    Ok(()) => tracing::debug!("Broadcasted event to session '{}'", target),
                    Err(e) => {
                        tracing::warn!("Failed to push event to session '{}': {}", target, e)
                    }
                },
                None => tracing::warn!(
                    "Session '{}' not found during broadcast, skipping",
                    target
                ),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Message, MessageId, MessageText, Nickname, Timestamp};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のセッションへの送信
    // - broadcast: 複数セッションへの送信と、一部失敗の隔離
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（セッションが存在しない）
    // 3. broadcast の成功ケース
    // 4. broadcast で切断済みのセッションが含まれるケース
    // ========================================

    fn posted(text: &str) -> FeedEvent {
        FeedEvent::Posted(Message::new(
            MessageId::generate(),
            Nickname::new("alice").unwrap(),
            MessageText::new(text).unwrap(),
            Timestamp::new(1000),
        ))
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のセッションに JSON フレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session_id = SessionId::generate();
        pusher.register_client(session_id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&session_id, &FeedEvent::UnseenCount(3)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"unseen-count","count":3}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_to_session_not_found() {
        // テスト項目: 登録されていないセッションへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher
            .push_to(&SessionId::generate(), &FeedEvent::UnseenCount(3))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のセッションに同じフレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = SessionId::generate();
        let bob = SessionId::generate();
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when (操作):
        let result = pusher.broadcast(vec![alice, bob], &posted("hello")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let frame1 = rx1.recv().await.unwrap();
        let frame2 = rx2.recv().await.unwrap();
        assert_eq!(frame1, frame2);
        let event: ServerEvent = serde_json::from_str(&frame1).unwrap();
        assert!(matches!(
            event,
            ServerEvent::Message { ref message } if message.text == "hello"
        ));
    }

    #[tokio::test]
    async fn test_broadcast_isolates_closed_channel() {
        // テスト項目: 切断済みのセッションがあっても他のセッションには届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        drop(closed_rx);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gone = SessionId::generate();
        let alive = SessionId::generate();
        let unknown = SessionId::generate();
        pusher.register_client(gone.clone(), closed_tx).await;
        pusher.register_client(alive.clone(), tx).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![gone, unknown, alive], &posted("still delivered"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除後は送信できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let session_id = SessionId::generate();
        pusher.register_client(session_id.clone(), tx).await;

        // when (操作):
        pusher.unregister_client(&session_id).await;
        let result = pusher.push_to(&session_id, &FeedEvent::UnseenCount(3)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::SessionNotFound(_))));
    }
}
