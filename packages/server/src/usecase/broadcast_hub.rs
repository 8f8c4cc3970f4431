//! Broadcast Hub
//!
//! 新しいメッセージを接続中の全セッションへ即時に配信し、
//! セッションごとの未読カウンタで「N 件の新着」通知を間引いて送ります。
//!
//! 即時配信は常に行われ、未読通知は UI 向けの補助的な信号にすぎません。
//! 内容の取りこぼしはキャッチアップ（`since`）で回復できます。

use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{
    FeedEvent, Message, MessagePusher, SessionId, SessionRepository, UnseenCounter, UnseenPolicy,
};

/// 配信ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastPolicy {
    /// 投稿者自身にも配信するか
    pub include_author: bool,
    /// 未読通知の間隔
    pub unseen: UnseenPolicy,
}

impl Default for BroadcastPolicy {
    fn default() -> Self {
        Self {
            include_author: true,
            unseen: UnseenPolicy::default(),
        }
    }
}

/// Broadcast Hub
pub struct BroadcastHub {
    /// Repository（配信対象の取得に使用）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    policy: BroadcastPolicy,
    /// セッションごとの未読カウンタ（ログイン中のセッションのみ）
    counters: Mutex<HashMap<SessionId, UnseenCounter>>,
    /// 追記と配信の順序を揃えるためのロック
    publish_order: Mutex<()>,
}

impl BroadcastHub {
    /// 新しい BroadcastHub を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        policy: BroadcastPolicy,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            policy,
            counters: Mutex::new(HashMap::new()),
            publish_order: Mutex::new(()),
        }
    }

    /// セッションの未読カウンタを用意（ログイン時）
    pub async fn track(&self, session_id: &SessionId) {
        let mut counters = self.counters.lock().await;
        counters.insert(session_id.clone(), UnseenCounter::new());
    }

    /// セッションの未読カウンタを破棄（ログアウト時）
    pub async fn forget(&self, session_id: &SessionId) {
        let mut counters = self.counters.lock().await;
        counters.remove(session_id);
    }

    /// 未読カウンタを 0 に戻す（キャッチアップ時）
    pub async fn reset_unseen(&self, session_id: &SessionId) {
        let mut counters = self.counters.lock().await;
        if let Some(counter) = counters.get_mut(session_id) {
            counter.reset();
        }
    }

    /// 現在の未読件数
    pub async fn unseen_count(&self, session_id: &SessionId) -> Option<u32> {
        let counters = self.counters.lock().await;
        counters.get(session_id).map(UnseenCounter::count)
    }

    /// Feed への追記と配信を 1 つの排他区間で行う
    ///
    /// 各セッションへ届く順序がログの順序と一致します。
    /// 区間内の送信は非同期チャンネルへの追加のみで、受信側を待ちません。
    ///
    /// # Arguments
    ///
    /// * `author` - 投稿したセッションの ID
    /// * `append` - 追記を行い、採番済みのメッセージを返す処理
    ///
    /// # Returns
    ///
    /// 追記したメッセージと、即時配信の対象となったセッション ID のリスト
    pub async fn append_and_publish<F>(
        &self,
        author: &SessionId,
        append: F,
    ) -> (Message, Vec<SessionId>)
    where
        F: Future<Output = Message>,
    {
        let _order = self.publish_order.lock().await;
        let message = append.await;
        let targets = self.fan_out(author, &message).await;
        (message, targets)
    }

    async fn fan_out(&self, author: &SessionId, message: &Message) -> Vec<SessionId> {
        // 1. 配信対象を取得
        let targets: Vec<SessionId> = self
            .repository
            .all_session_ids()
            .await
            .into_iter()
            .filter(|id| self.policy.include_author || id != author)
            .collect();

        // 2. 即時配信（バッチ化しない）
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &FeedEvent::Posted(message.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast message '{}': {}", message.id, e);
        }

        // 3. 投稿者以外の未読カウンタを進め、間隔に達したセッションを集める
        let signals: Vec<(SessionId, u32)> = {
            let mut counters = self.counters.lock().await;
            targets
                .iter()
                .filter(|id| *id != author)
                .filter_map(|id| {
                    counters
                        .get_mut(id)
                        .and_then(|counter| counter.record(&self.policy.unseen))
                        .map(|count| (id.clone(), count))
                })
                .collect()
        };

        // 4. 未読通知を送信（失敗はそのセッションに限定）
        for (session_id, count) in signals {
            match self
                .message_pusher
                .push_to(&session_id, &FeedEvent::UnseenCount(count))
                .await
            {
                Ok(()) => tracing::debug!(
                    "Sent unseen-count {} to session '{}'",
                    count,
                    session_id
                ),
                Err(e) => tracing::warn!(
                    "Failed to send unseen-count to session '{}': {}",
                    session_id,
                    e
                ),
            }
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageId, MessageText, Nickname, Session, Timestamp},
        infrastructure::{
            dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
            repository::InMemorySessionRepository,
        },
    };
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 即時配信が全セッションへ無条件に行われること
    // - 未読通知が 3, 6, 9 件目でのみ送られること
    // - キャッチアップ後にカウンタがリセットされること
    // ========================================

    struct Fixture {
        hub: BroadcastHub,
        repository: Arc<InMemorySessionRepository>,
        pusher: Arc<WebSocketMessagePusher>,
    }

    fn fixture(policy: BroadcastPolicy) -> Fixture {
        let repository = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let hub = BroadcastHub::new(repository.clone(), pusher.clone(), policy);
        Fixture {
            hub,
            repository,
            pusher,
        }
    }

    async fn join(fx: &Fixture, nickname: &str) -> (SessionId, mpsc::UnboundedReceiver<String>) {
        let session = Session::new(
            SessionId::generate(),
            Nickname::new(nickname).unwrap(),
            Timestamp::new(0),
        );
        let id = session.id.clone();
        fx.repository.insert_if_nickname_free(session).await.unwrap();
        fx.hub.track(&id).await;
        let (tx, rx) = mpsc::unbounded_channel();
        fx.pusher.register_client(id.clone(), tx).await;
        (id, rx)
    }

    fn message(text: &str) -> Message {
        Message::new(
            MessageId::generate(),
            Nickname::new("alice").unwrap(),
            MessageText::new(text).unwrap(),
            Timestamp::new(0),
        )
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }

    fn unseen_signals(events: &[ServerEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                ServerEvent::UnseenCount { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_posts_are_pushed_to_every_session_including_author() {
        // テスト項目: デフォルトでは投稿者を含む全セッションへ即時配信される
        // given (前提条件):
        let fx = fixture(BroadcastPolicy::default());
        let (alice, mut alice_rx) = join(&fx, "alice").await;
        let (bob, mut bob_rx) = join(&fx, "bob").await;

        // when (操作):
        let (_, targets) = fx
            .hub
            .append_and_publish(&alice, async { message("hello") })
            .await;

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&alice) && targets.contains(&bob));
        assert_eq!(drain(&mut alice_rx).len(), 1);
        assert_eq!(drain(&mut bob_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_author_can_be_excluded() {
        // テスト項目: include_author=false の場合、投稿者には配信されない
        // given (前提条件):
        let fx = fixture(BroadcastPolicy {
            include_author: false,
            ..BroadcastPolicy::default()
        });
        let (alice, mut alice_rx) = join(&fx, "alice").await;
        let (bob, _bob_rx) = join(&fx, "bob").await;

        // when (操作):
        let (_, targets) = fx
            .hub
            .append_and_publish(&alice, async { message("hello") })
            .await;

        // then (期待する結果):
        assert_eq!(targets, vec![bob]);
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unseen_signal_fires_every_third_message() {
        // テスト項目: 未読が 3, 6, 9 件になったときだけ通知が届く
        // given (前提条件):
        let fx = fixture(BroadcastPolicy::default());
        let (alice, _alice_rx) = join(&fx, "alice").await;
        let (_bob, mut bob_rx) = join(&fx, "bob").await;

        // when (操作):
        for i in 0..10 {
            fx.hub
                .append_and_publish(&alice, async { message(&format!("m{}", i)) })
                .await;
        }

        // then (期待する結果):
        let events = drain(&mut bob_rx);
        assert_eq!(unseen_signals(&events), vec![3, 6, 9]);
        let pushes = events
            .iter()
            .filter(|e| matches!(e, ServerEvent::Message { .. }))
            .count();
        assert_eq!(pushes, 10);
    }

    #[tokio::test]
    async fn test_author_is_not_counted_as_unseen() {
        // テスト項目: 自分の投稿は未読として数えられない
        // given (前提条件):
        let fx = fixture(BroadcastPolicy::default());
        let (alice, mut alice_rx) = join(&fx, "alice").await;

        // when (操作):
        for i in 0..3 {
            fx.hub
                .append_and_publish(&alice, async { message(&format!("m{}", i)) })
                .await;
        }

        // then (期待する結果):
        assert!(unseen_signals(&drain(&mut alice_rx)).is_empty());
        assert_eq!(fx.hub.unseen_count(&alice).await, Some(0));
    }

    #[tokio::test]
    async fn test_reset_unseen_restarts_throttle() {
        // テスト項目: リセット後は再び 3 件未読になるまで通知されない
        // given (前提条件):
        let fx = fixture(BroadcastPolicy::default());
        let (alice, _alice_rx) = join(&fx, "alice").await;
        let (bob, mut bob_rx) = join(&fx, "bob").await;
        for i in 0..4 {
            fx.hub
                .append_and_publish(&alice, async { message(&format!("m{}", i)) })
                .await;
        }
        assert_eq!(unseen_signals(&drain(&mut bob_rx)), vec![3]);

        // when (操作):
        fx.hub.reset_unseen(&bob).await;
        fx.hub.append_and_publish(&alice, async { message("a") }).await;
        fx.hub.append_and_publish(&alice, async { message("b") }).await;
        let before_third = unseen_signals(&drain(&mut bob_rx));
        fx.hub.append_and_publish(&alice, async { message("c") }).await;
        let after_third = unseen_signals(&drain(&mut bob_rx));

        // then (期待する結果):
        assert!(before_third.is_empty());
        assert_eq!(after_third, vec![3]);
    }

    #[tokio::test]
    async fn test_forget_drops_counter() {
        // テスト項目: ログアウトしたセッションのカウンタは破棄される
        // given (前提条件):
        let fx = fixture(BroadcastPolicy::default());
        let (alice, _alice_rx) = join(&fx, "alice").await;

        // when (操作):
        fx.hub.forget(&alice).await;

        // then (期待する結果):
        assert_eq!(fx.hub.unseen_count(&alice).await, None);
    }
}
