//! UseCase: キャッチアップ処理
//!
//! ウォーターマーク以降のメッセージを返し、未読カウンタを 0 に戻します。

use std::sync::Arc;

use crate::domain::{FeedRepository, Message, SessionId, SessionRepository, Timestamp};

use super::{broadcast_hub::BroadcastHub, error::CatchUpError};

/// キャッチアップのユースケース
pub struct CatchUpUseCase {
    sessions: Arc<dyn SessionRepository>,
    feed: Arc<dyn FeedRepository>,
    hub: Arc<BroadcastHub>,
}

impl CatchUpUseCase {
    /// 新しい CatchUpUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        feed: Arc<dyn FeedRepository>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            sessions,
            feed,
            hub,
        }
    }

    /// キャッチアップを実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Message>)` - `last_timestamp` より後のメッセージ（古い順）
    /// * `Err(CatchUpError)` - 未ログインのセッション
    pub async fn execute(
        &self,
        session_id: &SessionId,
        last_timestamp: Timestamp,
    ) -> Result<Vec<Message>, CatchUpError> {
        if self.sessions.find(session_id).await.is_none() {
            return Err(CatchUpError::UnknownSession);
        }

        let messages = self.feed.since(last_timestamp).await;
        // counter resets on every catch-up, even when it is already zero
        self.hub.reset_unseen(session_id).await;

        tracing::debug!(
            "Session '{}' caught up {} message(s) since {}",
            session_id,
            messages.len(),
            last_timestamp.value()
        );
        Ok(messages)
    }
}
