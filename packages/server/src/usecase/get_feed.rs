//! UseCase: フィード取得処理
//!
//! ログイン直後の初期フィードと HTTP API の読み取りに使用します。

use std::sync::Arc;

use crate::domain::{FeedRepository, Message, Timestamp};

/// Default number of messages replayed on login
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// フィード取得のユースケース
pub struct GetFeedUseCase {
    repository: Arc<dyn FeedRepository>,
    /// 初期フィードの件数
    history_limit: usize,
}

impl GetFeedUseCase {
    /// 新しい GetFeedUseCase を作成
    pub fn new(repository: Arc<dyn FeedRepository>, history_limit: usize) -> Self {
        Self {
            repository,
            history_limit,
        }
    }

    /// 新しい順にメッセージを取得
    ///
    /// `limit` を省略すると設定された初期フィード件数を使います。
    pub async fn recent(&self, limit: Option<usize>) -> Vec<Message> {
        self.repository
            .recent(limit.unwrap_or(self.history_limit))
            .await
    }

    /// `timestamp` より後のメッセージを古い順に取得
    pub async fn since(&self, timestamp: Timestamp) -> Vec<Message> {
        self.repository.since(timestamp).await
    }
}
