//! InMemory Feed Repository 実装
//!
//! メッセージログを `Vec` で保持します。ログは常に `posted_at` の昇順
//! （同時刻は挿入順）に並んでいるため、`since` は二分探索で開始位置を求めます。
//!
//! 読み取りは RwLock の読み取りロック下で複製を返すため、
//! 並行する追記によって中途半端な状態を観測することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use minix_shared::time::Clock;
use tokio::sync::RwLock;

use crate::domain::{FeedRepository, Message, MessageId, MessageText, Nickname, Timestamp};

/// インメモリ Feed Repository 実装
pub struct InMemoryFeedRepository {
    log: RwLock<Vec<Message>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryFeedRepository {
    /// 新しい InMemoryFeedRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl FeedRepository for InMemoryFeedRepository {
    async fn append(&self, author: Nickname, text: MessageText) -> Message {
        let mut log = self.log.write().await;

        // the wall clock may step backwards; never stamp before the tail
        let now = Timestamp::new(self.clock.now_millis());
        let posted_at = log.last().map_or(now, |last| now.max(last.posted_at));

        let message = Message::new(MessageId::generate(), author, text, posted_at);
        log.push(message.clone());
        message
    }

    async fn recent(&self, limit: usize) -> Vec<Message> {
        let log = self.log.read().await;
        log.iter().rev().take(limit).cloned().collect()
    }

    async fn since(&self, timestamp: Timestamp) -> Vec<Message> {
        let log = self.log.read().await;
        let start = log.partition_point(|m| m.posted_at <= timestamp);
        log[start..].to_vec()
    }

    async fn count(&self) -> usize {
        self.log.read().await.len()
    }
}
