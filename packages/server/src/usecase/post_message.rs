//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - Feed への追記と Broadcast Hub による即時配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿が追記され、全セッションに配信される
//! - 異常系：空白のみの本文（EmptyText）、未ログイン（UnknownSession）
//! - 異常系：失敗した投稿はログに追記されない
//! - 並行性：同時の投稿でも配信順がログの順序と一致する

use std::sync::Arc;

use crate::domain::{FeedRepository, Message, MessageText, SessionId, SessionRepository};

use super::{broadcast_hub::BroadcastHub, error::PostError};

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    sessions: Arc<dyn SessionRepository>,
    feed: Arc<dyn FeedRepository>,
    hub: Arc<BroadcastHub>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
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

    /// メッセージ投稿を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 投稿するセッションの ID
    /// * `text` - 本文（前後の空白は除去される）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 追記されたメッセージ
    /// * `Err(PostError)` - 投稿失敗（ログは変更されない）
    pub async fn execute(&self, session_id: &SessionId, text: &str) -> Result<Message, PostError> {
        // 1. セッションの確認
        let session = self
            .sessions
            .find(session_id)
            .await
            .ok_or(PostError::UnknownSession)?;

        // 2. 本文の検証
        let text = MessageText::new(text)?;

        // 3. Feed に追記（ID と時刻はここで採番される）し、同じ順序で即時配信
        let (message, targets) = self
            .hub
            .append_and_publish(session_id, self.feed.append(session.nickname, text))
            .await;
        tracing::info!(
            "Message '{}' from '{}' pushed to {} session(s)",
            message.id,
            message.author,
            targets.len()
        );

        Ok(message)
    }
}
