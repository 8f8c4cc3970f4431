//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Message, MessageText, Nickname, RepositoryError, Session, SessionId, Timestamp};

/// Session Repository trait
///
/// ログイン中のセッション集合を管理します。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// ニックネームが空いていればセッションを登録
    ///
    /// 重複チェックと登録は 1 つの操作として不可分に行われます。
    /// 同じニックネームでの同時ログインが両方成功することはありません。
    async fn insert_if_nickname_free(&self, session: Session) -> Result<(), RepositoryError>;

    /// セッションを削除（存在しなければ `None`）
    async fn remove(&self, session_id: &SessionId) -> Option<Session>;

    /// セッションを取得
    async fn find(&self, session_id: &SessionId) -> Option<Session>;

    /// 全てのセッションを取得
    async fn list(&self) -> Vec<Session>;

    /// 全てのセッション ID を取得
    async fn all_session_ids(&self) -> Vec<SessionId>;

    /// セッション数を取得
    async fn count(&self) -> usize;
}

/// Feed Repository trait
///
/// 追記専用のメッセージログ。`posted_at` の昇順（同時刻は挿入順）で保持します。
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// メッセージを追記
    ///
    /// ID と投稿時刻の採番は追記と同じ排他区間で行われます。
    async fn append(&self, author: Nickname, text: MessageText) -> Message;

    /// 新しい順に最大 `limit` 件を取得
    async fn recent(&self, limit: usize) -> Vec<Message>;

    /// `timestamp` より後に投稿されたメッセージを古い順に取得
    async fn since(&self, timestamp: Timestamp) -> Vec<Message>;

    /// メッセージ数を取得
    async fn count(&self) -> usize;
}
