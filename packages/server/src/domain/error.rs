//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 前後の空白を除くとニックネームが空
    #[error("nickname must not be empty")]
    EmptyNickname,

    /// ニックネームが最大長を超えている
    #[error("nickname is too long ({actual} characters, max {max})")]
    NicknameTooLong { max: usize, actual: usize },

    /// 前後の空白を除くと本文が空
    #[error("message text must not be empty")]
    EmptyText,

    /// 本文が最大長を超えている
    #[error("message text is too long ({actual} characters, max {max})")]
    TextTooLong { max: usize, actual: usize },

    /// 未読通知の間隔は 1 以上
    #[error("unseen-count interval must be at least 1")]
    InvalidUnseenInterval,
}

/// リポジトリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 別のアクティブなセッションがニックネームを使用中
    #[error("nickname '{0}' is already taken")]
    NicknameTaken(String),
}

/// 接続中のセッションへのイベント送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// セッションに送信チャネルが登録されていない
    #[error("session '{0}' is not registered")]
    SessionNotFound(String),

    /// 送信チャネルが閉じている
    #[error("failed to push event: {0}")]
    PushFailed(String),

    /// イベントをシリアライズできない
    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
