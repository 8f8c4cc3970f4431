//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// ログイン失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("nickname must not be empty")]
    EmptyNickname,

    #[error("nickname is too long (max {max} characters)")]
    NicknameTooLong { max: usize },

    #[error("nickname '{0}' is already taken")]
    NicknameTaken(String),
}

impl From<ValueObjectError> for LoginError {
    fn from(error: ValueObjectError) -> Self {
        match error {
            ValueObjectError::NicknameTooLong { max, .. } => Self::NicknameTooLong { max },
            _ => Self::EmptyNickname,
        }
    }
}

impl From<RepositoryError> for LoginError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NicknameTaken(nickname) => Self::NicknameTaken(nickname),
        }
    }
}

/// 投稿失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("message text must not be empty")]
    EmptyText,

    #[error("message text is too long (max {max} characters)")]
    TextTooLong { max: usize },

    #[error("session is not logged in")]
    UnknownSession,
}

impl From<ValueObjectError> for PostError {
    fn from(error: ValueObjectError) -> Self {
        match error {
            ValueObjectError::TextTooLong { max, .. } => Self::TextTooLong { max },
            _ => Self::EmptyText,
        }
    }
}

/// キャッチアップ失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatchUpError {
    #[error("session is not logged in")]
    UnknownSession,
}
