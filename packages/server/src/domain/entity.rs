//! エンティティ

use super::value_object::{MessageId, MessageText, Nickname, SessionId, Timestamp};

/// 投稿されたメッセージ（tuit）
///
/// Feed Store が採番・時刻付与して作成し、以後変更されません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub author: Nickname,
    pub text: MessageText,
    pub posted_at: Timestamp,
}

impl Message {
    pub fn new(id: MessageId, author: Nickname, text: MessageText, posted_at: Timestamp) -> Self {
        Self {
            id,
            author,
            text,
            posted_at,
        }
    }
}

/// ログイン中のセッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub nickname: Nickname,
    pub connected_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, nickname: Nickname, connected_at: Timestamp) -> Self {
        Self {
            id,
            nickname,
            connected_at,
        }
    }
}
