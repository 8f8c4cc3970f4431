//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証します。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// ニックネームの最大文字数
pub const NICKNAME_MAX_CHARS: usize = 32;

/// 本文の最大文字数
pub const MESSAGE_TEXT_MAX_CHARS: usize = 280;

/// セッション ID（接続ごとに発行される不透明な識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 新しい SessionId を発行（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// テスト用に固定の ID を作成
    #[cfg(test)]
    pub(crate) fn fixed(value: &str) -> Self {
        Self(value.to_string())
    }

    /// 新しい MessageId を発行（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ニックネーム
///
/// 前後の空白を除去した正規形で保持します。大文字・小文字は区別します。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// 入力をトリムして Nickname を作成
    ///
    /// # Errors
    ///
    /// * `EmptyNickname` - トリム後に空文字列になる場合
    /// * `NicknameTooLong` - 32 文字を超える場合
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyNickname);
        }
        let chars = trimmed.chars().count();
        if chars > NICKNAME_MAX_CHARS {
            return Err(ValueObjectError::NicknameTooLong {
                max: NICKNAME_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文（tuit）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// 入力をトリムして MessageText を作成
    ///
    /// # Errors
    ///
    /// * `EmptyText` - トリム後に空文字列になる場合
    /// * `TextTooLong` - 280 文字を超える場合
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyText);
        }
        let chars = trimmed.chars().count();
        if chars > MESSAGE_TEXT_MAX_CHARS {
            return Err(ValueObjectError::TextTooLong {
                max: MESSAGE_TEXT_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// タイムスタンプ（Unix ミリ秒, UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
