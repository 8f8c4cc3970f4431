//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`.

use serde::{Deserialize, Serialize};

/// Message payload as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub nickname: String,
    pub text: String,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
}

/// Frames sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Request a session for the given nickname
    Login { nickname: String },
    /// Submit a new message
    Post { text: String },
    /// Request every message posted after `last_timestamp`
    CatchUp { last_timestamp: i64 },
    /// Terminate the session
    Logout,
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Login acknowledgement or rejection
    LoginResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nickname: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
    },
    /// Recent history sent right after login (newest first)
    InitialFeed { messages: Vec<MessageDto> },
    /// Live push of a newly posted message
    Message { message: MessageDto },
    /// Throttled hint that unseen messages exist
    UnseenCount { count: u32 },
    /// Messages after the requested watermark (oldest first)
    CatchUpResult { messages: Vec<MessageDto> },
    /// Per-request failure reported to the originating session only
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    pub fn login_accepted(nickname: String) -> Self {
        Self::LoginResult {
            success: true,
            nickname: Some(nickname),
            message: None,
            code: None,
        }
    }

    pub fn login_rejected(code: ErrorCode, message: String) -> Self {
        Self::LoginResult {
            success: false,
            nickname: None,
            message: Some(message),
            code: Some(code),
        }
    }
}

/// Machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    NicknameTaken,
    EmptyNickname,
    NicknameTooLong,
    EmptyText,
    TextTooLong,
    UnknownSession,
    AlreadyLoggedIn,
    BadRequest,
}
