//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Active session as listed by `GET /api/sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDto {
    pub nickname: String,
    /// RFC 3339 (UTC)
    pub connected_at: String,
}

/// Query for `GET /api/feed`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
}

/// Query for `GET /api/feed/since`
#[derive(Debug, Clone, Deserialize)]
pub struct SinceQuery {
    pub timestamp: i64,
}
