//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    domain::Timestamp,
    infrastructure::dto::{
        conversion::messages_to_dto,
        http::{FeedQuery, SessionDto, SinceQuery},
        websocket::MessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List active sessions
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionDto>> {
    let sessions = state.get_sessions_usecase.execute().await;
    Json(sessions.into_iter().map(Into::into).collect())
}

/// Recent messages, newest first
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<MessageDto>> {
    let messages = state.get_feed_usecase.recent(query.limit).await;
    Json(messages_to_dto(messages))
}

/// Messages posted after `timestamp`, oldest first
pub async fn get_feed_since(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SinceQuery>,
) -> Json<Vec<MessageDto>> {
    let messages = state
        .get_feed_usecase
        .since(Timestamp::new(query.timestamp))
        .await;
    Json(messages_to_dto(messages))
}
