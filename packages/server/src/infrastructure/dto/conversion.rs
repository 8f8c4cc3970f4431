//! Conversion logic between DTOs and domain entities.

use minix_shared::time::timestamp_to_rfc3339;

use crate::domain::{FeedEvent, Message, Session};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for dto::MessageDto {
    fn from(model: &Message) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            nickname: model.author.as_str().to_string(),
            text: model.text.as_str().to_string(),
            timestamp: model.posted_at.value(),
        }
    }
}

impl From<Message> for dto::MessageDto {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.into_string(),
            nickname: model.author.into_string(),
            text: model.text.into_string(),
            timestamp: model.posted_at.value(),
        }
    }
}

impl From<&FeedEvent> for dto::ServerEvent {
    fn from(event: &FeedEvent) -> Self {
        match event {
            FeedEvent::Posted(message) => Self::Message {
                message: message.into(),
            },
            FeedEvent::UnseenCount(count) => Self::UnseenCount { count: *count },
        }
    }
}

impl From<Session> for http::SessionDto {
    fn from(model: Session) -> Self {
        Self {
            nickname: model.nickname.into_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

/// Convert a sequence of messages, keeping the order
pub fn messages_to_dto(messages: Vec<Message>) -> Vec<dto::MessageDto> {
    messages.into_iter().map(Into::into).collect()
}
