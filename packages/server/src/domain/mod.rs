//! Domain 層
//!
//! エンティティ、値オブジェクト、および外部への依存を表す trait を定義します。
//! このモジュールは Infrastructure 層や UI 層に依存しません。

pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod unseen;
pub mod value_object;

pub use entity::{Message, Session};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use pusher::{FeedEvent, MessagePusher, PusherChannel};
pub use repository::{FeedRepository, SessionRepository};
pub use unseen::{UnseenCounter, UnseenPolicy};
pub use value_object::{MessageId, MessageText, Nickname, SessionId, Timestamp};

#[cfg(test)]
pub use pusher::MockMessagePusher;
