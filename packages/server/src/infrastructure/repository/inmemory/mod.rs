//! インメモリ Repository 実装

pub mod feed;
pub mod session;

pub use feed::InMemoryFeedRepository;
pub use session::InMemorySessionRepository;
