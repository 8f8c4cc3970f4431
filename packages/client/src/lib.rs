//! Terminal client for the Mini-X feed.
//!
//! Keeps a local copy of the feed that is hydrated on login, merged with live
//! pushes and topped up on demand with catch-up requests.

mod domain;
mod error;
mod feed_view;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use feed_view::FeedView;
pub use runner::run_client;
