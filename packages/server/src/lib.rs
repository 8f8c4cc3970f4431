//! Mini-X real-time feed server library.
//!
//! Nickname sessions, an append-only feed log and a broadcast hub that pushes
//! new messages to every connected WebSocket session.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
