//! Utilities shared by the Mini-X server and client binaries.

pub mod logger;
pub mod time;
