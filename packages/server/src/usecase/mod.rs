//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体を定義します。
//! 各ユースケースは Domain 層の trait にのみ依存します。

pub mod broadcast_hub;
pub mod catch_up;
pub mod error;
pub mod get_feed;
pub mod get_sessions;
pub mod login;
pub mod logout;
pub mod post_message;

pub use broadcast_hub::{BroadcastHub, BroadcastPolicy};
pub use catch_up::CatchUpUseCase;
pub use error::{CatchUpError, LoginError, PostError};
pub use get_feed::GetFeedUseCase;
pub use get_sessions::GetSessionsUseCase;
pub use login::LoginUseCase;
pub use logout::LogoutUseCase;
pub use post_message::PostMessageUseCase;
