//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    CatchUpUseCase, GetFeedUseCase, GetSessionsUseCase, LoginUseCase, LogoutUseCase,
    PostMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub login_usecase: Arc<LoginUseCase>,
    pub logout_usecase: Arc<LogoutUseCase>,
    pub post_message_usecase: Arc<PostMessageUseCase>,
    pub catch_up_usecase: Arc<CatchUpUseCase>,
    pub get_feed_usecase: Arc<GetFeedUseCase>,
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
}
