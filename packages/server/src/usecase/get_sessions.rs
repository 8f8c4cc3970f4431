//! UseCase: ログイン中セッション一覧の取得

use std::sync::Arc;

use crate::domain::{Session, SessionRepository};

/// セッション一覧取得のユースケース
pub struct GetSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionsUseCase {
    /// 新しい GetSessionsUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// ニックネーム順のセッション一覧を取得
    pub async fn execute(&self) -> Vec<Session> {
        let mut sessions = self.repository.list().await;
        sessions.sort_by(|a, b| a.nickname.as_str().cmp(b.nickname.as_str()));
        sessions
    }
}
