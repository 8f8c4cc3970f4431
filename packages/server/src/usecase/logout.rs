//! UseCase: ログアウト処理
//!
//! 明示的なログアウトと切断の両方で呼ばれます。冪等です。

use std::sync::Arc;

use crate::domain::{MessagePusher, Session, SessionId, SessionRepository};

use super::broadcast_hub::BroadcastHub;

/// ログアウトのユースケース
pub struct LogoutUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    hub: Arc<BroadcastHub>,
}

impl LogoutUseCase {
    /// 新しい LogoutUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            hub,
        }
    }

    /// ログアウトを実行
    ///
    /// # Returns
    ///
    /// 削除されたセッション（既に存在しない場合は `None`）
    pub async fn execute(&self, session_id: &SessionId) -> Option<Session> {
        let removed = self.repository.remove(session_id).await;
        self.message_pusher.unregister_client(session_id).await;
        self.hub.forget(session_id).await;

        if let Some(session) = &removed {
            tracing::info!(
                "Session '{}' ('{}') logged out",
                session.id,
                session.nickname
            );
        }
        removed
    }
}
