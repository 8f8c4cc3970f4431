//! UseCase: ログイン処理（Session Gateway）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//! - ニックネームの検証、重複チェック、送信チャンネルの登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ニックネームでのログイン（トリム済みの正規形が返る）
//! - 異常系：使用中のニックネーム、空のニックネーム
//! - エッジケース：ログアウト後の同じニックネームでの再ログイン

use std::sync::Arc;

use minix_shared::time::Clock;

use crate::domain::{
    MessagePusher, Nickname, PusherChannel, Session, SessionId, SessionRepository, Timestamp,
};

use super::{broadcast_hub::BroadcastHub, error::LoginError};

/// ログインのユースケース
pub struct LoginUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    hub: Arc<BroadcastHub>,
    clock: Arc<dyn Clock>,
}

impl LoginUseCase {
    /// 新しい LoginUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        hub: Arc<BroadcastHub>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            hub,
            clock,
        }
    }

    /// ログインを実行
    ///
    /// # Arguments
    ///
    /// * `nickname` - 希望するニックネーム（前後の空白は除去される）
    /// * `sender` - セッションへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - ログイン成功（正規化済みのニックネームを持つ）
    /// * `Err(LoginError)` - ログイン失敗
    pub async fn execute(
        &self,
        nickname: &str,
        sender: PusherChannel,
    ) -> Result<Session, LoginError> {
        // 1. ニックネームの検証
        let nickname = Nickname::new(nickname)?;

        // 2. 重複チェックと登録（不可分）
        let session = Session::new(
            SessionId::generate(),
            nickname,
            Timestamp::new(self.clock.now_millis()),
        );
        self.repository
            .insert_if_nickname_free(session.clone())
            .await?;

        // 3. 未読カウンタと送信チャンネルを登録
        self.hub.track(&session.id).await;
        self.message_pusher
            .register_client(session.id.clone(), sender)
            .await;

        tracing::info!(
            "Session '{}' logged in as '{}'",
            session.id,
            session.nickname
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
        usecase::BroadcastPolicy,
    };
    use minix_shared::time::FixedClock;
    use tokio::sync::mpsc;

    struct Fixture {
        usecase: LoginUseCase,
        repository: Arc<InMemorySessionRepository>,
        hub: Arc<BroadcastHub>,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let hub = Arc::new(BroadcastHub::new(
            repository.clone(),
            pusher.clone(),
            BroadcastPolicy::default(),
        ));
        let usecase = LoginUseCase::new(
            repository.clone(),
            pusher,
            hub.clone(),
            Arc::new(FixedClock::new(1000)),
        );
        Fixture {
            usecase,
            repository,
            hub,
        }
    }

    #[tokio::test]
    async fn test_login_success_returns_trimmed_nickname() {
        // テスト項目: ログインに成功し、トリム済みのニックネームが返される
        // given (前提条件):
        let fx = fixture();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = fx.usecase.execute("  alice  ", tx).await;

        // then (期待する結果):
        let session = result.unwrap();
        assert_eq!(session.nickname.as_str(), "alice");
        assert_eq!(session.connected_at, Timestamp::new(1000));
        assert_eq!(fx.repository.count().await, 1);
        assert_eq!(fx.hub.unseen_count(&session.id).await, Some(0));
    }

    #[tokio::test]
    async fn test_distinct_nicknames_all_succeed() {
        // テスト項目: 異なるニックネームでのログインは全て成功する
        // given (前提条件):
        let fx = fixture();

        // when (操作):
        let mut results = Vec::new();
        for nickname in ["alice", "bob", "charlie", "Alice"] {
            let (tx, _rx) = mpsc::unbounded_channel();
            results.push(fx.usecase.execute(nickname, tx).await);
        }

        // then (期待する結果):
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(fx.repository.count().await, 4);
    }

    #[tokio::test]
    async fn test_login_duplicate_nickname_error() {
        // テスト項目: 使用中のニックネームでのログインは NicknameTaken になる
        // given (前提条件):
        let fx = fixture();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        fx.usecase.execute("alice", tx1).await.unwrap();

        // when (操作): 前後に空白があっても同じニックネームとして扱われる
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = fx.usecase.execute(" alice", tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(LoginError::NicknameTaken("alice".to_string())));
        assert_eq!(fx.repository.count().await, 1);
    }

    #[tokio::test]
    async fn test_login_empty_nickname_error() {
        // テスト項目: 空白のみのニックネームは EmptyNickname になる
        // given (前提条件):
        let fx = fixture();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = fx.usecase.execute("   ", tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(LoginError::EmptyNickname));
        assert_eq!(fx.repository.count().await, 0);
    }

    #[tokio::test]
    async fn test_nickname_available_after_session_removed() {
        // テスト項目: セッションが消えた後は同じニックネームでログインできる
        // given (前提条件):
        let fx = fixture();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let first = fx.usecase.execute("alice", tx1).await.unwrap();
        fx.repository.remove(&first.id).await;

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = fx.usecase.execute("alice", tx2).await;

        // then (期待する結果):
        let second = result.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_concurrent_logins_with_same_nickname() {
        // テスト項目: 同じニックネームでの同時ログインは 1 件のみ成功する
        // given (前提条件):
        let fx = fixture();
        let usecase = Arc::new(fx.usecase);

        // when (操作):
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let usecase = usecase.clone();
                tokio::spawn(async move {
                    let (tx, _rx) = mpsc::unbounded_channel();
                    usecase.execute("alice", tx).await
                })
            })
            .collect();
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(successes, 1);
        assert_eq!(fx.repository.count().await, 1);
    }
}
