//! InMemory Session Repository 実装
//!
//! セッション ID とニックネームの 2 つの索引を 1 つの Mutex で保護します。
//! ニックネームの予約は、この Mutex を保持したまま確認と登録を行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Session, SessionId, SessionRepository};

#[derive(Default)]
struct SessionTable {
    by_id: HashMap<SessionId, Session>,
    /// nickname → session id
    by_nickname: HashMap<String, SessionId>,
}

/// インメモリ Session Repository 実装
#[derive(Default)]
pub struct InMemorySessionRepository {
    table: Mutex<SessionTable>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert_if_nickname_free(&self, session: Session) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;

        if table.by_nickname.contains_key(session.nickname.as_str()) {
            return Err(RepositoryError::NicknameTaken(
                session.nickname.as_str().to_string(),
            ));
        }
        table
            .by_nickname
            .insert(session.nickname.as_str().to_string(), session.id.clone());
        table.by_id.insert(session.id.clone(), session);
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Option<Session> {
        let mut table = self.table.lock().await;
        let session = table.by_id.remove(session_id)?;
        table.by_nickname.remove(session.nickname.as_str());
        Some(session)
    }

    async fn find(&self, session_id: &SessionId) -> Option<Session> {
        let table = self.table.lock().await;
        table.by_id.get(session_id).cloned()
    }

    async fn list(&self) -> Vec<Session> {
        let table = self.table.lock().await;
        table.by_id.values().cloned().collect()
    }

    async fn all_session_ids(&self) -> Vec<SessionId> {
        let table = self.table.lock().await;
        table.by_id.keys().cloned().collect()
    }

    async fn count(&self) -> usize {
        let table = self.table.lock().await;
        table.by_id.len()
    }
}
