//! MessagePusher trait 定義
//!
//! 接続中のセッションへイベントを届けるためのインターフェース。
//! 実際の送信手段（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Message, MessagePushError, SessionId};

/// セッションごとの送信チャンネル（シリアライズ済みのフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// セッションへ配信されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// 新しいメッセージの即時配信
    Posted(Message),
    /// 未読件数の通知（UI 用のヒント）
    UnseenCount(u32),
}

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// セッションの送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// セッションの送信チャンネルを登録解除
    async fn unregister_client(&self, session_id: &SessionId);

    /// 特定のセッションへ送信
    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &FeedEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のセッションへ送信
    ///
    /// 一部のセッションへの送信失敗は他のセッションへの配信を妨げません。
    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        event: &FeedEvent,
    ) -> Result<(), MessagePushError>;
}
