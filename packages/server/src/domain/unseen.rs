//! 未読件数の間引き
//!
//! 他の参加者の投稿がセッションに届くたびに、キャッチアップするまで未読として数えます。
//! カウンタが設定した間隔の倍数に達したときだけ、件数のみの軽量な通知を送ります。

use std::num::NonZeroU32;

use super::error::ValueObjectError;

/// 未読通知の既定の間隔
pub const DEFAULT_UNSEEN_INTERVAL: u32 = 3;

/// 未読通知を送る間隔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnseenPolicy {
    every: NonZeroU32,
}

impl UnseenPolicy {
    pub fn new(every: u32) -> Result<Self, ValueObjectError> {
        NonZeroU32::new(every)
            .map(|every| Self { every })
            .ok_or(ValueObjectError::InvalidUnseenInterval)
    }

    pub fn every(&self) -> u32 {
        self.every.get()
    }
}

impl Default for UnseenPolicy {
    fn default() -> Self {
        Self {
            every: NonZeroU32::new(DEFAULT_UNSEEN_INTERVAL).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// セッションごとの未読カウンタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnseenCounter {
    count: u32,
}

impl UnseenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未読を 1 件記録
    ///
    /// 件数が間隔の倍数に達したときだけ、通知すべき件数を返します。
    pub fn record(&mut self, policy: &UnseenPolicy) -> Option<u32> {
        self.count = self.count.saturating_add(1);
        (self.count % policy.every() == 0).then_some(self.count)
    }

    /// キャッチアップ後にリセット（0 のときも常にリセットする）
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
