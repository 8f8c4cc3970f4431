//! Client-side view of the feed.
//!
//! The cache is ordered newest-first and holds every message id at most once,
//! whichever path (snapshot, live push or catch-up) delivered it.

use std::collections::{HashSet, VecDeque};

use minix_server::infrastructure::dto::websocket::MessageDto;

/// Local feed cache with catch-up watermark and pending counter
#[derive(Debug, Default)]
pub struct FeedView {
    messages: VecDeque<MessageDto>,
    ids: HashSet<String>,
    /// Newest timestamp confirmed by a snapshot or catch-up
    watermark: Option<i64>,
    /// Unseen messages announced by the server since the last catch-up
    pending: u32,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the initial feed sent on login.
    pub fn apply_snapshot(&mut self, messages: Vec<MessageDto>) {
        self.messages.clear();
        self.ids.clear();
        for message in messages {
            if self.ids.insert(message.id.clone()) {
                self.messages.push_back(message);
            }
        }
        // Stable: equal timestamps keep the server's order
        self.messages
            .make_contiguous()
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        self.watermark = self.messages.iter().map(|m| m.timestamp).max();
        self.pending = 0;
    }

    /// Merge a live push. Returns `false` if the message was already cached.
    ///
    /// The push lands in front of every cached message that is not newer, so
    /// the cache stays newest-first even if pushes arrive out of order. Equal
    /// timestamps are ordered by arrival.
    pub fn apply_push(&mut self, message: MessageDto) -> bool {
        if !self.ids.insert(message.id.clone()) {
            return false;
        }
        let position = self
            .messages
            .iter()
            .position(|cached| cached.timestamp <= message.timestamp)
            .unwrap_or(self.messages.len());
        self.messages.insert(position, message);
        true
    }

    /// Raise the pending counter announced by an unseen-count signal.
    ///
    /// The cache is left untouched.
    pub fn apply_unseen_signal(&mut self, count: u32) {
        self.pending = if count > self.pending {
            count
        } else {
            self.pending.saturating_add(1)
        };
    }

    /// Merge a catch-up result (oldest first).
    ///
    /// Returns the number of messages that were not cached yet.
    pub fn apply_catch_up(&mut self, messages: Vec<MessageDto>) -> usize {
        if let Some(newest) = messages.iter().map(|m| m.timestamp).max() {
            self.watermark = Some(self.watermark.map_or(newest, |w| w.max(newest)));
        }
        self.pending = 0;

        let mut added = 0;
        for message in messages {
            if self.ids.insert(message.id.clone()) {
                self.messages.push_front(message);
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Timestamp to send with the next catch-up request
    pub fn watermark(&self) -> Option<i64> {
        self.watermark
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Cached messages, newest first
    pub fn messages(&self) -> impl Iterator<Item = &MessageDto> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
