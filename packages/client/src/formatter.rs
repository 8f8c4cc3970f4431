//! Message formatting utilities for client display.

use minix_server::infrastructure::dto::websocket::{ErrorCode, MessageDto};
use minix_shared::time::timestamp_to_clock_time;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Greeting printed once the login is accepted
    pub fn format_logged_in(nickname: &str) -> String {
        format!(
            "\nYou are '{}'. Type a message and press Enter to post.\n\
             Commands: /catchup, /feed, /quit\n",
            nickname
        )
    }

    /// Format a single feed entry
    pub fn format_message(message: &MessageDto) -> String {
        format!(
            "@{} [{}]\n  {}\n",
            message.nickname,
            timestamp_to_clock_time(message.timestamp),
            message.text
        )
    }

    /// Format a live push
    pub fn format_push(message: &MessageDto) -> String {
        format!("\n{}", Self::format_message(message))
    }

    /// Format the whole local feed, newest first
    ///
    /// # Arguments
    ///
    /// * `messages` - Cached messages, newest first
    /// * `pending` - Unseen messages announced by the server
    pub fn format_feed<'a>(messages: impl Iterator<Item = &'a MessageDto>, pending: u32) -> String {
        let mut output = format!("\n{}\n", RULE);
        let mut empty = true;
        for message in messages {
            output.push_str(&Self::format_message(message));
            empty = false;
        }
        if empty {
            output.push_str("(No messages yet)\n");
        }
        if pending > 0 {
            output.push_str(&format!(
                "{} new message(s) pending, type /catchup\n",
                pending
            ));
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format an unseen-count signal
    pub fn format_unseen(count: u32) -> String {
        format!("\n* {} new message(s) available, type /catchup\n", count)
    }

    /// Format the outcome of a catch-up
    pub fn format_catch_up(added: usize) -> String {
        match added {
            0 => "\nAlready up to date\n".to_string(),
            n => format!("\nCaught up on {} message(s)\n", n),
        }
    }

    /// Format an error reported by the server
    pub fn format_error(code: ErrorCode, message: &str) -> String {
        format!("\n! {:?}: {}\n", code, message)
    }

    /// Format a frame the client could not interpret
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
