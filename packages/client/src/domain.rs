//! Domain logic for client-side operations.
//!
//! Pure functions without side effects: reconnect decisions and the
//! interpretation of a line typed at the prompt.

use crate::error::ClientError;

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Publish the line as a new message
    Post(String),
    /// Request messages missed since the watermark (`/catchup`)
    CatchUp,
    /// Print the local feed again (`/feed`)
    ShowFeed,
    /// Log out and exit (`/quit`)
    Quit,
    /// A `/command` the client does not know
    Unknown(String),
}

/// Interpret a line typed at the prompt.
///
/// Returns `None` for blank input.
pub fn parse_input(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line {
        "/catchup" => InputCommand::CatchUp,
        "/feed" => InputCommand::ShowFeed,
        "/quit" => InputCommand::Quit,
        other if other.starts_with('/') => InputCommand::Unknown(other.to_string()),
        text => InputCommand::Post(text.to_string()),
    };
    Some(command)
}

/// Check if the client should exit immediately based on the error type.
///
/// Login rejections are final: retrying with the same nickname cannot succeed
/// while the server state is unchanged.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::NicknameTaken(_) | ClientError::LoginRejected(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of reconnection attempts already made
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    !should_exit_immediately(error) && current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_as_post() {
        // テスト項目: 通常の入力は前後の空白を除いた投稿として解釈される
        // given (前提条件):
        let line = "  hello world  ";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(command, Some(InputCommand::Post("hello world".to_string())));
    }

    #[test]
    fn test_parse_commands() {
        // テスト項目: スラッシュコマンドが対応するコマンドに変換される
        // given (前提条件):
        let lines = ["/catchup", "/feed", "/quit", "/nope"];

        // when (操作):
        let commands: Vec<Option<InputCommand>> = lines.iter().map(|l| parse_input(l)).collect();

        // then (期待する結果):
        assert_eq!(
            commands,
            vec![
                Some(InputCommand::CatchUp),
                Some(InputCommand::ShowFeed),
                Some(InputCommand::Quit),
                Some(InputCommand::Unknown("/nope".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_blank_line() {
        // テスト項目: 空白のみの入力は無視される
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(command, None);
    }

    #[test]
    fn test_should_exit_immediately_with_nickname_taken() {
        // テスト項目: NicknameTaken エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::NicknameTaken("alice".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_lost() {
        // テスト項目: ConnectionLost の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionLost("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_after_login_rejection() {
        // テスト項目: ログインが拒否された場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::LoginRejected("nickname must not be empty".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionLost("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let last = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionLost("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
