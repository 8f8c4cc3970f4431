//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Prompt shown by the line editor
pub fn prompt(nickname: &str) -> String {
    format!("{}> ", nickname)
}

/// Redisplay the prompt after printing server output
pub fn redisplay_prompt(nickname: &str) {
    print!("{}", prompt(nickname));
    std::io::stdout().flush().ok();
}

/// Read lines on a dedicated thread and forward them over a channel.
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure. One reader
/// serves every reconnection of the process.
pub fn spawn_line_reader(nickname: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(nickname);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
