//! Mini-X terminal client.
//!
//! Logs in with a nickname, prints the initial feed and every new post, and
//! posts each line typed at the prompt. `/catchup` fetches messages missed
//! since the last sync, `/feed` reprints the local feed and `/quit` logs out.
//! Reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin minix-client -- --nickname alice
//! cargo run --bin minix-client -- -n bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use minix_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "minix-client")]
#[command(about = "Terminal client for the Mini-X real-time feed", long_about = None)]
struct Args {
    /// Nickname to log in with (must not be in use)
    #[arg(short = 'n', long)]
    nickname: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = minix_client::run_client(args.url, args.nickname).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
