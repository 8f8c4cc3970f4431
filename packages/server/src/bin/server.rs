//! Mini-X feed server.
//!
//! Accepts WebSocket sessions, appends posted messages to a single global feed
//! and broadcasts them to every connected session.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin minix-server
//! cargo run --bin minix-server -- --host 0.0.0.0 --port 3000 --unseen-every 5
//! ```

use clap::Parser;
use minix_server::{
    domain::UnseenPolicy,
    ui::{Server, ServerConfig},
    usecase::BroadcastPolicy,
};
use minix_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "minix-server")]
#[command(about = "Real-time micro-blogging feed server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of recent messages sent to a session right after login
    #[arg(long, default_value = "50")]
    history_limit: usize,

    /// Send an unseen-count signal every N messages a session receives
    #[arg(long, default_value = "3")]
    unseen_every: u32,

    /// Do not echo a message back to its author
    #[arg(long)]
    exclude_author: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let unseen = match UnseenPolicy::new(args.unseen_every) {
        Ok(unseen) => unseen,
        Err(e) => {
            tracing::error!("Invalid --unseen-every: {}", e);
            std::process::exit(1);
        }
    };
    let config = ServerConfig {
        history_limit: args.history_limit,
        policy: BroadcastPolicy {
            include_author: !args.exclude_author,
            unseen,
        },
    };
    tracing::debug!("Server configuration: {:?}", config);

    let server = Server::in_memory(config);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
