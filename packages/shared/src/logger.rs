//! Logging setup shared by the Mini-X binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the Mini-X library crates and the binary itself.
/// `RUST_LOG` overrides the default when it is set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "minix-server", "minix-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use minix_shared::logger::setup_logger;
///
/// setup_logger("minix-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Logger initialized for '{}'", binary_name);
}

/// Build the filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, level: &str) -> String {
    ["minix_shared", "minix_server", "minix_client", "tower_http"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .chain(std::iter::once(format!(
            "{}={}",
            binary_name.replace('-', "_"),
            level
        )))
        .collect::<Vec<_>>()
        .join(",")
}
