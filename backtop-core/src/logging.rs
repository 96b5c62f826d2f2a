use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging on stderr with environment-based filtering
///
/// Stdout belongs to the table, so diagnostics always go to stderr:
/// - Uses `RUST_LOG` for filtering (defaults to "warn" so a live table is not
///   interleaved with chatter)
/// - Compact human-readable output on a terminal
/// - JSON with flattened event fields otherwise
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if io::stderr().is_terminal() {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .flatten_event(true)
            .init();
    }
}
