//! CLI entry point for the Gallica client.

use gallica_client::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error ({}): {e}", e.kind());
        std::process::exit(1);
    }
}
