use std::env;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins when set, otherwise
/// `LOG_LEVEL` (default: info). User-facing output goes to stdout via
/// `println!`; everything routed through `tracing` is diagnostics.
pub fn init_logging() {
    let filter = match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => {
            let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            EnvFilter::new(level.to_lowercase())
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
