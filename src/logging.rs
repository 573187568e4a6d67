//! Logging initialization.
//!
//! Everything goes to stderr; the redirect document is the only artifact.

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber. An explicit `level` (from `-v`/`-q`)
/// wins over `RUST_LOG`, which wins over the default of `info`.
pub fn init(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        eprintln!("failed to initialize logging: {e}");
    }
}
