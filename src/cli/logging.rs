//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::schema::config::DEFAULT_LOG_LEVEL;

/// Filter used when `RUST_LOG` is unset.
///
/// Each `-v` raises the level one step above the configured one.
pub fn default_filter(verbose: u8, config_level: &str) -> String {
    match verbose {
        0 => config_level.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over everything else. Calling this twice is harmless.
pub fn init(verbose: u8, config_level: &str) {
    let fallback = default_filter(verbose, config_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
