//! Log output for the command line, routed through `tracing`.
//!
//! `RUST_LOG` takes precedence; otherwise the level follows the `-v` count.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn level(verbosity: u8) -> Level {
  match verbosity {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  }
}

/// Install the global subscriber. Logs go to stderr so JSON on stdout stays clean.
pub fn init_logging(verbosity: u8) -> Result<()> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(level(verbosity).as_str().to_lowercase()));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .try_init()
    .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
