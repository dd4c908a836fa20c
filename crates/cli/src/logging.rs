//! Logging setup for CLI commands

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Parse log level from config string
fn parse_log_level(level: &str) -> LevelFilter {
  match level.trim().to_lowercase().as_str() {
    "off" => LevelFilter::OFF,
    "error" => LevelFilter::ERROR,
    "warn" => LevelFilter::WARN,
    "info" => LevelFilter::INFO,
    "debug" => LevelFilter::DEBUG,
    "trace" => LevelFilter::TRACE,
    _ => LevelFilter::INFO,
  }
}

/// Initialize console logging on stderr. `RUST_LOG` overrides `level`.
///
/// Stdout is reserved for command output.
pub fn init_cli_logging(level: &str) {
  let env_filter = EnvFilter::builder()
    .with_default_directive(parse_log_level(level).into())
    .from_env_lossy();

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
