//! Log setup for the `sigbridge` binary.
//!
//! Library crates only use the `tracing` macros; the subscriber is installed
//! here, once, and always writes to stderr so stdout stays clean for emitted
//! declarations.

use clap::ValueEnum;
use std::fmt;
use std::sync::OnceLock;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "SIGBRIDGE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    }
}

/// Filter precedence: `--log-level`, then `SIGBRIDGE_LOG`, then `RUST_LOG`,
/// then `warn`.
pub fn filter_for(level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = level {
        return EnvFilter::new(level.to_string());
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::Warn.to_string()))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: Option<LogLevel>) {
    use std::io::IsTerminal;

    static INITIALISED: OnceLock<()> = OnceLock::new();

    INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let subscriber = tfmt::fmt()
            .with_env_filter(filter_for(level))
            .with_ansi(use_ansi)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .compact()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        let filter = filter_for(Some(LogLevel::Debug));
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing::level_filters::LevelFilter::DEBUG)
        );
    }

    #[test]
    fn levels_are_ordered_by_verbosity() {
        assert!(LogLevel::Error < LogLevel::Trace);
        assert_eq!(LogLevel::Info.to_string(), "info");
    }
}
