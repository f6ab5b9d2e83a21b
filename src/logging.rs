//! Structured logging setup using the `tracing` ecosystem.
//!
//! Used by the CLI only; the library emits events and never installs a
//! subscriber. Output is JSON or pretty-printed, auto-detected from the
//! terminal and overridable with `--json` or `--pretty`. Logs go to
//! stderr so command results on stdout stay machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

/// `-v` raises the floor to `info` so request lines are visible.
#[must_use]
pub fn effective_level(level: &LogLevel, verbosity: u8) -> tracing::Level {
    let requested = level.to_tracing_level();
    if verbosity > 0 && requested < tracing::Level::INFO {
        tracing::Level::INFO
    } else {
        requested
    }
}

pub fn init(level: tracing::Level, format: LogFormat) {
    let filter = tracing_subscriber::filter::Targets::new().with_default(level);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
