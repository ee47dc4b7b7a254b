//! logging
//!
//! Diagnostic logging for the binary.
//!
//! Library code emits `tracing` events; this module installs the
//! subscriber that renders them. Events always go to stderr so they never
//! mix with command output.
//!
//! # Filtering
//!
//! - `RUST_LOG` wins when set
//! - otherwise `debug` for this crate under `--debug`, else `warn`
//!
//! `TRIAGE_LOG_FORMAT=json` switches to one JSON object per line.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read the format from `TRIAGE_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("TRIAGE_LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "warn,triage_client=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(debug)
                    .without_time()
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    // Already installed by an embedding application.
    result.ok();
}
