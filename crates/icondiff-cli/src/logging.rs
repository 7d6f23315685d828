//! Logging initialization.
//!
//! Log records go to stderr so stdout stays clean for reports. The filter is
//! read from `ICONDIFF_LOG` and falls back to a level chosen by `--verbose`.
//! The record format is chosen separately by `--log-json`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "ICONDIFF_LOG";

/// Log record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// JSON lines.
    Json,
}

/// Logging settings taken from the global CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Debug level instead of the quieter default.
    pub verbose: bool,
    pub format: LogFormat,
}

impl LogSettings {
    /// Builds settings from `--verbose` and `--log-json`.
    pub fn from_flags(verbose: bool, json: bool) -> Self {
        let format = if json { LogFormat::Json } else { LogFormat::Text };
        Self { verbose, format }
    }

    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "icondiff_core=debug,icondiff_cli=debug"
        } else {
            "icondiff_core=warn,icondiff_cli=info"
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(settings: LogSettings) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(settings.default_directive()));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        // A subscriber may already be installed when embedded in tests.
        let _ = match settings.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.with_target(false).try_init(),
        };
    });
}
