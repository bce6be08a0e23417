//! Subscriber setup for binaries built on these crates
//!
//! The crates only emit `tracing` events: property reads and writes at
//! `trace`, listener changes at `debug`, cleanup failures at `warn`. A binary
//! picks a [`LoggingMode`] to decide how much of that it sees.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Names the mode, `silent`, `development` or `debug`
pub const MODE_ENV_VAR: &str = "HAL_LOG_MODE";

/// Filter directive, e.g. `hal_object=trace`; falls back to `RUST_LOG`
pub const LEVEL_ENV_VAR: &str = "HAL_LOG_LEVEL";

/// How much HAL activity to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// Install nothing
    #[default]
    Silent,
    /// One compact line per event, `info` and up
    Development,
    /// Every property access and listener change, with thread ids
    Debug,
}

impl LoggingMode {
    /// Parse a mode name; unknown names are `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(LoggingMode::Silent),
            "development" | "dev" => Some(LoggingMode::Development),
            "debug" => Some(LoggingMode::Debug),
            _ => None,
        }
    }

    /// Directive used when neither env var sets one
    fn default_directive(self) -> &'static str {
        match self {
            LoggingMode::Silent => "off",
            LoggingMode::Development => "info",
            LoggingMode::Debug => "warn,hal_object=trace,hal_controls=trace",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unknown HAL_LOG_MODE value {0:?}")]
    UnknownMode(String),

    #[error("failed to install tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a global subscriber for `mode`
///
/// Fails if another subscriber is already installed.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let filter = env_filter(mode);
    let installed = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => Registry::default()
            .with(fmt::layer().with_target(false).compact())
            .with(filter)
            .try_init(),
        LoggingMode::Debug => Registry::default()
            .with(fmt::layer().with_thread_ids(true).with_line_number(true))
            .with(filter)
            .try_init(),
    };
    installed.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Install a subscriber for the mode named by `HAL_LOG_MODE`
///
/// An unset variable means `Silent`; an unrecognized one is an error.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var(MODE_ENV_VAR) {
        Ok(name) => LoggingMode::from_name(&name).ok_or(LoggingError::UnknownMode(name))?,
        Err(_) => LoggingMode::Silent,
    };
    init_logging(mode)
}

fn env_filter(mode: LoggingMode) -> EnvFilter {
    let directive = std::env::var(LEVEL_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| mode.default_directive().to_string());
    EnvFilter::new(directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_installs_nothing() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
        assert_eq!(LoggingMode::default(), LoggingMode::Silent);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(LoggingMode::from_name("debug"), Some(LoggingMode::Debug));
        assert_eq!(LoggingMode::from_name(" Dev "), Some(LoggingMode::Development));
        assert_eq!(LoggingMode::from_name("silent"), Some(LoggingMode::Silent));
        assert_eq!(LoggingMode::from_name("loud"), None);
    }

    #[test]
    fn test_debug_mode_traces_both_crates() {
        let directive = LoggingMode::Debug.default_directive();
        assert!(directive.contains("hal_object=trace"));
        assert!(directive.contains("hal_controls=trace"));
    }
}
