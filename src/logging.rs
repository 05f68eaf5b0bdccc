//! Log-level selection and subscriber setup.
//!
//! The verbosity of a node process is chosen once at startup, from the
//! `--log-level` flag or the `KV_LOG_LEVEL` environment variable, and
//! installed as the subscriber's max-level filter.

use tracing::level_filters::LevelFilter;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_LEVEL_ENV: &str = "KV_LOG_LEVEL";

/// Process verbosity. `None` silences all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    None,
    Info,
    Debug,
}

impl LogLevel {
    /// Parses a level name. Accepts `none`/`off`/`0`, `info`/`1` and
    /// `debug`/`2`, case-insensitively; anything else falls back to `Debug`.
    pub fn parse(value: &str) -> LogLevel {
        match value.to_ascii_lowercase().as_str() {
            "none" | "off" | "0" => LogLevel::None,
            "info" | "1" => LogLevel::Info,
            "debug" | "2" => LogLevel::Debug,
            _ => LogLevel::Debug,
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::None => LevelFilter::OFF,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Level from `KV_LOG_LEVEL`, if set and non-empty.
pub fn level_from_env() -> Option<LogLevel> {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(|value| LogLevel::parse(&value))
}

/// Installs the global subscriber. Call once, before any spans or events.
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_max_level(level.to_filter())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("none"), LogLevel::None);
        assert_eq!(LogLevel::parse("OFF"), LogLevel::None);
        assert_eq!(LogLevel::parse("Info"), LogLevel::Info);
        assert_eq!(LogLevel::parse("DEBUG"), LogLevel::Debug);
    }

    #[test]
    fn parses_numeric_aliases() {
        assert_eq!(LogLevel::parse("0"), LogLevel::None);
        assert_eq!(LogLevel::parse("1"), LogLevel::Info);
        assert_eq!(LogLevel::parse("2"), LogLevel::Debug);
    }

    #[test]
    fn unknown_values_fall_back_to_debug() {
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Debug);
        assert_eq!(LogLevel::parse(""), LogLevel::Debug);
    }
}
