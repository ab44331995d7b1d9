//! `env_logger` setup shared by the demo binaries.
//!
//! The filter comes from `PATROL_GL_LOG` (via [`LoggingConfig::env_filter`]),
//! then `RUST_LOG`, and defaults to `info`. Per-frame chatter such as patrol
//! turns and frame timings is logged at `debug`, so
//! `PATROL_GL_LOG=info,patrol_gl::hot_reload=debug` follows only the reloads.
use std::sync::Once;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives; wins over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Filter directives to install, given the value of `RUST_LOG`.
fn filter_directives(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(rust_log)
        .filter(|filter| !filter.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global logger. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = filter_directives(config, std::env::var("RUST_LOG").ok());
        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();
        log::debug!("logging to stderr with filter `{filter}`");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_filter(filter: &str) -> LoggingConfig {
        LoggingConfig {
            env_filter: Some(filter.to_string()),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn configured_filter_beats_rust_log() {
        let config = with_filter("patrol_gl=debug");
        assert_eq!(
            filter_directives(&config, Some("warn".into())),
            "patrol_gl=debug"
        );
    }

    #[test]
    fn rust_log_is_the_fallback() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directives(&config, Some("trace".into())), "trace");
    }

    #[test]
    fn blank_filters_fall_back_to_info() {
        assert_eq!(filter_directives(&LoggingConfig::default(), None), "info");
        assert_eq!(filter_directives(&with_filter("  "), None), "info");
    }
}
