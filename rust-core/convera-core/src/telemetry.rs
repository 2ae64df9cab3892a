//! # Telemetry
//!
//! Installs a `tracing` subscriber for applications embedding the codecs.
//! The library itself only emits events; nothing is printed until a
//! subscriber is installed.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Default filter directive
pub const DEFAULT_FILTER: &str = "convera=info";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directives in `EnvFilter` syntax
    pub filter: String,
    /// Emit JSON lines instead of human readable text
    pub json: bool,
    /// Let `RUST_LOG` extend the filter
    pub from_env: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: true,
            from_env: false,
        }
    }
}

impl LogConfig {
    /// Default configuration that also honours `RUST_LOG`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            from_env: true,
            ..Self::default()
        }
    }

    /// Set filter directives
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enable or disable JSON output
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the `EnvFilter` for this configuration
    ///
    /// Unparseable directives are skipped.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let base = if self.from_env {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::default()
        };
        self.filter
            .split(',')
            .map(str::trim)
            .filter(|directive| !directive.is_empty())
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(base, EnvFilter::add_directive)
    }
}

/// Initialize tracing
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: &LogConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(config.env_filter());
    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "convera=info");
        assert!(config.json);
        assert!(!config.from_env);
        assert!(LogConfig::from_env().from_env);
    }

    #[test]
    fn test_env_filter_keeps_valid_directives() {
        let config = LogConfig::default().with_filter("convera=debug, ,warn");
        assert_eq!(config.env_filter().max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_init_tracing_once() {
        let config = LogConfig::default().with_json(false);
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
