use crate::presentation::config::LoggingSettings;

pub const DEFAULT_LOG_FILTER: &str = "info,wordstamp=debug,tower_http=debug";

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
}

impl TracingConfig {
    /// Applies the `logging` settings section. JSON stays on if `LOG_FORMAT` already asked for it.
    pub fn with_logging(mut self, logging: &LoggingSettings) -> Self {
        self.json_format = self.json_format || logging.enable_json;
        let level = logging.level.trim();
        if !level.is_empty() {
            self.filter = level.to_string();
        }
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
