use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `dns_relay_infrastructure=debug`.
    /// Ignored when `RUST_LOG` is set.
    pub level: String,
}

impl LoggingConfig {
    /// The configured directive, or [`DEFAULT_LOG_LEVEL`] when it is blank.
    pub fn filter_directive(&self) -> &str {
        match self.level.trim() {
            "" => DEFAULT_LOG_LEVEL,
            level => level,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}
