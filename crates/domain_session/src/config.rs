//! Session configuration

use serde::Deserialize;

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Shared HS256 secret for credential validation
    pub jwt_secret: String,
    /// Seconds between credential refresh calls
    pub refresh_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            refresh_interval_secs: 240,
        }
    }
}

impl SessionConfig {
    /// Loads configuration from `LINC_SESSION_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LINC_SESSION"))
            .build()?
            .try_deserialize()
    }
}
