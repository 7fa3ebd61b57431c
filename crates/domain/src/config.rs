use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_stats_path")]
    pub path: String,

    /// How long aggregated units are kept. Units older than this are evicted
    /// by the maintenance job. Rounded up to whole hours.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.path.is_empty() {
            return Err(DomainError::ConfigError(
                "stats store path must not be empty".to_string(),
            ));
        }
        if self.retention_hours == 0 {
            return Err(DomainError::ConfigError(
                "stats retention must be at least one hour".to_string(),
            ));
        }
        if self.tick_interval_secs == 0 {
            return Err(DomainError::ConfigError(
                "stats tick interval must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_hours) * 3600)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            path: default_stats_path(),
            retention_hours: default_retention_hours(),
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

fn default_stats_path() -> String {
    "./tally-dns-stats.db".to_string()
}

fn default_retention_hours() -> u32 {
    24
}

fn default_tick_interval_secs() -> u64 {
    3600
}
