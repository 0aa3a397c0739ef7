use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

const DEFAULT_SCAN_INTERVAL_HOURS: u64 = 24;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub scan_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup("SUBTRACK_DATA_FILE") {
            if !path.trim().is_empty() {
                info!(path = %path, "using data file from environment");
                config.data_file = PathBuf::from(path);
            }
        }
        if let Some(hours) = lookup("SUBTRACK_SCAN_INTERVAL_HOURS") {
            match hours
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .and_then(|value| value.checked_mul(60 * 60))
            {
                Some(secs) => config.scan_interval = Duration::from_secs(secs),
                None => warn!(value = %hours, "ignoring invalid scan interval"),
            }
        }
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            scan_interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_HOURS * 60 * 60),
        }
    }
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("subtrack").join("subscriptions.json"))
        .unwrap_or_else(|| PathBuf::from("subscriptions.json"))
}
