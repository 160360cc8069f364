//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding one `<store>.db` file per store.
    pub data_dir: PathBuf,
    pub server_port: u16,
    pub overlord_url: String,
    pub overlord_timeout_secs: u64,
    /// Period of the timed limit expiry sweep; `0` disables it.
    pub sweep_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/dbs"),
            server_port: 8000,
            overlord_url: "http://127.0.0.1:8600/config".into(),
            overlord_timeout_secs: 5,
            sweep_interval_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup; missing or unparseable values
    /// keep their defaults.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let g = |key: &str| get(key).unwrap_or_default();

        Self {
            data_dir: {
                let dir = g("ACCESS_DATA_DIR");
                if dir.is_empty() { defaults.data_dir } else { PathBuf::from(dir) }
            },
            server_port: parse_u16(&g("SERVER_PORT"), defaults.server_port),
            overlord_url: {
                let url = g("OVERLORD_URL");
                if url.is_empty() { defaults.overlord_url } else { url }
            },
            overlord_timeout_secs: parse_u64(&g("OVERLORD_TIMEOUT_SECS"), defaults.overlord_timeout_secs),
            sweep_interval_secs: parse_u64(&g("SWEEP_INTERVAL_SECS"), defaults.sweep_interval_secs),
        }
    }

    pub fn overlord_timeout(&self) -> Duration {
        Duration::from_secs(self.overlord_timeout_secs)
    }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
