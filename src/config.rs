// Client configuration.
// Layers defaults, an optional config file and CARSTORE_* environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Origin of the car store site and its JSON API.
    pub api_base_url: String,
    /// File holding durable client state (the comparison list).
    pub storage_path: PathBuf,
    pub request_timeout_secs: u64,
    pub suggestion_debounce_ms: u64,
    pub suggestion_min_chars: usize,
    pub stats_poll_interval_secs: u64,
}

impl Settings {
    /// Loads settings from `name` (any extension the `config` crate knows,
    /// optional) on top of the defaults, then applies the environment.
    pub fn from_file(name: &str) -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("api_base_url", "http://127.0.0.1:5000")?
            .set_default("storage_path", ".car_store/storage.json")?
            .set_default("request_timeout_secs", 10)?
            .set_default("suggestion_debounce_ms", 300)?
            .set_default("suggestion_min_chars", 2)?
            .set_default("stats_poll_interval_secs", 30)?
            .add_source(File::with_name(name).required(false))
            // e.g. CARSTORE_API_BASE_URL
            .add_source(
                Environment::with_prefix("CARSTORE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }

    pub fn stats_poll_interval(&self) -> Duration {
        Duration::from_secs(self.stats_poll_interval_secs)
    }
}
