use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the remote records API, e.g. `http://localhost:3000/api`
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Base URL of the geocoding service
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
    /// Project feed for the map viewer: a file path or an http(s) URL
    #[serde(default = "default_feed")]
    pub feed: String,
    /// Country appended to every geocoding query
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where tracing output goes; the terminal itself belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_feed() -> String {
    "projects.json".to_string()
}

fn default_country() -> String {
    "Canada".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_log_file() -> String {
    "atlas.log".to_string()
}

impl Config {
    /// Load configuration from `ATLAS_`-prefixed environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed("ATLAS_").from_env::<Config>()?;

        Ok(config)
    }

    /// API base URL without a trailing slash
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn geocoder_url(&self) -> &str {
        self.geocoder_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
