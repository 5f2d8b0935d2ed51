use std::{path::PathBuf, time::Duration};

use reelview_core::{
    CurrencyFormat,
    tmdb::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL},
    update::DEFAULT_VERSION_URL,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_BROWSER_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub tmdb: TmdbConfig,
    pub update: UpdateConfig,
    pub browser: BrowserConfig,
    pub locale: String,
    pub currency: CurrencyFormat,
    pub metadata: ConfigMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            tmdb: TmdbConfig::default(),
            update: UpdateConfig::default(),
            browser: BrowserConfig::default(),
            locale: DEFAULT_LOCALE.to_string(),
            currency: CurrencyFormat::default(),
            metadata: ConfigMetadata::default(),
        }
    }
}

impl Config {
    /// Address a local browser should open. Wildcard binds are reached
    /// through loopback.
    pub fn local_url(&self) -> String {
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => DEFAULT_HOST,
            host => host,
        };
        format!("http://{}:{}/", host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub enabled: bool,
    pub version_url: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version_url: DEFAULT_VERSION_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub open_on_start: bool,
    pub delay: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            open_on_start: true,
            delay: DEFAULT_BROWSER_DELAY,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub env_file_loaded: bool,
    pub config_path: Option<PathBuf>,
}
