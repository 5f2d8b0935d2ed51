use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub update: FileUpdateConfig,
    #[serde(default)]
    pub browser: FileBrowserConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUpdateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileBrowserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_on_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub tmdb_image_base_url: Option<String>,
    pub update_url: Option<String>,
    pub auto_update: Option<bool>,
    pub open_browser: Option<bool>,
    pub locale: Option<String>,
    /// Process locale (`LC_ALL`, `LC_MONETARY`, `LANG`), used when nothing
    /// else names one.
    pub system_locale: Option<String>,
    /// `(variable, raw value)` pairs that were set but could not be parsed.
    pub rejected: Vec<(String, String)>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = Self::default();

        env_config.config_path = lookup("REELVIEW_CONFIG").map(PathBuf::from);
        env_config.server_host = non_empty(lookup("SERVER_HOST"));
        env_config.server_port = env_config.parse_var(&lookup, "SERVER_PORT", |raw| {
            raw.parse().ok()
        });
        env_config.tmdb_api_key = lookup("TMDB_API_KEY");
        env_config.tmdb_base_url = non_empty(lookup("TMDB_BASE_URL"));
        env_config.tmdb_image_base_url = non_empty(lookup("TMDB_IMAGE_BASE_URL"));
        env_config.update_url = non_empty(lookup("REELVIEW_UPDATE_URL"));
        env_config.auto_update =
            env_config.parse_var(&lookup, "REELVIEW_AUTO_UPDATE", parse_bool);
        env_config.open_browser =
            env_config.parse_var(&lookup, "REELVIEW_OPEN_BROWSER", parse_bool);
        env_config.locale = non_empty(lookup("REELVIEW_LOCALE"));
        env_config.system_locale = ["LC_ALL", "LC_MONETARY", "LANG"]
            .into_iter()
            .find_map(|name| non_empty(lookup(name)))
            .filter(|tag| !is_posix_locale(tag));

        env_config
    }

    fn parse_var<F, T>(
        &mut self,
        lookup: &F,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(name)?;
        let parsed = parse(raw.trim());
        if parsed.is_none() {
            self.rejected.push((name.to_string(), raw));
        }
        parsed
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `C`, `POSIX` and `C.UTF-8` carry no regional money format.
fn is_posix_locale(tag: &str) -> bool {
    let base = tag.split('.').next().unwrap_or_default();
    base == "C" || base == "POSIX"
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
