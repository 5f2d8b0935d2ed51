use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use reelview_core::CurrencyFormat;

use super::{
    models::{
        BrowserConfig, Config, ConfigMetadata, DEFAULT_LOCALE, ServerConfig,
        TmdbConfig, UpdateConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["reelview.toml", "config/reelview.toml"];

#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load `.env`, then the TOML file (if any), then the process
    /// environment. Environment values win over the file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded =
            dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?;

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Same as [`Self::load`] but with an already gathered environment and
    /// without touching `.env`.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path, env_file_loaded);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(Path::new)
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.to_path_buf(),
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> (Config, ConfigWarnings) {
    let mut warnings = ConfigWarnings::default();

    for (name, raw) in &env.rejected {
        warnings.push(format!("ignoring {name}={raw:?}: not a valid value"));
    }

    let FileConfig {
        server: file_server,
        tmdb: file_tmdb,
        update: file_update,
        browser: file_browser,
        locale: file_locale,
    } = file_config.unwrap_or_default();

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or(server_defaults.host),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(server_defaults.port),
    };

    let tmdb_defaults = TmdbConfig::default();
    let tmdb = TmdbConfig {
        api_key: env
            .tmdb_api_key
            .or(file_tmdb.api_key)
            .unwrap_or(tmdb_defaults.api_key),
        base_url: env
            .tmdb_base_url
            .or(file_tmdb.base_url)
            .unwrap_or(tmdb_defaults.base_url),
        image_base_url: env
            .tmdb_image_base_url
            .or(file_tmdb.image_base_url)
            .unwrap_or(tmdb_defaults.image_base_url),
    };

    let update_defaults = UpdateConfig::default();
    let update = UpdateConfig {
        enabled: env
            .auto_update
            .or(file_update.enabled)
            .unwrap_or(update_defaults.enabled),
        version_url: env
            .update_url
            .or(file_update.version_url)
            .unwrap_or(update_defaults.version_url),
    };

    let browser_defaults = BrowserConfig::default();
    let browser = BrowserConfig {
        open_on_start: env
            .open_browser
            .or(file_browser.open_on_start)
            .unwrap_or(browser_defaults.open_on_start),
        delay: file_browser
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(browser_defaults.delay),
    };

    let locale = env
        .locale
        .or(file_locale)
        .or(env.system_locale)
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let currency = match CurrencyFormat::for_locale(&locale) {
        Some(format) => format,
        None => {
            warnings.push_with_hint(
                format!("unknown locale '{locale}'; formatting money as {DEFAULT_LOCALE}"),
                "Supported: en-US, en-GB, de-DE, fr-FR, ja-JP",
            );
            CurrencyFormat::default()
        }
    };

    let config = Config {
        server,
        tmdb,
        update,
        browser,
        locale,
        currency,
        metadata: ConfigMetadata {
            env_file_loaded,
            config_path,
        },
    };

    warnings.extend(validation::review(&config));

    (config, warnings)
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
