use super::models::Config;

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Non-fatal checks on a composed configuration.
pub fn review(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.tmdb.api_key.trim().is_empty() {
        warnings.push_with_hint(
            "TMDB API key is empty; listings will come back empty",
            "Set TMDB_API_KEY or [tmdb] api_key in reelview.toml",
        );
    }

    if config.update.enabled && !config.update.version_url.starts_with("https://") {
        warnings.push(format!(
            "update descriptor {} is not fetched over HTTPS",
            config.update.version_url
        ));
    }

    warnings
}
