use std::{fmt, sync::Arc};

use anyhow::Context;
use reelview_core::{CurrencyFormat, TmdbClient};

use crate::infra::config::Config;

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        let tmdb = TmdbClient::new(config.tmdb.api_key.clone())
            .context("failed to build TMDB client")?
            .with_base_url(config.tmdb.base_url.clone())
            .with_image_base_url(config.tmdb.image_base_url.clone());

        Ok(Self {
            config,
            tmdb: Arc::new(tmdb),
        })
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.config.currency
    }
}
