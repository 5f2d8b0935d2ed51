use std::ffi::OsString;

use anyhow::Result;
use async_trait::async_trait;
use reelview_core::{SelfUpdater, UpdateOutcome};
use tracing::{info, warn};

use crate::infra::{browser, config::Config};

/// Work that surrounds binding the listener.
#[async_trait]
pub trait StartupHooks: Send + Sync {
    /// Runs before the listener is bound.
    async fn before_listen(&self, config: &Config) -> Result<()>;

    /// Runs once the listener is accepting connections on `local_url`.
    async fn after_listen(&self, config: &Config, local_url: &str) -> Result<()>;
}

/// Self-update before listening, browser launch after.
#[derive(Debug, Default)]
pub struct ProdStartupHooks {
    pub relaunch_args: Vec<OsString>,
}

impl ProdStartupHooks {
    /// Relaunches reuse the arguments this process was started with.
    pub fn from_process_args() -> Self {
        Self {
            relaunch_args: std::env::args_os().skip(1).collect(),
        }
    }
}

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn before_listen(&self, config: &Config) -> Result<()> {
        if !config.update.enabled {
            info!("self-update disabled");
            return Ok(());
        }

        let updater = match SelfUpdater::new(config.update.version_url.clone()) {
            Ok(updater) => updater.with_relaunch_args(self.relaunch_args.clone()),
            Err(err) => {
                warn!(error = %err, "self-update unavailable");
                return Ok(());
            }
        };

        match updater.run().await {
            UpdateOutcome::UpToDate => {}
            outcome @ (UpdateOutcome::CheckFailed
            | UpdateOutcome::DownloadFailed
            | UpdateOutcome::ReplaceFailed) => {
                warn!(?outcome, "continuing with the current version");
            }
            UpdateOutcome::Relaunched { version } => {
                info!(%version, "handed over to the updated executable");
            }
        }

        Ok(())
    }

    async fn after_listen(&self, config: &Config, local_url: &str) -> Result<()> {
        if config.browser.open_on_start {
            browser::open_after(local_url.to_string(), config.browser.delay);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

#[async_trait]
impl StartupHooks for NoopStartupHooks {
    async fn before_listen(&self, _config: &Config) -> Result<()> {
        Ok(())
    }

    async fn after_listen(&self, _config: &Config, _local_url: &str) -> Result<()> {
        Ok(())
    }
}
