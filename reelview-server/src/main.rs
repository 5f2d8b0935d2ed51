//! # Reelview
//!
//! Local movie browser.
//!
//! On start-up the binary checks for a newer release and replaces itself
//! when one is advertised, then serves a small HTML front end over TMDB on
//! `127.0.0.1:5000` and opens it in the default browser.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use reelview_server::{
    infra::{
        config::{Config, ConfigLoad, ConfigLoader, ConfigWarnings},
        startup::{ProdStartupHooks, StartupHooks},
    },
    server,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "reelview", version)]
#[command(about = "Browse popular movies from TMDB in your browser")]
struct Cli {
    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "REELVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Do not open a browser window after start-up
    #[arg(long, default_value_t = false)]
    no_browser: bool,

    /// Skip the start-up self-update check
    #[arg(long, default_value_t = false)]
    skip_update: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = self.host.clone() {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_browser {
            config.browser.open_on_start = false;
        }
        if self.skip_update {
            config.update.enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config.clone() {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;
    cli.apply(&mut config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }
    log_warnings(&warnings);

    let hooks: Arc<dyn StartupHooks> =
        Arc::new(ProdStartupHooks::from_process_args());
    server::serve(config, hooks).await
}

fn log_warnings(warnings: &ConfigWarnings) {
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}
