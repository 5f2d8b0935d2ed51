use std::sync::Arc;

use anyhow::Context;
use reelview_core::CURRENT_VERSION;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    infra::{app_state::AppState, config::Config, startup::StartupHooks},
    routes,
};

/// Run the pre-listen hook, bind the configured address and serve until the
/// process ends.
pub async fn serve(config: Config, hooks: Arc<dyn StartupHooks>) -> anyhow::Result<()> {
    hooks
        .before_listen(&config)
        .await
        .context("startup hook failed before listening")?;

    let listener =
        TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    config.server.host, config.server.port
                )
            })?;

    serve_on(listener, config, hooks).await
}

/// Serve on an already bound listener. The configured port is replaced by
/// the one actually bound, so port 0 works.
pub async fn serve_on(
    listener: TcpListener,
    mut config: Config,
    hooks: Arc<dyn StartupHooks>,
) -> anyhow::Result<()> {
    config.server.port = listener.local_addr()?.port();

    let config = Arc::new(config);
    let state = AppState::from_config(Arc::clone(&config))?;
    let app = routes::create_app(state);

    info!(
        version = CURRENT_VERSION,
        "Starting Reelview on {}:{}", config.server.host, config.server.port
    );

    hooks
        .after_listen(&config, &config.local_url())
        .await
        .context("startup hook failed after listening")?;

    axum::serve(listener, app).await?;

    Ok(())
}
