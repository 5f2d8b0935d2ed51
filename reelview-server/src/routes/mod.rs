use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, infra::app_state::AppState};

/// Create the application router with every page route.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/search", get(handlers::search))
        .route("/movie/{id}", get(handlers::movie_detail))
        .route("/movie/{id}/play", get(handlers::play))
        .route("/ping", get(handlers::ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
