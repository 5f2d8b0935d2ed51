use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::{SearchQuery, parse_page};
use crate::{infra::app_state::AppState, views};

/// A blank query sends the browser back to the listing, whatever page was
/// asked for. Anything else is forwarded upstream exactly as typed.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.query.as_deref().unwrap_or_default();
    if query.trim().is_empty() {
        return Redirect::to("/").into_response();
    }

    let page = parse_page(params.page.as_deref());
    debug!(query, page, "searching TMDB");
    let results = state.tmdb.search_movies(query, page).await;

    Html(views::search_results(query, &results, &state.tmdb).into_string())
        .into_response()
}
