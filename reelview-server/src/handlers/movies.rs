use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use reelview_core::MovieRecord;
use tracing::{debug, info};

use super::{
    ListingQuery, history_cookie, history_from_jar, parse_movie_id, parse_page,
};
use crate::{
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
    views,
};

/// Embedded player host; the movie id is appended as the last segment.
pub const PLAYER_BASE_URL: &str = "https://moviesapi.club/movie";

pub fn player_url(movie_id: &str) -> String {
    format!("{PLAYER_BASE_URL}/{movie_id}")
}

/// Popular movies plus the recently viewed strip.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    jar: CookieJar,
) -> Html<String> {
    let page = parse_page(query.page.as_deref());
    let listing = state.tmdb.popular_movies(page).await;

    let history = history_from_jar(&jar);
    let mut recent = Vec::with_capacity(history.len());
    for id in history.iter() {
        let movie = state.tmdb.movie_details(id).await;
        if movie.is_empty() {
            debug!(movie_id = id, "skipping unknown id from history");
            continue;
        }
        recent.push(movie);
    }

    Html(views::home(&listing, &recent, &state.tmdb).into_string())
}

/// Detail view; records the id in the history cookie on success only.
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (movie_id, movie) = fetch_known_movie(&state, &raw_id).await?;

    let mut history = history_from_jar(&jar);
    if history.record(movie_id.as_str()) {
        info!(movie_id = %movie_id, "added to recently viewed");
    }
    let jar = jar.add(history_cookie(&history));

    Ok((
        jar,
        Html(
            views::movie_detail(&movie, &state.tmdb, state.currency())
                .into_string(),
        ),
    ))
}

pub async fn play(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Html<String>> {
    let (movie_id, movie) = fetch_known_movie(&state, &raw_id).await?;
    Ok(Html(
        views::player(&movie, &player_url(&movie_id)).into_string(),
    ))
}

async fn fetch_known_movie(
    state: &AppState,
    raw_id: &str,
) -> AppResult<(String, MovieRecord)> {
    let movie_id = parse_movie_id(raw_id).ok_or_else(AppError::movie_not_found)?;
    let movie = state.tmdb.movie_details(&movie_id).await;
    if movie.is_empty() {
        return Err(AppError::movie_not_found());
    }
    Ok((movie_id, movie))
}
