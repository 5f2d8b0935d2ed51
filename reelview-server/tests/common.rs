#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::http::{HeaderValue, header};
use axum_test::{TestResponse, TestServer};
use reelview_server::{
    AppState,
    infra::config::Config,
    routes::create_app,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const API_KEY: &str = "test-key";

/// Configuration that points TMDB at `tmdb_uri` and never touches the
/// update endpoint or a browser.
pub fn test_config(tmdb_uri: &str) -> Config {
    let mut config = Config::default();
    config.tmdb.api_key = API_KEY.to_string();
    config.tmdb.base_url = tmdb_uri.to_string();
    config.update.enabled = false;
    config.browser.open_on_start = false;
    config
}

pub fn build_test_server(tmdb: &MockServer) -> Result<TestServer> {
    let state = AppState::from_config(Arc::new(test_config(&tmdb.uri())))?;
    TestServer::new(create_app(state)).map_err(|e| anyhow!(e.to_string()))
}

pub fn movie_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": format!("About {title}"),
        "release_date": "1999-10-15",
        "poster_path": format!("/{id}.jpg"),
        "vote_average": 8.4,
        "budget": 63000000,
        "revenue": 100853753
    })
}

pub fn results_page(count: u64, total_pages: u64) -> Value {
    let results: Vec<Value> = (1..=count)
        .map(|id| movie_json(id, &format!("Movie {id}")))
        .collect();
    json!({ "page": 1, "results": results, "total_pages": total_pages })
}

pub async fn mount_movie(tmdb: &MockServer, id: u64, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/movie/{id}")))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_json(id, title)))
        .mount(tmdb)
        .await;
}

pub fn cookie_header(value: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("search_history={value}"))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Decoded value of the `search_history` cookie set by `response`, if any.
/// The jar percent-encodes the delimiter on the wire.
pub fn history_cookie_value(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| {
            let first = raw.split(';').next()?;
            url::form_urlencoded::parse(first.as_bytes())
                .find(|(name, _)| name == "search_history")
                .map(|(_, value)| value.into_owned())
        })
}

pub fn count_cards(body: &str) -> usize {
    body.matches("class=\"movie-card\"").count()
}
