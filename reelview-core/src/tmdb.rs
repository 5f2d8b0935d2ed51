use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::error::TmdbError;
use crate::movie::{MoviePage, MovieRecord};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Read-only TMDB fetcher.
///
/// Every request carries the API key as the `api_key` query parameter. Any
/// failure (transport, non-2xx status, undecodable body) is logged and
/// reported as an empty JSON object, so callers render empty content rather
/// than an error page. No retries and no caching.
#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TmdbError> {
        let http = Client::builder()
            .user_agent(concat!("reelview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// GET `{base_url}/{endpoint}` with `params` plus the API key.
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Value {
        match self.try_fetch(endpoint, params).await {
            Ok(body) => body,
            Err(err) => {
                warn!(endpoint, error = %err, "TMDB request failed; using empty result");
                Value::Object(Map::new())
            }
        }
    }

    async fn try_fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, TmdbError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(endpoint, "fetching from TMDB");

        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TmdbError> {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    /// One page of `movie/popular`.
    pub async fn popular_movies(&self, page: u32) -> MoviePage {
        let response = self
            .fetch("movie/popular", &[("page", page.to_string())])
            .await;
        MoviePage::from_response(page, &response)
    }

    /// Full record from `movie/{id}`; empty when unknown.
    pub async fn movie_details(&self, movie_id: &str) -> MovieRecord {
        MovieRecord::new(self.fetch(&format!("movie/{movie_id}"), &[]).await)
    }

    /// One page of `search/movie` for `query`.
    pub async fn search_movies(&self, query: &str, page: u32) -> MoviePage {
        let response = self
            .fetch(
                "search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await;
        MoviePage::from_response(page, &response)
    }

    /// Poster URL for a `poster_path` such as `/abc.jpg`.
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        let path = poster_path?.trim();
        if path.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_without_double_slashes() {
        let client = TmdbClient::new("k")
            .unwrap()
            .with_base_url("http://localhost:9999/3/");
        let url = client.endpoint_url("/movie/popular").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/3/movie/popular");
    }

    #[test]
    fn poster_url_uses_image_base() {
        let client = TmdbClient::new("k").unwrap();
        assert_eq!(
            client.poster_url(Some("/poster.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(client.poster_url(Some("")), None);
        assert_eq!(client.poster_url(None), None);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let client = TmdbClient::new("super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
