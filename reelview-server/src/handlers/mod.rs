//! HTTP request handlers organized by functionality

pub mod health;
pub mod movies;
pub mod search;

pub use health::ping;
pub use movies::{home, movie_detail, play};
pub use search::search;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use reelview_core::RecentHistory;
use serde::Deserialize;
use time::Duration;

/// Cookie that carries the recently viewed movie ids.
pub const HISTORY_COOKIE: &str = "search_history";

/// Seven days.
pub const HISTORY_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

/// 1-based page number; anything missing, unparsable or zero means 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Path ids are numeric. The canonical decimal form is returned so that
/// `/movie/0550` and `/movie/550` land on the same history entry.
pub fn parse_movie_id(raw: &str) -> Option<String> {
    raw.trim().parse::<u64>().ok().map(|id| id.to_string())
}

pub fn history_from_jar(jar: &CookieJar) -> RecentHistory {
    jar.get(HISTORY_COOKIE)
        .map(|cookie| RecentHistory::parse(cookie.value()))
        .unwrap_or_default()
}

pub fn history_cookie(history: &RecentHistory) -> Cookie<'static> {
    Cookie::build((HISTORY_COOKIE, history.to_cookie_value()))
        .path("/")
        .max_age(Duration::seconds(HISTORY_MAX_AGE_SECS))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }

    #[test]
    fn movie_ids_are_numeric_and_canonical() {
        assert_eq!(parse_movie_id("550").as_deref(), Some("550"));
        assert_eq!(parse_movie_id("0550").as_deref(), Some("550"));
        assert_eq!(parse_movie_id("fight-club"), None);
        assert_eq!(parse_movie_id(""), None);
    }

    #[test]
    fn cookie_has_path_and_max_age() {
        let history = RecentHistory::parse("1,2,3");
        let cookie = history_cookie(&history);
        assert_eq!(cookie.name(), HISTORY_COOKIE);
        assert_eq!(cookie.value(), "1,2,3");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age().map(|age| age.whole_seconds()),
            Some(604_800)
        );
    }

    #[test]
    fn missing_cookie_is_empty_history() {
        let jar = CookieJar::new();
        assert!(history_from_jar(&jar).is_empty());
    }
}
