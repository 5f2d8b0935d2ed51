//! Movie data as handed out by TMDB.
//!
//! Records are passed through untouched; the accessors only read the fields
//! the views need and never fail.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of titles shown on one listing page.
pub const PAGE_SIZE: usize = 10;

/// Opaque movie object from the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord(Value);

impl MovieRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// True when the upstream returned nothing usable.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Identifier rendered as a string, whether TMDB sent a number or text.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
            .or_else(|| self.str_field("original_title"))
    }

    pub fn overview(&self) -> Option<&str> {
        self.str_field("overview")
    }

    pub fn tagline(&self) -> Option<&str> {
        self.str_field("tagline")
    }

    pub fn release_date(&self) -> Option<&str> {
        self.str_field("release_date")
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.str_field("poster_path")
    }

    pub fn vote_average(&self) -> Option<f64> {
        self.0.get("vote_average").and_then(Value::as_f64)
    }

    /// Runtime in minutes.
    pub fn runtime(&self) -> Option<u64> {
        self.0.get("runtime").and_then(Value::as_u64)
    }

    /// Budget in US dollars; left as raw JSON so formatting can fall back to
    /// the original value when it is not numeric.
    pub fn budget(&self) -> Option<&Value> {
        self.0.get("budget")
    }

    pub fn revenue(&self) -> Option<&Value> {
        self.0.get("revenue")
    }

    pub fn genres(&self) -> Vec<&str> {
        self.0
            .get("genres")
            .and_then(Value::as_array)
            .map(|genres| {
                genres
                    .iter()
                    .filter_map(|g| g.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl From<Value> for MovieRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One page of listing or search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<MovieRecord>,
    pub total_pages: u64,
}

impl MoviePage {
    /// Build a page from a raw paginated response: keep the first
    /// [`PAGE_SIZE`] results and pass `total_pages` through, defaulting to 1
    /// when absent.
    pub fn from_response(page: u32, response: &Value) -> Self {
        let results = response
            .get("results")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .take(PAGE_SIZE)
                    .cloned()
                    .map(MovieRecord::from)
                    .collect()
            })
            .unwrap_or_default();

        let total_pages = response
            .get("total_pages")
            .and_then(Value::as_u64)
            .unwrap_or(1);

        Self {
            page,
            results,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_keeps_ten_results_and_total_pages() {
        let items: Vec<Value> = (1..=20).map(|id| json!({ "id": id })).collect();
        let response = json!({ "results": items, "total_pages": 512 });

        let page = MoviePage::from_response(3, &response);

        assert_eq!(page.results.len(), PAGE_SIZE);
        assert_eq!(page.results[0].id().as_deref(), Some("1"));
        assert_eq!(page.total_pages, 512);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn empty_response_is_a_single_empty_page() {
        let page = MoviePage::from_response(1, &json!({}));
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn record_emptiness() {
        assert!(MovieRecord::empty().is_empty());
        assert!(MovieRecord::new(Value::Null).is_empty());
        assert!(!MovieRecord::new(json!({ "id": 1 })).is_empty());
    }

    #[test]
    fn accessors_read_tmdb_fields() {
        let record = MovieRecord::new(json!({
            "id": 550,
            "title": "Fight Club",
            "overview": "",
            "vote_average": 8.4,
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }]
        }));

        assert_eq!(record.id().as_deref(), Some("550"));
        assert_eq!(record.title(), Some("Fight Club"));
        assert_eq!(record.overview(), None);
        assert_eq!(record.vote_average(), Some(8.4));
        assert_eq!(record.runtime(), Some(139));
        assert_eq!(record.genres(), vec!["Drama"]);
    }
}
