//! Recently viewed titles.
//!
//! [`RecentHistory`] is a small bounded ordered set: identifiers keep their
//! arrival order, are never duplicated, and the oldest entry is dropped once
//! the capacity is exceeded. Only decimal ids are accepted, whether recorded
//! or decoded. The type knows nothing about cookies; it only offers a
//! comma-delimited encoding that a transport can carry.

use std::fmt;

/// Number of identifiers kept in the history.
pub const HISTORY_CAPACITY: usize = 7;

const DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentHistory {
    ids: Vec<String>,
    capacity: usize,
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl RecentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is bumped to one so `record` always keeps the
    /// newest entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ids: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Decode a delimited history string using the default capacity.
    pub fn parse(raw: &str) -> Self {
        Self::parse_with_capacity(raw, HISTORY_CAPACITY)
    }

    /// Decode a delimited history string.
    ///
    /// Surrounding double quotes (as added by some cookie writers) and blank
    /// segments are ignored. Repeated identifiers keep their first position.
    /// An over-long input keeps its most recent `capacity` entries.
    pub fn parse_with_capacity(raw: &str, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        let trimmed = raw.trim().trim_matches('"');

        for id in trimmed.split(DELIMITER) {
            let id = id.trim();
            if !is_movie_id(id) || history.contains(id) {
                continue;
            }
            history.ids.push(id.to_string());
        }

        if history.ids.len() > history.capacity {
            let excess = history.ids.len() - history.capacity;
            history.ids.drain(..excess);
        }

        history
    }

    /// Append `id` unless it is already present, evicting the oldest entry
    /// when the capacity is exceeded. Returns whether the history changed.
    pub fn record(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if !is_movie_id(&id) || self.contains(&id) {
            return false;
        }

        self.ids.push(id);
        if self.ids.len() > self.capacity {
            self.ids.remove(0);
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn to_cookie_value(&self) -> String {
        self.ids.join(",")
    }
}

/// TMDB movie ids are plain decimal numbers.
fn is_movie_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for RecentHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cookie_value())
    }
}

impl<S: Into<String>> FromIterator<S> for RecentHistory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut history = Self::default();
        for id in iter {
            history.record(id);
        }
        history
    }
}
