use std::path::PathBuf;

use thiserror::Error;

/// Failures inside the TMDB fetcher. These never leave
/// [`crate::tmdb::TmdbClient`]'s public methods; they are logged and turned
/// into empty results.
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failures of the self-update sequence.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid version descriptor: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Executable path {0} has no file name")]
    MissingExecutable(PathBuf),
}

pub type UpdateResult<T> = std::result::Result<T, UpdateError>;
