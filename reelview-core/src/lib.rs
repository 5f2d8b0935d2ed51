//! # Reelview Core
//!
//! Building blocks for the Reelview movie browser, kept free of any HTTP
//! server concerns so they can be exercised on their own.
//!
//! - [`tmdb`]: thin fetcher for the TMDB REST API that degrades to empty
//!   results instead of surfacing upstream failures
//! - [`movie`]: pass-through movie records and paginated result pages
//! - [`history`]: bounded, de-duplicated list of recently viewed titles
//!   with a transport-independent string encoding
//! - [`currency`]: locale-aware money formatting driven by an explicit
//!   [`currency::CurrencyFormat`]
//! - [`update`]: start-up self-update sequence (check, download, swap,
//!   relaunch)

pub mod currency;
pub mod error;
pub mod history;
pub mod movie;
pub mod tmdb;
pub mod update;

pub use currency::CurrencyFormat;
pub use error::{TmdbError, UpdateError};
pub use history::RecentHistory;
pub use movie::{MoviePage, MovieRecord};
pub use tmdb::TmdbClient;
pub use update::{
    CURRENT_VERSION, ProcessControl, SelfUpdater, SystemProcess,
    UpdateOutcome, VersionDescriptor,
};
