//! # Reelview Server
//!
//! Local movie browser backed by TMDB.
//!
//! - Paginated popular listing and search
//! - Detail pages with a per-browser "recently viewed" cookie
//! - Embedded playback page
//! - Self-update at start-up and an optional browser launch

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod server;
pub mod views;

pub use infra::app_state::AppState;
