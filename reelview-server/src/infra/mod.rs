pub mod app_state;
pub mod browser;
pub mod config;
pub mod errors;
pub mod startup;
