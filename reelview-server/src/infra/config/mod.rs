pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    BrowserConfig, Config, ConfigMetadata, ServerConfig, TmdbConfig, UpdateConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
