//! HTTP front end for the snapshot archive.
//!
//! Every query route answers in JSON when the client sends
//! `Accept: application/json` and in plain text otherwise. Errors are always
//! JSON bodies of the form `{"error": {"code", "message", "details"}}`.

mod config;
mod content;
mod cors;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{
    Config, ConfigError, CorsConfig, LogFormat, LoggingConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use content::ContentFormat;
pub use cors::cors_layer;
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, DynStore, StateError};
