//! HTTP boundary of the pizzaria back-office.
//!
//! Handlers parse request bodies themselves so every malformed request gets
//! the same `{error, kind, details}` body as any other failure. Operations
//! talk to a blocking store and run on the blocking thread pool.

pub mod api;
pub mod config;
mod error;
pub mod state;
pub mod telemetry;

pub use api::router;
pub use config::Config;
pub use error::ServerError;
pub use state::AppState;
