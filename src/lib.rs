//! Place Explorer Server
//!
//! A catalogue of visitable places and their reviews, served over a REST
//! API, with a websocket that streams live server status.
//!
//! # Features
//!
//! - **Catalog**: create, read, update and delete places; add reviews
//! - **Validation**: every invalid field is reported in one 422 response
//! - **Live status**: `/status` pushes `{status, timestamp, connected_clients}`
//!   once per interval to every connected client
//! - **Single broadcaster**: one background task runs while at least one
//!   client is connected, and none otherwise
//!
//! # Modules
//!
//! - `types`: Core data structures (Place, Review and their inputs)
//! - `catalog`: Thread-safe in-memory store with CRUD operations
//! - `validation`: Field-level request validation
//! - `status`: Connection registry and status broadcast task
//! - `api`: Axum router, REST handlers and the status WebSocket
//! - `config`: Environment-driven server configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use place_explorer::api::{http::create_router, websocket::AppState};
//! use place_explorer::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let app = create_router(Arc::new(AppState::new(config)));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod status;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use catalog::Catalog;
pub use config::{ConfigError, LogFormat, ServerConfig};
pub use status::{ConnectionRegistry, StatusSnapshot};
pub use types::{AppResult, Place, PlaceInput, Review, ReviewInput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
