//! WebSocket module for live server status
//!
//! Provides the `/status` endpoint. Each connection is registered with the
//! shared [`ConnectionRegistry`](crate::status::ConnectionRegistry) and
//! receives a status snapshot once per broadcast interval.

pub mod handler;
pub mod state;

pub use state::AppState;
