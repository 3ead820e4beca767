//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the REST catalog API and the live status WebSocket.

pub mod http;
pub mod rest;
pub mod websocket;
