//! Live server status over websocket
//!
//! The [`ConnectionRegistry`] tracks connected status clients and owns a
//! single background broadcast task. The task starts when the first client
//! connects, pushes a [`StatusSnapshot`] to everyone once per interval, and
//! stops when the last client leaves.

mod broadcaster;
mod registry;
mod snapshot;

pub use broadcaster::{Delivery, TickError};
pub use registry::{ConnectionId, ConnectionRegistry, StatusSender};
pub use snapshot::{StatusSnapshot, STATUS_RUNNING};
