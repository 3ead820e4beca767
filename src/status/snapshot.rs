//! Status snapshot pushed to websocket clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label carried by every snapshot while the server is up
pub const STATUS_RUNNING: &str = "running";

/// Point-in-time view of server liveness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    /// RFC 3339, sub-second precision
    pub timestamp: DateTime<Utc>,
    pub connected_clients: usize,
}

impl StatusSnapshot {
    /// Snapshot taken now with the given client count
    pub fn running(connected_clients: usize) -> Self {
        Self {
            status: STATUS_RUNNING.to_string(),
            timestamp: Utc::now(),
            connected_clients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = StatusSnapshot::running(3);
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["status"], "running");
        assert_eq!(json["connected_clients"], 3);

        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
