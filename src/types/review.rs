//! Review types for the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// A user review attached to exactly one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub title: String,
    pub content: String,
    /// Always within `MIN_RATING..=MAX_RATING`
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub place_id: u64,
}

/// Client-supplied fields of a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub title: String,
    pub content: String,
    pub rating: u8,
}

impl ReviewInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>, rating: u8) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            rating,
        }
    }
}
