//! Place types for the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Review;

/// A catalogued place that can be visited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Free-form estimate, e.g. "1-2 hours"
    pub visit_duration: Option<String>,
    pub is_free: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reviews in creation order
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Place {
    /// Build a new place from validated input
    pub fn from_input(id: u64, input: PlaceInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            street_address: input.street_address,
            city: input.city,
            country: input.country,
            visit_duration: input.visit_duration,
            is_free: input.is_free,
            created_at: now,
            updated_at: now,
            reviews: Vec::new(),
        }
    }

    /// Replace every input-controlled field, keeping identity, reviews and `created_at`
    pub fn apply(&mut self, input: PlaceInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.street_address = input.street_address;
        self.city = input.city;
        self.country = input.country;
        self.visit_duration = input.visit_duration;
        self.is_free = input.is_free;
        self.updated_at = now;
    }
}

/// Client-supplied fields of a place, used for both create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub visit_duration: Option<String>,
    #[serde(default)]
    pub is_free: Option<bool>,
}

impl PlaceInput {
    /// Input with only the required fields set
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}
