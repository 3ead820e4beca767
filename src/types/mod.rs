//! Data types for the Place Explorer server
//!
//! Places own their reviews; both are plain serde values shared by the
//! catalog and the REST layer.

mod place;
mod review;

pub use place::{Place, PlaceInput};
pub use review::{Review, ReviewInput, MAX_RATING, MIN_RATING};

/// Result type for top-level operations
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
