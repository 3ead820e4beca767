//! Request validation
//!
//! Raw JSON request bodies are checked field by field so that a single
//! response can list every offending field, then converted into typed
//! inputs for the catalog.

mod errors;
mod input;

pub use errors::{FieldError, ValidationErrors};
pub use input::{parse_json_body, parse_place_id, parse_place_input, parse_review_input};
