//! Review endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use super::{ApiError, ApiResult};
use crate::api::websocket::state::AppState;
use crate::types::Review;
use crate::validation::{parse_json_body, parse_place_id, parse_review_input};

/// POST /places/:place_id/reviews - Add a review to a place
///
/// The body is validated before the place lookup, so an invalid review
/// for a missing place is reported as 422 rather than 404.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Review>> {
    let place_id = parse_place_id(&place_id)?;
    let input = parse_review_input(&parse_json_body(&body)?)?;
    place_id
        .and_then(|id| state.catalog.create_review(id, input))
        .map(Json)
        .ok_or(ApiError::PlaceNotFound)
}
