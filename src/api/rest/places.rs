//! Place endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{ApiError, ApiResult};
use crate::api::websocket::state::AppState;
use crate::types::Place;
use crate::validation::{parse_json_body, parse_place_id, parse_place_input};

/// POST /places - Create a new place
pub async fn create_place(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Place>> {
    let input = parse_place_input(&parse_json_body(&body)?)?;
    Ok(Json(state.catalog.create_place(input)))
}

/// GET /places - List all places
pub async fn list_places(State(state): State<Arc<AppState>>) -> Json<Vec<Place>> {
    Json(state.catalog.list_places())
}

/// GET /places/:place_id - Get a single place with its reviews
pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<Place>> {
    let place_id = parse_place_id(&place_id)?;
    place_id
        .and_then(|id| state.catalog.get_place(id))
        .map(Json)
        .ok_or(ApiError::PlaceNotFound)
}

/// PUT /places/:place_id - Replace the fields of an existing place
pub async fn update_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Place>> {
    let place_id = parse_place_id(&place_id)?;
    let input = parse_place_input(&parse_json_body(&body)?)?;
    place_id
        .and_then(|id| state.catalog.update_place(id, input))
        .map(Json)
        .ok_or(ApiError::PlaceNotFound)
}

/// DELETE /places/:place_id - Delete a place and all of its reviews
pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<StatusCode> {
    let place_id = parse_place_id(&place_id)?;
    if place_id.is_some_and(|id| state.catalog.delete_place(id)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::PlaceNotFound)
    }
}
