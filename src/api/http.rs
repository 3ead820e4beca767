//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{places, reviews};
use super::websocket::{handler::status_ws_handler, state::AppState};

/// Create the Axum router with all endpoints
///
/// Every catalog route also answers with a trailing slash, since the
/// frontend uses both forms.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Credentials are allowed, so origins must be listed and
    // methods/headers mirrored rather than wildcarded
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.config.cors_origins.clone()))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        // WebSocket endpoint
        .route("/status", get(status_ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Places
        .route("/places", get(places::list_places).post(places::create_place))
        .route("/places/", get(places::list_places).post(places::create_place))
        .route(
            "/places/:place_id",
            get(places::get_place)
                .put(places::update_place)
                .delete(places::delete_place),
        )
        .route(
            "/places/:place_id/",
            get(places::get_place)
                .put(places::update_place)
                .delete(places::delete_place),
        )
        // Reviews
        .route("/places/:place_id/reviews", post(reviews::create_review))
        .route("/places/:place_id/reviews/", post(reviews::create_review))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    connected_clients: usize,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connected_clients: state.connected_clients(),
    })
}
