//! GeoJSON Routes
//!
//! - GET /api/v1/geojson - Department boundaries used by the choropleth

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::state::AppState;

/// GET /api/v1/geojson
pub async fn boundaries(State(state): State<Arc<AppState>>) -> Response {
    let document: &Value = state.dataset.boundaries().document();
    Json(document).into_response()
}
