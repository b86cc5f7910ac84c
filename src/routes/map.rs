// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map routes: current markers and marker clicks.

use crate::error::{AppError, Result};
use crate::models::StatusCounts;
use crate::routes::api::RecordView;
use crate::services::map::{MapView, MarkerId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use geojson::FeatureCollection;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/map/markers/{marker_id}/click", post(click_marker))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    pub view: MapView,
    /// Legend counts
    pub counts: StatusCounts,
    pub markers: FeatureCollection,
}

/// Map viewport plus one marker per record.
async fn get_map(State(state): State<Arc<AppState>>) -> Result<Json<MapResponse>> {
    let counts = StatusCounts::from_records(state.store()?.records());

    let map = state.map()?;
    let layer = map
        .widget()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("map widget has been disposed")))?;
    let view = layer
        .view()
        .cloned()
        .unwrap_or_else(MapView::default_view);

    Ok(Json(MapResponse {
        view,
        counts,
        markers: layer.feature_collection(),
    }))
}

/// Resolve a marker click to the record it stands for.
///
/// Marker ids change on every sync, so a stale id is a 404.
async fn click_marker(
    State(state): State<Arc<AppState>>,
    Path(marker_id): Path<MarkerId>,
) -> Result<Json<RecordView>> {
    let record = state
        .map()?
        .click(marker_id)
        .ok_or_else(|| AppError::NotFound(format!("Marker {} not found", marker_id)))?;
    Ok(Json(record.into()))
}
