// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-demand mountain insights.

use crate::error::{AppError, Result};
use crate::models::MountainInfo;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

const MAX_NAME_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/insights/{name}", get(get_insight))
}

/// Fetch AI tips for a mountain. Failures are a 503 the client may retry.
async fn get_insight(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<MountainInfo>> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Mountain name must be 1-{} characters",
            MAX_NAME_LEN
        )));
    }

    state
        .insight_service
        .fetch(name)
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::InsightUnavailable(format!("No insight available for {}; try again", name))
        })
}
