// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for hike records and statistics.

use crate::error::{AppError, Result};
use crate::models::{HikeRecord, HikeStats, NewHike, StatusCounts};
use crate::services::{filter_records, StatusFilter};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Record and stats routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/records", get(list_records).post(create_record))
        .route("/api/records/{id}", get(get_record).delete(delete_record))
        .route("/api/records/{id}/toggle", post(toggle_record))
        .route("/api/stats", get(get_stats))
}

/// A record with its image URL resolved for display.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    #[serde(flatten)]
    pub record: HikeRecord,
    pub display_image: String,
}

impl From<HikeRecord> for RecordView {
    fn from(record: HikeRecord) -> Self {
        let display_image = record.display_image();
        Self {
            record,
            display_image,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecordsQuery {
    /// all | completed | wish
    status: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordsResponse {
    pub records: Vec<RecordView>,
    /// Counts over the whole collection, regardless of filter
    pub counts: StatusCounts,
}

/// List records, newest first, optionally filtered by status.
async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>> {
    let filter = match params.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>().map_err(AppError::BadRequest)?,
        None => StatusFilter::All,
    };

    let store = state.store()?;
    let records = filter_records(store.records(), filter)
        .into_iter()
        .cloned()
        .map(RecordView::from)
        .collect();

    Ok(Json(RecordsResponse {
        records,
        counts: StatusCounts::from_records(store.records()),
    }))
}

/// Create a record from the hike form.
async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(hike): Json<NewHike>,
) -> Result<(StatusCode, Json<RecordView>)> {
    let hike = hike.normalized();
    hike.validate()?;

    let record = state.mutate(|store| store.create(hike, chrono::Utc::now()))?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecordView>> {
    let record = state
        .store()?
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;
    Ok(Json(record.into()))
}

/// Delete a record. Deleting an unknown id is a no-op.
async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let removed = state.mutate(|store| store.remove(&id))?;
    if !removed {
        tracing::debug!(id = %id, "Delete requested for unknown record");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a record between COMPLETED and WISH.
async fn toggle_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecordView>> {
    let record = state
        .mutate(|store| {
            Ok(match store.toggle_status(&id)? {
                Some(_) => store.get(&id).cloned(),
                None => None,
            })
        })?
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;
    Ok(Json(record.into()))
}

// ─── Stats ───────────────────────────────────────────────────

/// Aggregate statistics over completed hikes.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<HikeStats>> {
    let store = state.store()?;
    Ok(Json(HikeStats::from_records(store.records())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::record_store::seed_records;

    #[test]
    fn test_record_view_flattens_record() {
        let record = seed_records().remove(1);
        let json = serde_json::to_value(RecordView::from(record)).unwrap();

        assert_eq!(json["id"], "2");
        assert_eq!(json["mountainName"], "설악산 (Seoraksan)");
        assert!(json.get("image").is_none());
        assert!(json["displayImage"]
            .as_str()
            .unwrap()
            .starts_with("https://picsum.photos/seed/"));
    }
}
