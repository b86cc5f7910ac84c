// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod insight;
pub mod map;
pub mod record_store;
pub mod views;

pub use insight::{InsightError, InsightService};
pub use map::{GeoJsonLayer, MapAdapter, MapView, MapWidget};
pub use record_store::{RecordStore, StoreError};
pub use views::{filter_records, StatusFilter};
