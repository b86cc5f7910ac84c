// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hiking Log: a personal log of mountains climbed and wished for
//!
//! This crate provides the backend API that stores hike records, derives
//! statistics and map markers from them, and fetches AI mountain insights.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::LocalStorage;
use error::AppError;
use services::map::ClickListener;
use services::{GeoJsonLayer, InsightService, MapAdapter, RecordStore, StoreError};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state.
///
/// Locks are always taken store first, then map, and never held across an
/// `.await`.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<RecordStore>,
    pub map: Mutex<MapAdapter<GeoJsonLayer>>,
    pub insight_service: InsightService,
}

impl AppState {
    /// Load the record store from `storage` and mount the marker layer on it.
    pub fn new(config: Config, storage: LocalStorage) -> Self {
        let store = RecordStore::load(storage);

        let listener: ClickListener = Arc::new(|record: &models::HikeRecord| {
            tracing::info!(id = %record.id, mountain = %record.mountain_name, "Record selected from map");
        });
        let mut map = MapAdapter::mount(GeoJsonLayer::new(), Some(listener));
        map.sync(store.records());

        let insight_service = InsightService::new(&config);
        if !insight_service.is_enabled() {
            tracing::warn!("GEMINI_API_KEY not set, mountain insights disabled");
        }

        Self {
            config,
            store: Mutex::new(store),
            map: Mutex::new(map),
            insight_service,
        }
    }

    pub fn store(&self) -> Result<MutexGuard<'_, RecordStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("record store lock poisoned")))
    }

    pub fn map(&self) -> Result<MutexGuard<'_, MapAdapter<GeoJsonLayer>>, AppError> {
        self.map
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("map lock poisoned")))
    }

    /// Apply a store mutation, then re-sync the map from the new snapshot.
    pub fn mutate<R>(
        &self,
        f: impl FnOnce(&mut RecordStore) -> Result<R, StoreError>,
    ) -> Result<R, AppError> {
        let mut store = self.store()?;
        let result = f(&mut *store)?;
        self.map()?.sync(store.records());
        Ok(result)
    }
}
