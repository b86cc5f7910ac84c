// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map marker synchronization.
//!
//! [`MapAdapter`] owns a [`MapWidget`] for its whole lifetime: it initializes
//! the widget at the default view on mount, replaces every marker whenever
//! the record collection changes, and disposes the widget when dropped.
//! [`GeoJsonLayer`] is the widget the HTTP API serves to the frontend.

use crate::models::{Coordinates, HikeRecord, HikeStatus};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle to one placed marker.
pub type MarkerId = u64;

/// Invoked when a marker is clicked; yields the record the marker stands for.
pub type MarkerCallback = Box<dyn Fn() -> HikeRecord + Send + Sync>;

/// Receives every marker click forwarded by the adapter.
pub type ClickListener = Arc<dyn Fn(&HikeRecord) + Send + Sync>;

/// Tile endpoint for the base layer.
pub const TILE_URL: &str =
    "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap © CARTO";

/// Initial viewport of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl MapView {
    /// Roughly the center of South Korea.
    pub fn default_view() -> Self {
        Self {
            center: Coordinates {
                lat: 36.5,
                lng: 127.8,
            },
            zoom: 7,
            tile_url: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// What a marker looks like, and which record it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub record_id: String,
    pub status: HikeStatus,
    pub mountain_name: String,
}

impl MarkerStyle {
    pub fn for_record(record: &HikeRecord) -> Self {
        Self {
            color: record.status.marker_color(),
            record_id: record.id.clone(),
            status: record.status,
            mountain_name: record.mountain_name.clone(),
        }
    }
}

/// A map widget with imperative marker placement.
pub trait MapWidget: Send {
    /// Create the underlying map at `view`.
    fn init(&mut self, view: &MapView);

    fn place_marker(
        &mut self,
        position: Coordinates,
        style: MarkerStyle,
        on_click: MarkerCallback,
    ) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    /// Deliver a click to `marker`, running its callback.
    fn click(&self, marker: MarkerId) -> Option<HikeRecord>;

    /// Release the underlying map.
    fn dispose(&mut self);
}

/// Keeps a widget's markers consistent with the record collection.
pub struct MapAdapter<W: MapWidget> {
    widget: Option<W>,
    markers: Vec<MarkerId>,
    listener: Option<ClickListener>,
}

impl<W: MapWidget> MapAdapter<W> {
    /// Initialize `widget` at the default view and take ownership of it.
    pub fn mount(mut widget: W, listener: Option<ClickListener>) -> Self {
        widget.init(&MapView::default_view());
        Self {
            widget: Some(widget),
            markers: Vec::new(),
            listener,
        }
    }

    /// Replace every marker with one per record. Returns the marker count.
    ///
    /// A disposed adapter ignores the call.
    pub fn sync(&mut self, records: &[HikeRecord]) -> usize {
        let Some(widget) = self.widget.as_mut() else {
            return 0;
        };

        for marker in self.markers.drain(..) {
            widget.remove_marker(marker);
        }

        for record in records {
            let style = MarkerStyle::for_record(record);
            let clicked = record.clone();
            let marker =
                widget.place_marker(record.coords, style, Box::new(move || clicked.clone()));
            self.markers.push(marker);
        }

        tracing::debug!(markers = self.markers.len(), "Synchronized map markers");
        self.markers.len()
    }

    /// Forward a click on `marker` upward. `None` for unknown or stale markers.
    pub fn click(&self, marker: MarkerId) -> Option<HikeRecord> {
        let record = self.widget.as_ref()?.click(marker)?;
        tracing::debug!(marker, id = %record.id, "Marker clicked");
        if let Some(listener) = &self.listener {
            listener(&record);
        }
        Some(record)
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.widget.is_none()
    }

    /// Release the widget. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            self.markers.clear();
            widget.dispose();
            tracing::debug!("Map widget disposed");
        }
    }
}

impl<W: MapWidget> Drop for MapAdapter<W> {
    fn drop(&mut self) {
        self.dispose();
    }
}

struct PlacedMarker {
    point: geo::Point<f64>,
    style: MarkerStyle,
    on_click: MarkerCallback,
}

/// Marker layer rendered as a GeoJSON `FeatureCollection` of points.
#[derive(Default)]
pub struct GeoJsonLayer {
    view: Option<MapView>,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_id: MarkerId,
}

impl GeoJsonLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view, or `None` before `init` / after `dispose`.
    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers as GeoJSON points, in placement order.
    pub fn feature_collection(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|(id, marker)| {
                let mut properties = JsonObject::new();
                properties.insert("marker_id".to_string(), (*id).into());
                properties.insert(
                    "record_id".to_string(),
                    marker.style.record_id.clone().into(),
                );
                properties.insert("color".to_string(), marker.style.color.into());
                properties.insert("status".to_string(), marker.style.status.as_str().into());
                properties.insert(
                    "mountain_name".to_string(),
                    marker.style.mountain_name.clone().into(),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::from(&marker.point))),
                    id: Some(Id::Number((*id).into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl MapWidget for GeoJsonLayer {
    fn init(&mut self, view: &MapView) {
        self.view = Some(view.clone());
    }

    fn place_marker(
        &mut self,
        position: Coordinates,
        style: MarkerStyle,
        on_click: MarkerCallback,
    ) -> MarkerId {
        self.next_id += 1;
        let id = self.next_id;
        self.markers.insert(
            id,
            PlacedMarker {
                point: position.to_point(),
                style,
                on_click,
            },
        );
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn click(&self, marker: MarkerId) -> Option<HikeRecord> {
        self.markers.get(&marker).map(|m| (m.on_click)())
    }

    fn dispose(&mut self) {
        self.markers.clear();
        self.view = None;
    }
}
