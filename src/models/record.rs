// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hike record model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Coordinates used when the creation form leaves them blank or unparseable.
pub const DEFAULT_FORM_COORDS: Coordinates = Coordinates {
    lat: 37.5,
    lng: 127.0,
};

/// Whether a mountain has been hiked or is on the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HikeStatus {
    Completed,
    Wish,
}

impl HikeStatus {
    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            HikeStatus::Completed => "COMPLETED",
            HikeStatus::Wish => "WISH",
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            HikeStatus::Completed => HikeStatus::Wish,
            HikeStatus::Wish => HikeStatus::Completed,
        }
    }

    /// Marker color for this status.
    pub fn marker_color(self) -> &'static str {
        match self {
            HikeStatus::Completed => "#10b981",
            HikeStatus::Wish => "#fb923c",
        }
    }
}

/// Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Map point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }
}

/// One logged or wished-for hike.
///
/// Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HikeRecord {
    /// Opaque id (millisecond timestamp at creation)
    pub id: String,
    pub mountain_name: String,
    /// Elevation in meters
    pub elevation: u32,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub status: HikeStatus,
    pub coords: Coordinates,
    /// 1-5, stored but not used by any view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl HikeRecord {
    /// Image URL to display, falling back to the name-keyed placeholder.
    pub fn display_image(&self) -> String {
        match self.image.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => placeholder_image(&self.mountain_name),
        }
    }
}

/// Deterministic placeholder image for a mountain name.
pub fn placeholder_image(mountain_name: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/600/400",
        urlencoding::encode(mountain_name)
    )
}

/// A form value that may arrive as either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// Leading-integer parse; anything unusable becomes 0.
    pub fn to_elevation(&self) -> u32 {
        let value = match self {
            FormNumber::Number(n) if n.is_finite() => n.trunc(),
            FormNumber::Number(_) => 0.0,
            FormNumber::Text(s) => leading_integer(s).unwrap_or(0) as f64,
        };
        if value <= 0.0 {
            0
        } else {
            value.min(u32::MAX as f64) as u32
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            FormNumber::Number(n) => *n,
            FormNumber::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Parse an optional sign and leading digits, ignoring any trailing text.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Hike creation form. Numeric fields are coerced leniently.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHike {
    #[validate(length(min = 1, max = 100, message = "mountainName must be 1-100 characters"))]
    pub mountain_name: String,
    #[serde(default)]
    pub elevation: Option<FormNumber>,
    /// Defaults to today when absent or not a valid date
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    pub status: Option<HikeStatus>,
    #[serde(default)]
    pub lat: Option<FormNumber>,
    #[serde(default)]
    pub lng: Option<FormNumber>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[serde(default)]
    #[validate(url)]
    pub image: Option<String>,
}

impl NewHike {
    /// Trim free-text fields so blank names fail validation.
    pub fn normalized(mut self) -> Self {
        self.mountain_name = self.mountain_name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.image = self
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Coordinates from the form, or the form defaults if either is unusable.
    pub fn coords(&self) -> Coordinates {
        let lat = self.lat.as_ref().and_then(FormNumber::to_f64);
        let lng = self.lng.as_ref().and_then(FormNumber::to_f64);
        match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coordinates { lat, lng };
                if coords.is_valid() {
                    coords
                } else {
                    DEFAULT_FORM_COORDS
                }
            }
            _ => DEFAULT_FORM_COORDS,
        }
    }

    /// Build the stored record. `today` fills a missing or malformed date.
    pub fn into_record(self, id: String, today: &str) -> HikeRecord {
        let coords = self.coords();
        let elevation = self.elevation.as_ref().map_or(0, FormNumber::to_elevation);
        let date = self
            .date
            .filter(|d| crate::time_utils::is_iso_date(d))
            .unwrap_or_else(|| today.to_string());
        let image = self
            .image
            .unwrap_or_else(|| placeholder_image(&self.mountain_name));

        HikeRecord {
            id,
            mountain_name: self.mountain_name,
            elevation,
            date,
            description: self.description,
            status: self.status.unwrap_or(HikeStatus::Completed),
            coords,
            rating: self.rating,
            image: Some(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(json: serde_json::Value) -> NewHike {
        serde_json::from_value(json).expect("form should deserialize")
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&HikeStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::from_str::<HikeStatus>("\"WISH\"").unwrap(),
            HikeStatus::Wish
        );
        assert!(serde_json::from_str::<HikeStatus>("\"wish\"").is_err());

        for status in [HikeStatus::Completed, HikeStatus::Wish] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                status.as_str()
            );
        }
    }

    #[test]
    fn test_toggled_is_involution() {
        for status in [HikeStatus::Completed, HikeStatus::Wish] {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn test_record_uses_camel_case_and_omits_missing_optionals() {
        let record = HikeRecord {
            id: "2".to_string(),
            mountain_name: "설악산 (Seoraksan)".to_string(),
            elevation: 1708,
            date: "2024-05-10".to_string(),
            description: String::new(),
            status: HikeStatus::Wish,
            coords: Coordinates {
                lat: 38.1189,
                lng: 128.4358,
            },
            rating: None,
            image: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mountainName"], "설악산 (Seoraksan)");
        assert_eq!(json["status"], "WISH");
        assert!(json.get("rating").is_none());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_placeholder_image_is_deterministic() {
        let a = placeholder_image("관악산");
        let b = placeholder_image("관악산");
        assert_eq!(a, b);
        assert!(a.starts_with("https://picsum.photos/seed/"));
        assert!(!a.contains("관악산"), "name should be URL-encoded: {}", a);
        assert_ne!(a, placeholder_image("북한산"));
    }

    #[test]
    fn test_display_image_prefers_explicit_url() {
        let mut record = form(serde_json::json!({"mountainName": "Jirisan"}))
            .into_record("1".to_string(), "2024-01-01");
        record.image = Some("https://example.com/jiri.jpg".to_string());
        assert_eq!(record.display_image(), "https://example.com/jiri.jpg");

        record.image = None;
        assert_eq!(record.display_image(), placeholder_image("Jirisan"));
    }

    #[test]
    fn test_elevation_coercion() {
        assert_eq!(FormNumber::Text("632".into()).to_elevation(), 632);
        assert_eq!(FormNumber::Text(" 632m".into()).to_elevation(), 632);
        assert_eq!(FormNumber::Text("abc".into()).to_elevation(), 0);
        assert_eq!(FormNumber::Text("".into()).to_elevation(), 0);
        assert_eq!(FormNumber::Text("-12".into()).to_elevation(), 0);
        assert_eq!(FormNumber::Number(1950.7).to_elevation(), 1950);
        assert_eq!(FormNumber::Number(-3.0).to_elevation(), 0);
    }

    #[test]
    fn test_form_defaults() {
        let record = form(serde_json::json!({"mountainName": "  한라산 "}))
            .normalized()
            .into_record("42".to_string(), "2024-06-01");

        assert_eq!(record.mountain_name, "한라산");
        assert_eq!(record.elevation, 0);
        assert_eq!(record.date, "2024-06-01");
        assert_eq!(record.status, HikeStatus::Completed);
        assert_eq!(record.coords, DEFAULT_FORM_COORDS);
        assert_eq!(record.image, Some(placeholder_image("한라산")));
    }

    #[test]
    fn test_form_coords_parse_strings_and_fall_back() {
        let ok = form(serde_json::json!({
            "mountainName": "관악산", "lat": "37.4445", "lng": 126.9636
        }));
        assert_eq!(
            ok.coords(),
            Coordinates {
                lat: 37.4445,
                lng: 126.9636
            }
        );

        let bad = form(serde_json::json!({
            "mountainName": "관악산", "lat": "north", "lng": "126.9"
        }));
        assert_eq!(bad.coords(), DEFAULT_FORM_COORDS);

        let out_of_range = form(serde_json::json!({
            "mountainName": "관악산", "lat": 137.0, "lng": 126.9
        }));
        assert_eq!(out_of_range.coords(), DEFAULT_FORM_COORDS);
    }

    #[test]
    fn test_form_validation() {
        let blank = form(serde_json::json!({"mountainName": "   "})).normalized();
        assert!(blank.validate().is_err());

        let bad_rating = form(serde_json::json!({"mountainName": "Bukhansan", "rating": 6}));
        assert!(bad_rating.validate().is_err());

        let good = form(serde_json::json!({"mountainName": "Bukhansan", "rating": 5}));
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_malformed_date_falls_back_to_today() {
        let record = form(serde_json::json!({"mountainName": "Bukhansan", "date": "yesterday"}))
            .into_record("1".to_string(), "2024-06-01");
        assert_eq!(record.date, "2024-06-01");
    }
}
