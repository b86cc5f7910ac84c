//! Hike statistics derived from the record collection.
//!
//! Everything here is recomputed from scratch on each request; the
//! collection is small enough that no aggregate is stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{HikeRecord, HikeStatus};

/// Number of completed vs wished-for records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusCounts {
    pub completed: u32,
    pub wish: u32,
}

impl StatusCounts {
    pub fn from_records(records: &[HikeRecord]) -> Self {
        let completed = records
            .iter()
            .filter(|r| r.status == HikeStatus::Completed)
            .count() as u32;
        Self {
            completed,
            wish: records.len() as u32 - completed,
        }
    }
}

/// Completed hikes in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyCount {
    /// "YYYY-MM"
    pub month: String,
    pub count: u32,
}

/// Aggregate statistics over COMPLETED records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HikeStats {
    // ─── Elevation ───────────────────────────────────────────────
    /// Sum of completed elevations (meters)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_elevation: u64,
    /// Rounded mean elevation, 0 when nothing is completed
    pub average_elevation: u32,
    /// Highest completed peak, 0 when nothing is completed
    pub max_elevation: u32,

    // ─── Counts ──────────────────────────────────────────────────
    pub completed_count: u32,
    /// Completed vs remaining wishlist, for the pie chart
    pub completion: StatusCounts,

    // ─── Time Series ─────────────────────────────────────────────
    /// Completed hikes per month, ascending by month
    pub monthly: Vec<MonthlyCount>,
}

impl HikeStats {
    pub fn from_records(records: &[HikeRecord]) -> Self {
        let completed: Vec<&HikeRecord> = records
            .iter()
            .filter(|r| r.status == HikeStatus::Completed)
            .collect();
        let completed_count = completed.len() as u32;

        let total_elevation: u64 = completed.iter().map(|r| u64::from(r.elevation)).sum();
        let average_elevation = if completed_count > 0 {
            (total_elevation as f64 / f64::from(completed_count)).round() as u32
        } else {
            0
        };
        let max_elevation = completed.iter().map(|r| r.elevation).max().unwrap_or(0);

        // BTreeMap keeps "YYYY-MM" keys in lexicographic (= chronological) order
        let mut by_month: BTreeMap<String, u32> = BTreeMap::new();
        for record in &completed {
            *by_month.entry(extract_month_key(&record.date)).or_insert(0) += 1;
        }
        let monthly = by_month
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect();

        Self {
            total_elevation,
            average_elevation,
            max_elevation,
            completed_count,
            completion: StatusCounts {
                completed: completed_count,
                wish: records.len() as u32 - completed_count,
            },
            monthly,
        }
    }
}

/// Extract "YYYY-MM" from an ISO 8601 date string.
///
/// Keeps at most the first two `-`-separated fields, so a truncated date
/// like "2024" is grouped under its own key.
fn extract_month_key(date: &str) -> String {
    // "2024-03-15" -> "2024-03"
    date.splitn(3, '-').take(2).collect::<Vec<_>>().join("-")
}
