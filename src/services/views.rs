// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! List filtering over the record collection.

use crate::models::{HikeRecord, HikeStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which records the list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Wish,
}

impl StatusFilter {
    pub fn matches(self, status: HikeStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => status == HikeStatus::Completed,
            StatusFilter::Wish => status == HikeStatus::Wish,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "wish" => Ok(StatusFilter::Wish),
            other => Err(format!(
                "Unknown status filter '{}': expected all, completed or wish",
                other
            )),
        }
    }
}

/// Matching records, in collection order.
pub fn filter_records(records: &[HikeRecord], filter: StatusFilter) -> Vec<&HikeRecord> {
    records.iter().filter(|r| filter.matches(r.status)).collect()
}
