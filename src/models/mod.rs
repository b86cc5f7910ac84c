// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod insight;
pub mod record;
pub mod stats;

pub use insight::{Difficulty, MountainInfo};
pub use record::{Coordinates, HikeRecord, HikeStatus, NewHike};
pub use stats::{HikeStats, MonthlyCount, StatusCounts};
