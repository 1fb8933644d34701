// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod sample;
pub mod stamp;
pub mod stats;
pub mod walk;

pub use sample::{GeoSample, HasCoordinates, PathPoint};
pub use stamp::{CalendarStamp, StampDelta, StampUpsert};
pub use stats::{DaySummary, GoalProgress, WalkingStats};
pub use walk::{SavedWalk, WalkingRecord, GOAL_SECONDS};
