// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completed walk record for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PathPoint;

/// Daily walking-duration goal (20 minutes).
pub const GOAL_SECONDS: u64 = 1200;

/// One completed walk. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingRecord {
    /// Record ID (UUID v4, also used as storage key)
    pub id: String,
    /// Pet this walk belongs to
    pub pet_id: String,
    /// Local calendar date the walk started on
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub distance_meters: f64,
    /// `[longitude, latitude]` pairs in path order
    pub path: Vec<[f64; 2]>,
    /// Full accepted points with accuracy, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_points: Option<Vec<PathPoint>>,
    #[serde(default)]
    pub step_count: Option<u32>,
    #[serde(default)]
    pub avg_speed_kmh: Option<f64>,
    #[serde(default)]
    pub max_speed_kmh: Option<f64>,
    /// Whether the walk alone met the daily duration goal
    pub goal_achieved: bool,
}

/// Response to storing a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWalk {
    pub id: String,
}

impl WalkingRecord {
    /// Number of recorded coordinates.
    pub fn coordinate_count(&self) -> usize {
        self.path_points
            .as_ref()
            .map_or(self.path.len(), |points| points.len())
    }

    /// Whole minutes walked.
    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_seconds / 60
    }

    /// Check that every coordinate is on the globe.
    pub fn has_valid_path(&self) -> bool {
        self.path
            .iter()
            .all(|[lon, lat]| crate::models::sample::valid_coordinates(*lat, *lon))
            && self
                .path_points
                .as_ref()
                .is_none_or(|points| points.iter().all(PathPoint::is_valid))
    }
}
