// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walking record builder.
//!
//! Turns the final tracker state into an immutable [`WalkingRecord`]:
//! 1. Derive the local calendar date from the start instant
//! 2. Compute distance over the best available path
//! 3. Evaluate the duration goal
//!
//! Pure computation, no I/O.

use chrono::{Local, TimeZone};

use crate::models::{PathPoint, StampDelta, WalkingRecord, GOAL_SECONDS};
use crate::time_utils::{local_date_of, utc_from_ms};
use crate::tracking::cumulative_distance;

/// Record builder errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Walk ends before it starts")]
    EndsBeforeStart,
}

/// Everything known about a finished walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkInput {
    pub pet_id: String,
    pub elapsed_seconds: u64,
    /// `[longitude, latitude]` pairs in path order
    pub path: Vec<[f64; 2]>,
    pub started_at_ms: i64,
    pub ended_at_ms: i64,
    pub path_points: Option<Vec<PathPoint>>,
    pub steps: Option<u32>,
    pub avg_speed_kmh: Option<f64>,
    pub max_speed_kmh: Option<f64>,
}

/// Build a record dated in the system's local time zone.
pub fn build(input: WalkInput) -> Result<WalkingRecord, RecordError> {
    build_in(input, &Local)
}

/// Build a record dated in `tz`.
///
/// A walk that crosses midnight belongs to the day it started.
pub fn build_in<Tz: TimeZone>(input: WalkInput, tz: &Tz) -> Result<WalkingRecord, RecordError> {
    if input.ended_at_ms < input.started_at_ms {
        return Err(RecordError::EndsBeforeStart);
    }
    let start_time =
        utc_from_ms(input.started_at_ms).ok_or(RecordError::InvalidTimestamp(input.started_at_ms))?;
    let end_time =
        utc_from_ms(input.ended_at_ms).ok_or(RecordError::InvalidTimestamp(input.ended_at_ms))?;
    let date = local_date_of(input.started_at_ms, tz)
        .ok_or(RecordError::InvalidTimestamp(input.started_at_ms))?;

    let distance_meters = match &input.path_points {
        Some(points) => cumulative_distance(points),
        None => cumulative_distance(&input.path),
    };

    Ok(WalkingRecord {
        id: uuid::Uuid::new_v4().to_string(),
        pet_id: input.pet_id,
        date,
        start_time,
        end_time,
        elapsed_seconds: input.elapsed_seconds,
        distance_meters,
        path: input.path,
        path_points: input.path_points,
        step_count: input.steps,
        avg_speed_kmh: input.avg_speed_kmh,
        max_speed_kmh: input.max_speed_kmh,
        goal_achieved: input.elapsed_seconds >= GOAL_SECONDS,
    })
}

/// Stamp change contributed by one saved walk.
pub fn stamp_delta(record: &WalkingRecord) -> StampDelta {
    StampDelta::single(record.goal_achieved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoSample;
    use chrono::{FixedOffset, NaiveDate, Utc};

    // 2024-05-03T14:50:00Z
    const START_MS: i64 = 1_714_747_800_000;

    fn input(elapsed_seconds: u64) -> WalkInput {
        WalkInput {
            pet_id: "kong".to_string(),
            elapsed_seconds,
            path: vec![[127.0, 37.5], [127.0, 37.501]],
            started_at_ms: START_MS,
            ended_at_ms: START_MS + elapsed_seconds as i64 * 1000,
            path_points: None,
            steps: None,
            avg_speed_kmh: None,
            max_speed_kmh: None,
        }
    }

    #[test]
    fn test_goal_boundary() {
        assert!(!build_in(input(1199), &Utc).unwrap().goal_achieved);
        assert!(build_in(input(1200), &Utc).unwrap().goal_achieved);
    }

    #[test]
    fn test_single_point_has_zero_distance() {
        let mut walk = input(60);
        walk.path = vec![[127.0, 37.5]];

        let record = build_in(walk, &Utc).unwrap();

        assert_eq!(record.distance_meters, 0.0);
        assert_eq!(record.coordinate_count(), 1);
    }

    #[test]
    fn test_walk_past_midnight_keeps_start_date() {
        // 23:50 in UTC+9, ending after midnight
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let record = build_in(input(1800), &seoul).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!(
            record.end_time.with_timezone(&seoul).date_naive(),
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
        );
    }

    #[test]
    fn test_path_points_preferred_for_distance() {
        let mut walk = input(60);
        walk.path = vec![[127.0, 37.5]];
        walk.path_points = Some(vec![
            PathPoint::from(GeoSample::new(37.5, 127.0, 5.0, START_MS)),
            PathPoint::from(GeoSample::new(37.501, 127.0, 5.0, START_MS + 60_000)),
        ]);

        let record = build_in(walk, &Utc).unwrap();

        assert!((record.distance_meters - 111.19).abs() < 0.1);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut walk = input(60);
        walk.ended_at_ms = START_MS - 1;
        assert_eq!(build_in(walk, &Utc), Err(RecordError::EndsBeforeStart));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = build_in(input(60), &Utc).unwrap();
        let b = build_in(input(60), &Utc).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_stamp_delta_follows_goal() {
        let record = build_in(input(1500), &Utc).unwrap();
        assert_eq!(stamp_delta(&record), StampDelta::single(true));
    }
}
