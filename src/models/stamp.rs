// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar stamps: one per pet and day with at least one walk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar marker aggregating the walks of one pet on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarStamp {
    pub pet_id: String,
    pub date: NaiveDate,
    /// Walks recorded on this date (always >= 1)
    pub stamp_count: u32,
    /// Sticky: once a walk met the goal on this date it stays true
    pub goal_achieved: bool,
}

/// Change applied to a stamp when a walk is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampDelta {
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub goal_achieved: bool,
}

fn default_count() -> u32 {
    1
}

impl StampDelta {
    /// Delta for a single walk.
    pub fn single(goal_achieved: bool) -> Self {
        Self {
            count: 1,
            goal_achieved,
        }
    }
}

/// Wire body of a stamp upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampUpsert {
    pub pet_id: String,
    pub date: NaiveDate,
    pub delta: StampDelta,
}

impl CalendarStamp {
    /// Apply an upsert: insert with the delta's count, or add to the existing
    /// count and OR in the goal flag.
    pub fn upserted(
        existing: Option<&CalendarStamp>,
        pet_id: &str,
        date: NaiveDate,
        delta: StampDelta,
    ) -> CalendarStamp {
        let count = delta.count.max(1);
        match existing {
            Some(stamp) => CalendarStamp {
                pet_id: stamp.pet_id.clone(),
                date: stamp.date,
                stamp_count: stamp.stamp_count.saturating_add(count),
                goal_achieved: stamp.goal_achieved || delta.goal_achieved,
            },
            None => CalendarStamp {
                pet_id: pet_id.to_string(),
                date,
                stamp_count: count,
                goal_achieved: delta.goal_achieved,
            },
        }
    }
}
