//! Walking statistics and per-day aggregates for the calendar view.
//!
//! Everything here is derived from stored walks and stamps; nothing is
//! persisted on its own.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CalendarStamp, WalkingRecord, GOAL_SECONDS};

/// All walks of one day folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub walk_count: u32,
    pub total_seconds: u64,
    pub total_distance_meters: f64,
    pub coordinate_count: usize,
    pub first_start: DateTime<Utc>,
    pub last_end: DateTime<Utc>,
    /// True if any walk that day met the goal on its own
    pub goal_achieved: bool,
}

impl DaySummary {
    fn from_walk(walk: &WalkingRecord) -> Self {
        Self {
            date: walk.date,
            walk_count: 1,
            total_seconds: walk.elapsed_seconds,
            total_distance_meters: walk.distance_meters,
            coordinate_count: walk.coordinate_count(),
            first_start: walk.start_time,
            last_end: walk.end_time,
            goal_achieved: walk.goal_achieved,
        }
    }

    fn add(&mut self, walk: &WalkingRecord) {
        self.walk_count += 1;
        self.total_seconds = self.total_seconds.saturating_add(walk.elapsed_seconds);
        self.total_distance_meters += walk.distance_meters;
        self.coordinate_count += walk.coordinate_count();
        self.first_start = self.first_start.min(walk.start_time);
        self.last_end = self.last_end.max(walk.end_time);
        self.goal_achieved |= walk.goal_achieved;
    }
}

/// Group walks by their local start date.
pub fn summarize_by_date(walks: &[WalkingRecord]) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for walk in walks {
        days.entry(walk.date)
            .and_modify(|day| day.add(walk))
            .or_insert_with(|| DaySummary::from_walk(walk));
    }
    days
}

/// Progress toward the daily duration goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub minutes: u64,
    pub goal_minutes: u64,
    /// 0..=100
    pub percentage: u8,
}

impl GoalProgress {
    pub fn from_seconds(total_seconds: u64) -> Self {
        let minutes = total_seconds / 60;
        let goal_minutes = GOAL_SECONDS / 60;
        let percentage = (minutes.saturating_mul(100) / goal_minutes).min(100) as u8;
        Self {
            minutes,
            goal_minutes,
            percentage,
        }
    }

    /// Progress for one day's walks.
    pub fn for_walks(walks: &[WalkingRecord]) -> Self {
        Self::from_seconds(
            walks
                .iter()
                .fold(0u64, |total, w| total.saturating_add(w.elapsed_seconds)),
        )
    }

    pub fn is_complete(&self) -> bool {
        self.percentage >= 100
    }
}

/// Lifetime statistics for one pet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkingStats {
    /// Walks across all stamps
    pub total_walks: u32,
    /// Days on which the goal was met
    pub total_goal_achievements: u32,
    /// Longest run of consecutive stamped days
    pub longest_streak: u32,
    /// Run of consecutive stamped days ending today (or yesterday, if today
    /// has no walk yet)
    pub current_streak: u32,
}

impl WalkingStats {
    pub fn from_stamps(stamps: &[CalendarStamp], today: NaiveDate) -> Self {
        let total_walks = stamps.iter().map(|s| s.stamp_count).sum();
        let total_goal_achievements = stamps.iter().filter(|s| s.goal_achieved).count() as u32;

        let days: BTreeSet<NaiveDate> = stamps.iter().map(|s| s.date).collect();

        let mut longest_streak = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for &date in &days {
            run = match previous {
                Some(prev) if prev.succ_opt() == Some(date) => run + 1,
                _ => 1,
            };
            longest_streak = longest_streak.max(run);
            previous = Some(date);
        }

        let anchor = if days.contains(&today) {
            Some(today)
        } else {
            today.pred_opt().filter(|yesterday| days.contains(yesterday))
        };
        let mut current_streak = 0;
        let mut cursor = anchor;
        while let Some(date) = cursor.filter(|d| days.contains(d)) {
            current_streak += 1;
            cursor = date.pred_opt();
        }

        Self {
            total_walks,
            total_goal_achievements,
            longest_streak,
            current_streak,
        }
    }
}
