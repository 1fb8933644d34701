// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Speed estimation from consecutive accepted points.

use serde::Serialize;
use std::collections::VecDeque;

use crate::config::TrackerConfig;
use crate::models::PathPoint;
use crate::tracking::distance::distance_meters;

/// Speed derived from one accepted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedSample {
    pub instantaneous_kmh: f64,
    pub rolling_average_kmh: f64,
}

/// Instantaneous speed between two points, or `None` when the time delta is
/// non-positive or longer than `max_gap_seconds`.
pub fn instantaneous_kmh(prev: &PathPoint, curr: &PathPoint, max_gap_seconds: f64) -> Option<f64> {
    let dt = (curr.timestamp_ms - prev.timestamp_ms) as f64 / 1000.0;
    if dt <= 0.0 || dt > max_gap_seconds {
        return None;
    }
    Some(distance_meters(prev, curr) / dt * 3.6)
}

/// Running speed state for one session.
///
/// The average covers only the most recent `window` values so it follows
/// the current pace rather than the whole walk.
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    recent: VecDeque<f64>,
    window: usize,
    max_gap_seconds: f64,
    current_kmh: f64,
    max_kmh: f64,
}

impl SpeedEstimator {
    pub fn new(window: usize, max_gap_seconds: f64) -> Self {
        let window = window.max(1);
        Self {
            recent: VecDeque::with_capacity(window),
            window,
            max_gap_seconds,
            current_kmh: 0.0,
            max_kmh: 0.0,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.speed_window, config.max_speed_gap_seconds)
    }

    /// Feed an accepted pair. Stale pairs leave all state untouched.
    pub fn update(&mut self, prev: &PathPoint, curr: &PathPoint) -> Option<SpeedSample> {
        let Some(kmh) = instantaneous_kmh(prev, curr, self.max_gap_seconds) else {
            tracing::trace!(
                prev_ts = prev.timestamp_ms,
                curr_ts = curr.timestamp_ms,
                "Discarding stale speed sample"
            );
            return None;
        };

        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(kmh);
        self.current_kmh = kmh;
        self.max_kmh = self.max_kmh.max(kmh);

        Some(SpeedSample {
            instantaneous_kmh: kmh,
            rolling_average_kmh: self.rolling_average_kmh(),
        })
    }

    /// Rebuild state by replaying a recovered path.
    pub fn replay(&mut self, path: &[PathPoint]) {
        self.reset();
        for pair in path.windows(2) {
            self.update(&pair[0], &pair[1]);
        }
    }

    pub fn reset(&mut self) {
        self.recent.clear();
        self.current_kmh = 0.0;
        self.max_kmh = 0.0;
    }

    /// Latest valid instantaneous speed (0 before any).
    pub fn current_kmh(&self) -> f64 {
        self.current_kmh
    }

    pub fn max_kmh(&self) -> f64 {
        self.max_kmh
    }

    pub fn rolling_average_kmh(&self) -> f64 {
        if self.recent.is_empty() {
            return 0.0;
        }
        self.recent.iter().sum::<f64>() / self.recent.len() as f64
    }

    /// Whether at least one valid speed was computed.
    pub fn has_samples(&self) -> bool {
        !self.recent.is_empty()
    }
}
