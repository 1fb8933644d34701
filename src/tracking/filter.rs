// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sample filter: decides whether a raw fix joins the path.
//!
//! Without it, stationary GPS noise adds thousands of near-zero segments that
//! inflate distance and corrupt speed.

use crate::config::TrackerConfig;
use crate::models::{GeoSample, PathPoint};
use crate::tracking::distance::distance_meters;

/// Outcome of filtering a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Why a sample was kept off the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Reported accuracy is worse than `max_accuracy_meters`
    LowAccuracy,
    /// Moved less than `min_distance_meters` since the last accepted point
    Jitter,
}

/// Filter a candidate against the last accepted point.
///
/// The accuracy gate applies to every sample, including the first one; only
/// the distance gate is skipped when nothing has been accepted yet.
pub fn accept(
    candidate: &GeoSample,
    last_accepted: Option<&PathPoint>,
    config: &TrackerConfig,
) -> Verdict {
    if let Some(max_accuracy) = config.max_accuracy_meters {
        if candidate.accuracy_meters > max_accuracy {
            return Verdict::Reject(RejectReason::LowAccuracy);
        }
    }

    let Some(last) = last_accepted else {
        return Verdict::Accept;
    };

    if distance_meters(last, candidate) < config.min_distance_meters {
        return Verdict::Reject(RejectReason::Jitter);
    }

    Verdict::Accept
}
