// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location tracking: filtering, distance, speed and the session state machine.

pub mod distance;
pub mod filter;
pub mod recovery;
pub mod source;
pub mod speed;
pub mod tracker;

pub use distance::{cumulative_distance, distance_meters};
pub use filter::{RejectReason, Verdict};
pub use recovery::{FileRecoveryStore, MemoryRecoveryStore, RecoveredSession, RecoveryStore, StoreError};
pub use source::{
    ChannelSource, FixOptions, GeolocationSource, LocationError, PositionStream, Subscription,
    SubscriptionId,
};
pub use speed::{SpeedEstimator, SpeedSample};
pub use tracker::{
    PathTracker, Recovery, TrackerEvent, TrackerSnapshot, TrackingError, TrackingState,
    DEFAULT_SESSION_KEY,
};
