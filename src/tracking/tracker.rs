// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Path tracker: the `Idle -> Tracking -> Idle` state machine of one walk.
//!
//! Handles:
//! - Seeding the path from a high-accuracy fix on start
//! - Filtering continuous updates into the path
//! - Incremental distance and speed
//! - Mirroring the session to the recovery store
//! - Foreground recovery after the app was backgrounded
//!
//! Each subscription gets an epoch. An update is applied only if the tracker
//! is still tracking *and* the update's epoch is the live one at the moment
//! it is handled, so callbacks that fire after `stop()` change nothing.

use futures_util::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::TrackerConfig;
use crate::models::{GeoSample, PathPoint};
use crate::tracking::distance::{cumulative_distance, distance_meters};
use crate::tracking::filter::{self, RejectReason, Verdict};
use crate::tracking::recovery::{RecoveredSession, RecoveryStore, StoreError};
use crate::tracking::source::{
    FixOptions, GeolocationSource, LocationError, PositionStream, SubscriptionId,
};
use crate::tracking::speed::{SpeedEstimator, SpeedSample};

/// Recovery key used when the caller does not pick one.
pub const DEFAULT_SESSION_KEY: &str = "walking-path";

/// Tracking errors surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Recovery(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackingState {
    Idle,
    Tracking,
}

/// What handling one update did.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// The point joined the path; `speed` is `None` for stale pairs.
    Accepted {
        point: PathPoint,
        speed: Option<SpeedSample>,
    },
    /// The point moved the current location only.
    Rejected {
        sample: GeoSample,
        reason: RejectReason,
    },
    /// Not tracking, or the update belongs to an old subscription.
    Ignored,
    /// The subscription reported an error; tracking continues.
    SourceError(LocationError),
    /// The source closed the subscription stream.
    SourceClosed,
}

/// What `resume()` found in the recovery store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Nothing,
    /// An interrupted walk; tracking continues on the recovered path.
    Tracking,
    /// A stopped walk that was never cleared; the path is loaded, tracker idle.
    Stopped,
}

/// Live view pushed to observers after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub state: TrackingState,
    pub path_len: usize,
    pub current_location: Option<PathPoint>,
    pub last_accepted: Option<PathPoint>,
    pub distance_meters: f64,
    pub current_speed_kmh: f64,
    pub average_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub started_at_ms: Option<i64>,
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        Self {
            state: TrackingState::Idle,
            path_len: 0,
            current_location: None,
            last_accepted: None,
            distance_meters: 0.0,
            current_speed_kmh: 0.0,
            average_speed_kmh: 0.0,
            max_speed_kmh: 0.0,
            started_at_ms: None,
        }
    }
}

struct ActiveSubscription {
    id: SubscriptionId,
    epoch: u64,
    updates: PositionStream,
}

/// Owns the path of one walking session.
pub struct PathTracker<S: GeolocationSource, R: RecoveryStore> {
    source: Arc<S>,
    store: Arc<R>,
    config: TrackerConfig,
    session_key: String,

    state: TrackingState,
    path: Vec<PathPoint>,
    current_location: Option<PathPoint>,
    distance_meters: f64,
    started_at_ms: Option<i64>,
    speed: SpeedEstimator,

    epoch: u64,
    subscription: Option<ActiveSubscription>,
    snapshots: watch::Sender<TrackerSnapshot>,
}

impl<S: GeolocationSource, R: RecoveryStore> PathTracker<S, R> {
    pub fn new(source: Arc<S>, store: Arc<R>, config: TrackerConfig) -> Self {
        let (snapshots, _) = watch::channel(TrackerSnapshot::default());
        Self {
            source,
            store,
            speed: SpeedEstimator::from_config(&config),
            config,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            state: TrackingState::Idle,
            path: Vec::new(),
            current_location: None,
            distance_meters: 0.0,
            started_at_ms: None,
            epoch: 0,
            subscription: None,
            snapshots,
        }
    }

    /// Use a custom recovery key (e.g. one per pet).
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.state == TrackingState::Tracking
    }

    pub fn path(&self) -> &[PathPoint] {
        &self.path
    }

    pub fn current_location(&self) -> Option<&PathPoint> {
        self.current_location.as_ref()
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn started_at_ms(&self) -> Option<i64> {
        self.started_at_ms
    }

    pub fn speed(&self) -> &SpeedEstimator {
        &self.speed
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Epoch of the live subscription. Callback-style drivers capture this
    /// when they subscribe and pass it back to [`PathTracker::ingest`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Receive a snapshot after every change.
    pub fn observe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            state: self.state,
            path_len: self.path.len(),
            current_location: self.current_location,
            last_accepted: self.path.last().copied(),
            distance_meters: self.distance_meters,
            current_speed_kmh: self.speed.current_kmh(),
            average_speed_kmh: self.speed.rolling_average_kmh(),
            max_speed_kmh: self.speed.max_kmh(),
            started_at_ms: self.started_at_ms,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Start tracking.
    ///
    /// No-op while already tracking. An interrupted session found in the
    /// recovery store is resumed instead of starting over. Otherwise a fresh
    /// session is seeded with one high-accuracy fix; if that fails the
    /// tracker stays idle and any previous path is left untouched.
    pub async fn start(&mut self) -> Result<(), TrackingError> {
        if self.is_tracking() {
            tracing::debug!("start() while tracking, ignoring");
            return Ok(());
        }

        if let Some(session) = self.load_recovery().await {
            if session.is_tracking && !session.path.is_empty() {
                self.adopt(session);
                self.begin_tracking()?;
                self.publish();
                tracing::info!(points = self.path.len(), "Resumed interrupted walk");
                return Ok(());
            }
        }

        let fix = self.request_fix().await?;
        self.begin_tracking()?;

        self.reset_session();
        let seed = PathPoint::from(fix);
        self.path.push(seed);
        self.current_location = Some(seed);
        self.started_at_ms = Some(fix.timestamp_ms);

        self.persist().await;
        self.publish();

        tracing::info!(
            latitude = fix.latitude,
            longitude = fix.longitude,
            accuracy_m = fix.accuracy_meters,
            "Tracking started"
        );
        Ok(())
    }

    /// Reload whatever the recovery store holds for this session.
    ///
    /// Does nothing while tracking.
    pub async fn resume(&mut self) -> Result<Recovery, TrackingError> {
        if self.is_tracking() {
            return Ok(Recovery::Nothing);
        }

        let Some(session) = self.store.load(&self.session_key).await? else {
            return Ok(Recovery::Nothing);
        };
        if session.path.is_empty() {
            return Ok(Recovery::Nothing);
        }

        let was_tracking = session.is_tracking;
        self.adopt(session);
        if was_tracking {
            self.begin_tracking()?;
            self.publish();
            tracing::info!(points = self.path.len(), "Resumed interrupted walk");
            Ok(Recovery::Tracking)
        } else {
            self.publish();
            tracing::info!(points = self.path.len(), "Loaded unfinished walk");
            Ok(Recovery::Stopped)
        }
    }

    /// Stop tracking. The path is kept until [`PathTracker::clear`].
    ///
    /// Safe to call repeatedly.
    pub async fn stop(&mut self) {
        if !self.halt() {
            return;
        }
        self.persist().await;
        tracing::info!(
            points = self.path.len(),
            distance_m = self.distance_meters,
            "Tracking stopped"
        );
    }

    /// Drop the session and its recovery entry.
    pub async fn clear(&mut self) -> Result<(), TrackingError> {
        self.halt();
        self.reset_session();
        self.publish();
        self.store.clear(&self.session_key).await?;
        Ok(())
    }

    // ─── Updates ─────────────────────────────────────────────────

    /// Wait for the next update of the live subscription and handle it.
    ///
    /// Returns `None` when there is no subscription.
    pub async fn next_event(&mut self) -> Option<TrackerEvent> {
        let subscription = self.subscription.as_mut()?;
        let epoch = subscription.epoch;
        let update = subscription.updates.next().await;

        match update {
            Some(Ok(sample)) => Some(self.ingest(epoch, sample).await),
            Some(Err(error)) => {
                if !self.is_tracking() || epoch != self.epoch {
                    return Some(TrackerEvent::Ignored);
                }
                tracing::warn!(error = %error, "Location update error");
                Some(TrackerEvent::SourceError(error))
            }
            None => {
                tracing::warn!("Location subscription closed by source");
                self.subscription = None;
                Some(TrackerEvent::SourceClosed)
            }
        }
    }

    /// Handle one sample delivered for subscription `epoch`.
    pub async fn ingest(&mut self, epoch: u64, sample: GeoSample) -> TrackerEvent {
        if !self.is_tracking() || epoch != self.epoch {
            tracing::trace!(epoch, live_epoch = self.epoch, "Ignoring late update");
            return TrackerEvent::Ignored;
        }

        // The dot moves even when the trail does not.
        self.current_location = Some(PathPoint::from(sample));

        if let Verdict::Reject(reason) = filter::accept(&sample, self.path.last(), &self.config) {
            tracing::trace!(?reason, accuracy_m = sample.accuracy_meters, "Sample rejected");
            self.publish();
            return TrackerEvent::Rejected { sample, reason };
        }

        let point = PathPoint::from(sample);
        let speed = match self.path.last() {
            Some(prev) => {
                self.distance_meters += distance_meters(prev, &point);
                self.speed.update(prev, &point)
            }
            None => None,
        };
        self.path.push(point);

        self.persist().await;
        self.publish();

        TrackerEvent::Accepted { point, speed }
    }

    /// Call when the app returns to the foreground.
    ///
    /// Adopts a longer path from the recovery store (a restarted process may
    /// have written more than this instance holds), then forces one fresh
    /// fix to cover the gap in continuous updates. Returns `None` when idle.
    /// A fix that fails with `PermissionDenied` or `Unavailable` stops
    /// tracking; a timeout leaves it running.
    pub async fn on_foreground(&mut self) -> Result<Option<TrackerEvent>, TrackingError> {
        if !self.is_tracking() {
            return Ok(None);
        }
        let epoch = self.epoch;

        if let Some(session) = self.load_recovery().await {
            if session.path.len() > self.path.len() {
                tracing::info!(
                    recovered = session.path.len(),
                    in_memory = self.path.len(),
                    "Adopting longer recovered path"
                );
                self.path = session.path;
                self.distance_meters = cumulative_distance(&self.path);
                self.speed.replay(&self.path);
                self.current_location = self.path.last().copied();
                if self.started_at_ms.is_none() {
                    self.started_at_ms = session.started_at_ms;
                }
                self.publish();
            }
        }

        match self.request_fix().await {
            Ok(fix) => Ok(Some(self.ingest(epoch, fix).await)),
            Err(LocationError::Timeout) => {
                tracing::warn!("Foreground fix timed out");
                Err(LocationError::Timeout.into())
            }
            Err(error) => {
                tracing::warn!(error = %error, "Foreground fix failed, stopping");
                self.stop().await;
                Err(error.into())
            }
        }
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn request_fix(&self) -> Result<GeoSample, LocationError> {
        let options = FixOptions {
            timeout: self.config.fix_timeout,
            high_accuracy: true,
        };
        match tokio::time::timeout(options.timeout, self.source.current_fix(options)).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }

    /// Subscribe under a new epoch and switch to tracking.
    ///
    /// Leaves the session data alone; callers publish once it is in place.
    fn begin_tracking(&mut self) -> Result<(), LocationError> {
        self.epoch += 1;
        let subscription = self.source.subscribe()?;
        self.subscription = Some(ActiveSubscription {
            id: subscription.id,
            epoch: self.epoch,
            updates: subscription.updates,
        });
        self.state = TrackingState::Tracking;
        Ok(())
    }

    /// Unsubscribe and go idle. Returns whether the tracker was tracking.
    fn halt(&mut self) -> bool {
        // Invalidate anything still in flight for the old epoch.
        self.epoch += 1;
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription.id);
        }
        let was_tracking = self.is_tracking();
        self.state = TrackingState::Idle;
        if was_tracking {
            self.publish();
        }
        was_tracking
    }

    fn adopt(&mut self, session: RecoveredSession) {
        self.reset_session();
        self.distance_meters = cumulative_distance(&session.path);
        self.speed.replay(&session.path);
        self.current_location = session.path.last().copied();
        self.started_at_ms = session
            .started_at_ms
            .or_else(|| session.path.first().map(|p| p.timestamp_ms));
        self.path = session.path;
    }

    fn reset_session(&mut self) {
        self.path.clear();
        self.current_location = None;
        self.distance_meters = 0.0;
        self.started_at_ms = None;
        self.speed.reset();
    }

    async fn load_recovery(&self) -> Option<RecoveredSession> {
        match self.store.load(&self.session_key).await {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(error = %error, key = %self.session_key, "Ignoring unreadable recovery entry");
                None
            }
        }
    }

    /// Mirror the session. A failed write is logged and tracking goes on;
    /// the next accepted point rewrites the whole entry.
    async fn persist(&self) {
        let session = RecoveredSession {
            is_tracking: self.is_tracking(),
            started_at_ms: self.started_at_ms,
            path: self.path.clone(),
        };
        if let Err(error) = self.store.save(&self.session_key, &session).await {
            tracing::warn!(error = %error, key = %self.session_key, "Failed to persist session");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

impl<S: GeolocationSource, R: RecoveryStore> Drop for PathTracker<S, R> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription.id);
        }
    }
}
