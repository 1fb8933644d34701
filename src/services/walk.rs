// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk session service.
//!
//! Handles the end-to-end workflow of one walk:
//! 1. Start (or resume) tracking
//! 2. Stop tracking and build the record
//! 3. Save the walk and upsert the day's stamp
//! 4. Clear the recovery entry once both writes succeeded

use std::sync::Arc;

use crate::db::{GatewayError, PersistenceGateway};
use crate::models::{CalendarStamp, WalkingRecord};
use crate::services::record::{self, RecordError, WalkInput};
use crate::tracking::{GeolocationSource, PathTracker, Recovery, RecoveryStore, TrackingError};

/// Errors from beginning a walk.
#[derive(Debug, thiserror::Error)]
pub enum BeginError {
    /// A finished walk has not been stored yet. Call `finish` to retry the
    /// save or `discard` to drop it.
    #[error("An unsaved walk is waiting to be finished")]
    UnsavedWalk,

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// Errors from finishing a walk.
#[derive(Debug, thiserror::Error)]
pub enum FinishError {
    #[error("No path was tracked")]
    NothingTracked,

    #[error(transparent)]
    Record(#[from] RecordError),

    /// The recovery entry is kept; call `finish` again to retry.
    #[error("Failed to persist walk: {0}")]
    Persistence(#[from] GatewayError),
}

/// Result of a successfully finished walk.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedWalk {
    pub record: WalkingRecord,
    pub stamp: CalendarStamp,
}

/// A record that was built but not yet fully persisted.
struct PendingSave {
    record: WalkingRecord,
    walk_saved: bool,
}

/// One pet's walk, from start to stored record.
pub struct WalkSession<S: GeolocationSource, R: RecoveryStore, G: PersistenceGateway> {
    tracker: PathTracker<S, R>,
    gateway: Arc<G>,
    pet_id: String,
    pending: Option<PendingSave>,
}

impl<S, R, G> WalkSession<S, R, G>
where
    S: GeolocationSource,
    R: RecoveryStore,
    G: PersistenceGateway,
{
    pub fn new(tracker: PathTracker<S, R>, gateway: Arc<G>, pet_id: impl Into<String>) -> Self {
        Self {
            tracker,
            gateway,
            pet_id: pet_id.into(),
            pending: None,
        }
    }

    pub fn tracker(&self) -> &PathTracker<S, R> {
        &self.tracker
    }

    /// Mutable access for driving updates (`next_event`, `on_foreground`).
    pub fn tracker_mut(&mut self) -> &mut PathTracker<S, R> {
        &mut self.tracker
    }

    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    /// Start tracking, continuing an interrupted walk if one was recovered.
    ///
    /// Refuses while a stopped walk is still unsaved, either from a failed
    /// `finish` in this session or found in the recovery store after a
    /// restart. That walk stays loaded in the tracker.
    pub async fn begin(&mut self) -> Result<Recovery, BeginError> {
        if self.pending.is_some() {
            return Err(BeginError::UnsavedWalk);
        }
        let recovery = self.tracker.resume().await?;
        match recovery {
            Recovery::Tracking => {}
            Recovery::Stopped => {
                tracing::warn!(
                    pet_id = %self.pet_id,
                    points = self.tracker.path().len(),
                    "Unsaved walk found, not starting a new one"
                );
                return Err(BeginError::UnsavedWalk);
            }
            Recovery::Nothing => self.tracker.start().await?,
        }
        tracing::info!(pet_id = %self.pet_id, ?recovery, "Walk started");
        Ok(recovery)
    }

    /// Drop the current walk without storing it, along with its recovery
    /// entry and any record left over from a failed `finish`.
    pub async fn discard(&mut self) -> Result<(), TrackingError> {
        if let Some(pending) = self.pending.take() {
            tracing::info!(walk_id = %pending.record.id, "Discarding unsaved walk");
        }
        self.tracker.clear().await
    }

    /// Seconds since the walk started, as shown by the running timer.
    pub fn elapsed_seconds(&self, now_ms: i64) -> u64 {
        self.tracker
            .started_at_ms()
            .map_or(0, |start| ((now_ms - start).max(0) / 1000) as u64)
    }

    /// Stop tracking and persist the walk.
    ///
    /// On failure the recovery entry survives, so the walk can be retried
    /// after a restart. Retrying reuses the record built the first time.
    pub async fn finish(
        &mut self,
        steps: Option<u32>,
        ended_at_ms: i64,
    ) -> Result<FinishedWalk, FinishError> {
        self.tracker.stop().await;

        let mut pending = match self.pending.take() {
            Some(pending) => pending,
            None => PendingSave {
                record: self.build_record(steps, ended_at_ms)?,
                walk_saved: false,
            },
        };

        if !pending.walk_saved {
            if let Err(error) = self.gateway.save_walk(&pending.record).await {
                tracing::warn!(error = %error, walk_id = %pending.record.id, "Walk save failed");
                self.pending = Some(pending);
                return Err(error.into());
            }
            pending.walk_saved = true;
        }

        let delta = record::stamp_delta(&pending.record);
        let stamp = match self
            .gateway
            .upsert_stamp(&self.pet_id, pending.record.date, delta)
            .await
        {
            Ok(stamp) => stamp,
            Err(error) => {
                tracing::warn!(error = %error, walk_id = %pending.record.id, "Stamp upsert failed");
                self.pending = Some(pending);
                return Err(error.into());
            }
        };

        if let Err(error) = self.tracker.clear().await {
            // Both writes landed; a stale entry only costs a resume prompt.
            tracing::warn!(error = %error, "Failed to clear recovery entry");
        }

        tracing::info!(
            pet_id = %self.pet_id,
            walk_id = %pending.record.id,
            elapsed_s = pending.record.elapsed_seconds,
            distance_m = pending.record.distance_meters,
            goal = pending.record.goal_achieved,
            "Walk finished"
        );
        Ok(FinishedWalk {
            record: pending.record,
            stamp,
        })
    }

    fn build_record(&self, steps: Option<u32>, ended_at_ms: i64) -> Result<WalkingRecord, FinishError> {
        let path = self.tracker.path();
        let Some(started_at_ms) = self.tracker.started_at_ms() else {
            return Err(FinishError::NothingTracked);
        };
        if path.is_empty() {
            return Err(FinishError::NothingTracked);
        }
        let speed = self.tracker.speed();
        let has_speed = speed.has_samples();

        let input = WalkInput {
            pet_id: self.pet_id.clone(),
            elapsed_seconds: self.elapsed_seconds(ended_at_ms),
            path: path.iter().map(|p| p.coordinate()).collect(),
            started_at_ms,
            ended_at_ms,
            path_points: Some(path.to_vec()),
            steps,
            avg_speed_kmh: has_speed.then(|| speed.rolling_average_kmh()),
            max_speed_kmh: has_speed.then(|| speed.max_kmh()),
        };
        Ok(record::build(input)?)
    }
}
