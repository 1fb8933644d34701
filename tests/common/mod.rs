// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::NaiveDate;
use pawtrail::config::{Config, TrackerConfig};
use pawtrail::db::{GatewayError, MemoryStore, PersistenceGateway};
use pawtrail::models::{CalendarStamp, GeoSample, StampDelta, WalkingRecord};
use pawtrail::routes::create_router;
use pawtrail::tracking::{ChannelSource, MemoryRecoveryStore, PathTracker, RecoveryStore};
use pawtrail::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 2024-05-03T12:10:00Z
#[allow(dead_code)]
pub const BASE_MS: i64 = 1_714_738_200_000;

#[allow(dead_code)]
pub const BASE_LAT: f64 = 37.5;
#[allow(dead_code)]
pub const BASE_LON: f64 = 127.0;

/// Latitude delta for `meters` due north.
#[allow(dead_code)]
pub fn north(meters: f64) -> f64 {
    meters / pawtrail::tracking::distance::EARTH_RADIUS_METERS.to_radians()
}

/// A fix `meters_north` of the base point, `t_secs` after `BASE_MS`.
#[allow(dead_code)]
pub fn sample_at(meters_north: f64, t_secs: i64) -> GeoSample {
    GeoSample::new(
        BASE_LAT + north(meters_north),
        BASE_LON,
        5.0,
        BASE_MS + t_secs * 1000,
    )
}

/// Tracker thresholds with a short fix timeout so failing tests end fast.
#[allow(dead_code)]
pub fn test_tracker_config() -> TrackerConfig {
    TrackerConfig {
        fix_timeout: Duration::from_millis(100),
        ..TrackerConfig::default()
    }
}

/// Create a tracker wired to a scripted source and an in-memory store.
#[allow(dead_code)]
pub fn create_test_tracker() -> (
    Arc<ChannelSource>,
    Arc<MemoryRecoveryStore>,
    PathTracker<ChannelSource, MemoryRecoveryStore>,
) {
    let source = Arc::new(ChannelSource::new());
    let store = Arc::new(MemoryRecoveryStore::new());
    let tracker = PathTracker::new(source.clone(), store.clone(), test_tracker_config());
    (source, store, tracker)
}

/// Start `tracker` from a fix at the base point.
#[allow(dead_code)]
pub async fn start_at_base<R: RecoveryStore>(
    source: &ChannelSource,
    tracker: &mut PathTracker<ChannelSource, R>,
) {
    source.resolve_fix(Ok(sample_at(0.0, 0)));
    tracker.start().await.expect("Tracking should start");
}

/// Create a test app with an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        store: MemoryStore::new(),
    });

    (create_router(state.clone()), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

/// Gateway that can be told to fail, for exercising retry paths.
#[allow(dead_code)]
#[derive(Default)]
pub struct FlakyGateway {
    pub inner: MemoryStore,
    pub fail_walks: AtomicBool,
    pub fail_stamps: AtomicBool,
}

#[allow(dead_code)]
impl FlakyGateway {
    pub fn set_failing(&self, walks: bool, stamps: bool) {
        self.fail_walks.store(walks, Ordering::SeqCst);
        self.fail_stamps.store(stamps, Ordering::SeqCst);
    }
}

fn offline() -> GatewayError {
    GatewayError::Transport("offline".to_string())
}

impl PersistenceGateway for FlakyGateway {
    async fn save_walk(&self, record: &WalkingRecord) -> Result<String, GatewayError> {
        if self.fail_walks.load(Ordering::SeqCst) {
            return Err(offline());
        }
        self.inner.save_walk(record).await
    }

    async fn upsert_stamp(
        &self,
        pet_id: &str,
        date: NaiveDate,
        delta: StampDelta,
    ) -> Result<CalendarStamp, GatewayError> {
        if self.fail_stamps.load(Ordering::SeqCst) {
            return Err(offline());
        }
        self.inner.upsert_stamp(pet_id, date, delta).await
    }

    async fn list_walks_by_date(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WalkingRecord>, GatewayError> {
        self.inner.list_walks_by_date(pet_id, date).await
    }

    async fn list_stamps_by_month(
        &self,
        pet_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarStamp>, GatewayError> {
        self.inner.list_stamps_by_month(pet_id, year, month).await
    }
}
