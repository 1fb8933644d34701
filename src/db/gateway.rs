// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence gateway for walks and calendar stamps.

use chrono::NaiveDate;
use std::future::Future;

use crate::models::{CalendarStamp, StampDelta, WalkingRecord};

/// Persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Storage unreachable: {0}")]
    Transport(String),

    #[error("Storage rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Invalid walk record: {0}")]
    InvalidRecord(String),
}

/// Remote document store as seen by the client.
///
/// Stamp upserts must be atomic: two concurrent upserts for the same pet
/// and date both count.
pub trait PersistenceGateway: Send + Sync {
    /// Store a walk. Saving the same record id twice keeps one copy.
    fn save_walk(
        &self,
        record: &WalkingRecord,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    fn upsert_stamp(
        &self,
        pet_id: &str,
        date: NaiveDate,
        delta: StampDelta,
    ) -> impl Future<Output = Result<CalendarStamp, GatewayError>> + Send;

    /// Walks of one day, newest first.
    fn list_walks_by_date(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<WalkingRecord>, GatewayError>> + Send;

    /// Stamps of one month, ordered by date.
    fn list_stamps_by_month(
        &self,
        pet_id: &str,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<CalendarStamp>, GatewayError>> + Send;
}

/// Reject records the store should never hold.
pub fn validate_record(record: &WalkingRecord) -> Result<(), GatewayError> {
    if record.id.trim().is_empty() {
        return Err(GatewayError::InvalidRecord("empty id".to_string()));
    }
    if record.pet_id.trim().is_empty() {
        return Err(GatewayError::InvalidRecord("empty pet id".to_string()));
    }
    if !record.has_valid_path() {
        return Err(GatewayError::InvalidRecord(
            "coordinates out of range".to_string(),
        ));
    }
    if !record.distance_meters.is_finite() || record.distance_meters < 0.0 {
        return Err(GatewayError::InvalidRecord("bad distance".to_string()));
    }
    Ok(())
}
