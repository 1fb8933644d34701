// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store backing the walk-log server.
//!
//! Collections:
//! - Walks (keyed by record id)
//! - Stamps (keyed by pet id and date)

use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::gateway::{validate_record, GatewayError, PersistenceGateway};
use crate::models::{CalendarStamp, StampDelta, WalkingRecord};
use crate::time_utils::month_bounds;

type StampKey = (String, NaiveDate);

/// Shared store; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    walks: Arc<DashMap<String, WalkingRecord>>,
    stamps: Arc<DashMap<StampKey, CalendarStamp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_walk(&self, id: &str) -> Option<WalkingRecord> {
        self.walks.get(id).map(|entry| entry.value().clone())
    }

    pub fn walk_count(&self) -> usize {
        self.walks.len()
    }

    pub fn get_stamp(&self, pet_id: &str, date: NaiveDate) -> Option<CalendarStamp> {
        self.stamps
            .get(&(pet_id.to_string(), date))
            .map(|entry| entry.value().clone())
    }

    /// Every stamp of one pet, ordered by date.
    pub fn stamps_for_pet(&self, pet_id: &str) -> Vec<CalendarStamp> {
        let mut stamps: Vec<CalendarStamp> = self
            .stamps
            .iter()
            .filter(|entry| entry.key().0 == pet_id)
            .map(|entry| entry.value().clone())
            .collect();
        stamps.sort_by_key(|stamp| stamp.date);
        stamps
    }
}

impl PersistenceGateway for MemoryStore {
    async fn save_walk(&self, record: &WalkingRecord) -> Result<String, GatewayError> {
        validate_record(record)?;

        // Same id twice: keep the first copy
        self.walks
            .entry(record.id.clone())
            .or_insert_with(|| record.clone());

        tracing::info!(
            walk_id = %record.id,
            pet_id = %record.pet_id,
            date = %record.date,
            distance_m = record.distance_meters,
            "Walk saved"
        );
        Ok(record.id.clone())
    }

    async fn upsert_stamp(
        &self,
        pet_id: &str,
        date: NaiveDate,
        delta: StampDelta,
    ) -> Result<CalendarStamp, GatewayError> {
        if pet_id.trim().is_empty() {
            return Err(GatewayError::InvalidRecord("empty pet id".to_string()));
        }

        // The entry guard holds the shard lock for the read-modify-write.
        let mut entry = self
            .stamps
            .entry((pet_id.to_string(), date))
            .or_insert_with(|| CalendarStamp {
                pet_id: pet_id.to_string(),
                date,
                stamp_count: 0,
                goal_achieved: false,
            });
        let existing = (entry.stamp_count > 0).then(|| entry.value().clone());
        let updated = CalendarStamp::upserted(existing.as_ref(), pet_id, date, delta);
        *entry = updated.clone();
        drop(entry);

        tracing::debug!(
            pet_id,
            date = %date,
            count = updated.stamp_count,
            goal = updated.goal_achieved,
            "Stamp upserted"
        );
        Ok(updated)
    }

    async fn list_walks_by_date(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WalkingRecord>, GatewayError> {
        let mut walks: Vec<WalkingRecord> = self
            .walks
            .iter()
            .filter(|entry| entry.pet_id == pet_id && entry.date == date)
            .map(|entry| entry.value().clone())
            .collect();
        walks.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(walks)
    }

    async fn list_stamps_by_month(
        &self,
        pet_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarStamp>, GatewayError> {
        let (first, last) = month_bounds(year, month).ok_or(GatewayError::InvalidMonth(month))?;
        Ok(self
            .stamps_for_pet(pet_id)
            .into_iter()
            .filter(|stamp| stamp.date >= first && stamp.date <= last)
            .collect())
    }
}
