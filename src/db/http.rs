// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for a remote walk-log server.
//!
//! Handles:
//! - Saving walks
//! - Atomic stamp upserts (performed server-side)
//! - Day and month listings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::db::gateway::{GatewayError, PersistenceGateway};
use crate::models::{CalendarStamp, SavedWalk, StampDelta, StampUpsert, WalkingRecord};
use crate::time_utils::date_key;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Walk-log API client.
#[derive(Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, GatewayError>
    where
        T: for<'de> Deserialize<'de>,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        check_response_json(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response status and decode the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %message, "Walk-log request failed");
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| GatewayError::Transport(format!("JSON parse error: {}", e)))
}

impl PersistenceGateway for HttpGateway {
    async fn save_walk(&self, record: &WalkingRecord) -> Result<String, GatewayError> {
        let saved: SavedWalk = self.post_json("/api/walks", record).await?;
        Ok(saved.id)
    }

    async fn upsert_stamp(
        &self,
        pet_id: &str,
        date: NaiveDate,
        delta: StampDelta,
    ) -> Result<CalendarStamp, GatewayError> {
        let body = StampUpsert {
            pet_id: pet_id.to_string(),
            date,
            delta,
        };
        self.post_json("/api/stamps", &body).await
    }

    async fn list_walks_by_date(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WalkingRecord>, GatewayError> {
        let date = date_key(date);
        self.get_json("/api/walks", &[("pet_id", pet_id), ("date", date.as_str())])
            .await
    }

    async fn list_stamps_by_month(
        &self,
        pet_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarStamp>, GatewayError> {
        if !(1..=12).contains(&month) {
            return Err(GatewayError::InvalidMonth(month));
        }
        let year = year.to_string();
        let month = month.to_string();
        self.get_json(
            "/api/stamps",
            &[
                ("pet_id", pet_id),
                ("year", year.as_str()),
                ("month", month.as_str()),
            ],
        )
        .await
    }
}
