// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar stamp routes.

use crate::db::PersistenceGateway;
use crate::error::{AppError, Result};
use crate::models::{CalendarStamp, StampUpsert};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stamps", get(list_stamps).post(upsert_stamp))
}

/// Atomically add walks to a day's stamp.
async fn upsert_stamp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StampUpsert>,
) -> Result<Json<CalendarStamp>> {
    let pet_id = super::require_pet_id(&body.pet_id)?;
    let stamp = state
        .store
        .upsert_stamp(pet_id, body.date, body.delta)
        .await?;
    Ok(Json(stamp))
}

#[derive(Deserialize)]
struct StampsQuery {
    pet_id: String,
    year: i32,
    month: u32,
}

/// Stamps of one calendar month.
async fn list_stamps(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StampsQuery>,
) -> Result<Json<Vec<CalendarStamp>>> {
    let pet_id = super::require_pet_id(&params.pet_id)?;
    if !(1..=12).contains(&params.month) {
        return Err(AppError::BadRequest(format!(
            "Invalid 'month' parameter: {}",
            params.month
        )));
    }

    let stamps = state
        .store
        .list_stamps_by_month(pet_id, params.year, params.month)
        .await?;
    Ok(Json(stamps))
}
