// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk routes: store walks, list a day's walks, map data for one walk.

use crate::db::PersistenceGateway;
use crate::error::{AppError, Result};
use crate::models::{SavedWalk, WalkingRecord};
use crate::services::MapTrace;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/walks", get(list_walks).post(create_walk))
        .route("/api/walks/{id}/map", get(walk_map))
}

// ─── Create ──────────────────────────────────────────────────

/// Store a finished walk.
async fn create_walk(
    State(state): State<Arc<AppState>>,
    Json(record): Json<WalkingRecord>,
) -> Result<(StatusCode, Json<SavedWalk>)> {
    let id = state.store.save_walk(&record).await?;
    Ok((StatusCode::CREATED, Json(SavedWalk { id })))
}

// ─── List by day ─────────────────────────────────────────────

#[derive(Deserialize)]
struct WalksQuery {
    pet_id: String,
    /// `YYYY-MM-DD`
    date: String,
}

async fn list_walks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WalksQuery>,
) -> Result<Json<Vec<WalkingRecord>>> {
    let pet_id = super::require_pet_id(&params.pet_id)?;
    let date = super::parse_date_param("date", &params.date)?;

    tracing::debug!(pet_id, date = %date, "Listing walks");
    let walks = state.store.list_walks_by_date(pet_id, date).await?;
    Ok(Json(walks))
}

// ─── Map ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WalkMapResponse {
    pub trace: MapTrace,
    pub feature: geojson::Feature,
}

/// Map data for one stored walk.
async fn walk_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WalkMapResponse>> {
    let record = state
        .store
        .get_walk(&id)
        .ok_or_else(|| AppError::NotFound(format!("Walk {} not found", id)))?;

    let trace = match &record.path_points {
        Some(points) => MapTrace::from_points(points),
        None => MapTrace::from_coordinates(&record.path),
    }
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Map data error: {}", e)))?;

    let feature = trace.to_feature();
    Ok(Json(WalkMapResponse { trace, feature }))
}
