// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics routes.

use crate::db::PersistenceGateway;
use crate::error::Result;
use crate::models::stats::summarize_by_date;
use crate::models::{DaySummary, GoalProgress, WalkingStats};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Deserialize)]
struct StatsQuery {
    pet_id: String,
    /// Client's local date, `YYYY-MM-DD`
    today: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: WalkingStats,
    pub today: GoalProgress,
    pub today_summary: Option<DaySummary>,
}

/// Lifetime stats plus today's goal progress.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    let pet_id = super::require_pet_id(&params.pet_id)?;
    let today = super::parse_date_param("today", &params.today)?;

    let stamps = state.store.stamps_for_pet(pet_id);
    let todays_walks = state.store.list_walks_by_date(pet_id, today).await?;

    Ok(Json(StatsResponse {
        stats: WalkingStats::from_stamps(&stamps, today),
        today: GoalProgress::for_walks(&todays_walks),
        today_summary: summarize_by_date(&todays_walks).remove(&today),
    }))
}
