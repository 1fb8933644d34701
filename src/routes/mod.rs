// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod stamps;
pub mod stats;
pub mod walks;

use crate::error::{AppError, Result};
use crate::time_utils::parse_date_key;
use crate::AppState;
use axum::http::{header, Method};
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .merge(walks::routes())
        .merge(stamps::routes())
        .merge(stats::routes())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// ─── Parameter helpers ───────────────────────────────────────

fn require_pet_id(pet_id: &str) -> Result<&str> {
    let pet_id = pet_id.trim();
    if pet_id.is_empty() {
        return Err(AppError::BadRequest("Missing 'pet_id'".to_string()));
    }
    Ok(pet_id)
}

fn parse_date_param(name: &str, raw: &str) -> Result<NaiveDate> {
    parse_date_key(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid '{}' parameter: must be YYYY-MM-DD",
            name
        ))
    })
}
