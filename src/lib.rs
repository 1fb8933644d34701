// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pawtrail: GPS walk tracking for pets.
//!
//! This crate provides the tracking pipeline that turns raw position fixes
//! into a filtered path with distance and speed, the walking record built
//! from it, and the walk-log API that stores walks and calendar stamps.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod tracking;

use config::Config;
use db::MemoryStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: MemoryStore,
}
