// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer: the gateway trait and its backends.

pub mod gateway;
pub mod http;
pub mod memory;

pub use gateway::{GatewayError, PersistenceGateway};
pub use http::HttpGateway;
pub use memory::MemoryStore;
