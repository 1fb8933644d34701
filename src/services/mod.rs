// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod map;
pub mod record;
pub mod walk;

pub use map::{format_distance, AccuracyGrade, MapTrace};
pub use record::{RecordError, WalkInput};
pub use walk::{BeginError, FinishError, FinishedWalk, WalkSession};
