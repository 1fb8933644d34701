// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recovery store for in-progress sessions.
//!
//! The tracker mirrors its session here on every accepted point so that a
//! walk survives the process being suspended or killed mid-session.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::models::PathPoint;

/// Durable mirror of a tracking session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveredSession {
    pub is_tracking: bool,
    #[serde(default)]
    pub started_at_ms: Option<i64>,
    #[serde(default)]
    pub path: Vec<PathPoint>,
}

/// Recovery store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Recovery store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt recovery entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Keyed storage for session mirrors.
pub trait RecoveryStore: Send + Sync {
    /// Overwrite the entry for `key`.
    fn save(
        &self,
        key: &str,
        session: &RecoveredSession,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<RecoveredSession>, StoreError>> + Send;

    /// Remove the entry for `key`. Missing entries are not an error.
    fn clear(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Process-lifetime store, for tests and platforms that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryRecoveryStore {
    entries: DashMap<String, RecoveredSession>,
}

impl MemoryRecoveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<RecoveredSession> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecoveryStore for MemoryRecoveryStore {
    async fn save(&self, key: &str, session: &RecoveredSession) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), session.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<RecoveredSession>, StoreError> {
        Ok(self.get(key))
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per session key inside a directory.
///
/// Writes go to a temporary file that is renamed over the entry, so an
/// abrupt termination leaves either the previous or the new entry.
#[derive(Debug, Clone)]
pub struct FileRecoveryStore {
    dir: PathBuf,
}

impl FileRecoveryStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl RecoveryStore for FileRecoveryStore {
    async fn save(&self, key: &str, session: &RecoveredSession) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(session)?;
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<RecoveredSession>, StoreError> {
        match tokio::fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
