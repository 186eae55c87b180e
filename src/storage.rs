// SPDX-License-Identifier: MIT

//! Local persistence: plain key-value strings under fixed, well-known keys.
//!
//! Holds the bearer token, the optional refresh token, and the JSON metrics
//! snapshot. One logical writer exists (the embedding app's main flow), so
//! writes are synchronous last-writer-wins with no locking across processes.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{ApiError, Result};
use crate::models::MetricsSnapshot;

/// Fixed key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Fixed key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Fixed key for the numeric-profile backup snapshot.
pub const SNAPSHOT_KEY: &str = "profile_metrics";

enum Backend {
    /// One file per key inside a directory.
    Dir(PathBuf),
    /// In-memory map for tests (offline mode).
    Memory(Mutex<HashMap<String, String>>),
}

/// Key-value store for client-local state.
pub struct LocalStore {
    backend: Backend,
}

impl LocalStore {
    /// Create a directory-backed store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ApiError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self {
            backend: Backend::Dir(dir),
        })
    }

    /// Create an in-memory store for testing (offline mode).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Read the string stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match &self.backend {
            Backend::Dir(dir) => match fs::read_to_string(dir.join(key)) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(ApiError::Storage(format!("read {}: {}", key, e))),
            },
            Backend::Memory(map) => Ok(map
                .lock()
                .expect("storage lock poisoned")
                .get(key)
                .cloned()),
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match &self.backend {
            Backend::Dir(dir) => fs::write(dir.join(key), value)
                .map_err(|e| ApiError::Storage(format!("write {}: {}", key, e))),
            Backend::Memory(map) => {
                map.lock()
                    .expect("storage lock poisoned")
                    .insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Dir(dir) => match fs::remove_file(dir.join(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(ApiError::Storage(format!("remove {}: {}", key, e))),
            },
            Backend::Memory(map) => {
                map.lock().expect("storage lock poisoned").remove(key);
                Ok(())
            }
        }
    }

    // ─── Typed helpers over the fixed keys ───────────────────────────────────

    pub fn load_token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY)
    }

    /// Persist the token pair. The refresh token may be absent (federated
    /// logins that did not return one).
    pub fn save_tokens(&self, access: &str, refresh: Option<&str>) -> Result<()> {
        self.set(TOKEN_KEY, access)?;
        match refresh {
            Some(refresh) => self.set(REFRESH_TOKEN_KEY, refresh),
            None => self.remove(REFRESH_TOKEN_KEY),
        }
    }

    /// Remove both tokens. Called from logout and from fatal authorization
    /// failures; must leave no partial state behind.
    pub fn clear_tokens(&self) -> Result<()> {
        self.remove(TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }

    /// Load the metrics backup snapshot, if one was ever saved.
    ///
    /// A corrupt snapshot is treated as absent: the repair path is
    /// best-effort and must never fail an operation.
    pub fn load_snapshot(&self) -> Option<MetricsSnapshot> {
        let raw = match self.get(SNAPSHOT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read metrics snapshot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt metrics snapshot");
                None
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| ApiError::Storage(format!("serialize snapshot: {}", e)))?;
        self.set(SNAPSHOT_KEY, &raw)
    }
}
