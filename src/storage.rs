//! Persistence adapter
//!
//! The whole application state lives in a single JSON blob stored under one
//! fixed key of a local key-value store:
//!
//! ```text
//! <data dir>/
//!   wohnheim-tracker.json        # the state blob
//!   wohnheim-tracker.json.lock   # advisory lock for readers/writers
//! ```
//!
//! Loading never fails: an absent blob and a corrupt blob both hydrate the
//! empty state. Saving overwrites the blob unconditionally.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::AppState;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "wohnheim-tracker";

/// A local string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Anything that can hydrate and persist the application state
pub trait StateBackend {
    /// Hydrate the state; never fails
    fn load(&self) -> AppState;

    /// Overwrite the stored state
    fn save(&self, state: &AppState) -> Result<()>;
}

// =========================================================================
// File-backed store
// =========================================================================

/// One file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    timeout_ms: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        lock::read_locked(&self.path_for(key), self.timeout_ms)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock::write_locked(&self.path_for(key), value.as_bytes(), self.timeout_ms)
    }
}

// =========================================================================
// In-memory store
// =========================================================================

/// In-memory store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw value for `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seed a raw value, bypassing serialization
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.insert_raw(key, value);
        Ok(())
    }
}

// =========================================================================
// Persistence adapter
// =========================================================================

/// Loads and saves the whole state blob under a fixed key
#[derive(Debug, Clone)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and decode the blob, reporting why it could not be used
    pub fn try_load(&self) -> Result<Option<AppState>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let state: AppState = serde_json::from_str(&raw)?;
        Ok(Some(state))
    }

    /// Hydrate the state, substituting the empty state for absent or corrupt data
    pub fn load(&self) -> AppState {
        match self.try_load() {
            Ok(Some(state)) => {
                tracing::debug!(
                    key = %self.key,
                    members = state.members.len(),
                    tasks = state.tasks.len(),
                    "hydrated state"
                );
                state
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored state, starting empty");
                AppState::empty()
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "could not load stored state, starting empty");
                AppState::empty()
            }
        }
    }

    /// Serialize the full state and overwrite the blob
    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = encode_state(state)?;
        self.store.set(&self.key, &json)
    }
}

impl<S: KeyValueStore> StateBackend for Persistence<S> {
    fn load(&self) -> AppState {
        Persistence::load(self)
    }

    fn save(&self, state: &AppState) -> Result<()> {
        Persistence::save(self, state)
    }
}

/// Canonical serialized form of the state
pub fn encode_state(state: &AppState) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(Error::from)
}
