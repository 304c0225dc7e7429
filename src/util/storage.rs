//! Durable key-value persistence shared by the session and locale stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser builds persist to `localStorage`; native builds use an in-memory
//! map or a single JSON file. Stores receive the substrate as
//! `Rc<dyn DurableStore>` so every consumer reads the same keys and tests can
//! substitute a fake.
//!
//! TRADE-OFFS
//! ==========
//! Reads return `Option` and never fail: an unreadable value is treated the
//! same as a missing one. Writes return `Result` because callers must be able
//! to roll back when a quota or I/O error hits mid-update.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// JSON-serialized user record.
pub const USER_KEY: &str = "user";
/// Two-letter locale code.
pub const LANGUAGE_KEY: &str = "language";

/// Errors produced by durable store writes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store could not be opened or reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the store's capacity.
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    /// The backing store rejected the write.
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Persistent key-value substrate surviving reloads.
///
/// Absence of a key is a valid state, not an error.
pub trait DurableStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the removal could not be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-memory store. Clones share the same entries.
///
/// An optional byte quota (keys plus values) makes `set` fail the way a full
/// `localStorage` does.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that rejects writes once `bytes` would be exceeded.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self { entries: Rc::default(), quota: Some(bytes) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn fits(&self, entries: &BTreeMap<String, String>, key: &str, value: &str) -> bool {
        let Some(quota) = self.quota else {
            return true;
        };
        let others: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len() <= quota
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        if !self.fits(&entries, key, value) {
            return Err(StorageError::QuotaExceeded { key: key.to_owned() });
        }
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

/// Native durable store backed by one JSON object file.
///
/// The whole map is rewritten on every mutation through a staging file and a
/// rename; the in-memory copy only changes after the rename succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is ignored and replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("ignoring malformed store file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Unavailable(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, entries: RefCell::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next snapshot is staged in before it replaces `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Stage the snapshot, then rename it over the store file so a reader
    /// sees either the old or the new map, never a truncated one.
    fn commit(&self, next: BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&next).map_err(|e| StorageError::Write(e.to_string()))?;
        let staging = self.staging_path();
        std::fs::write(&staging, raw).map_err(|e| StorageError::Write(format!("{}: {e}", staging.display())))?;
        if let Err(e) = std::fs::rename(&staging, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&staging) {
                log::warn!("failed to remove {}: {cleanup}", staging.display());
            }
            return Err(StorageError::Write(format!("{}: {e}", self.path.display())));
        }
        *self.entries.borrow_mut() = next;
        Ok(())
    }
}

impl DurableStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut next = self.entries.borrow().clone();
        next.insert(key.to_owned(), value.to_owned());
        self.commit(next)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.entries.borrow().contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.borrow().clone();
        next.remove(key);
        self.commit(next)
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `window.localStorage`, scoped to the page origin.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "hydrate")]
impl LocalStorage {
    /// # Errors
    ///
    /// Returns an error when there is no window or storage is disabled.
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("window.localStorage".to_owned()))?;
        Ok(Self { storage })
    }
}

#[cfg(feature = "hydrate")]
impl DurableStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{key}: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write(format!("{key}: {e:?}")))
    }
}
