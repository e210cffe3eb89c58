use std::collections::HashMap;
use std::sync::{Arc, Mutex};
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// A durable key-value surface: one global namespace of string slots.
///
/// Methods take `&self` so a single store can back the ledger and every
/// other service at once (see [`SharedStore`]).
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// A key-value store shared between the ledger and the other services.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// In-memory store. Clones share the same namespace, so a second handle
/// observes everything written through the first.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently written.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> CoreError {
        CoreError::PersistenceUnavailable("memory store lock poisoned".into())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let slots = self.slots.lock().map_err(|_| Self::poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut slots = self.slots.lock().map_err(|_| Self::poisoned())?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut slots = self.slots.lock().map_err(|_| Self::poisoned())?;
        slots.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each slot is a file `<key>.json` under `root`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            CoreError::PersistenceUnavailable(format!(
                "cannot create data directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a slot: `<key>.json` under the root.
    ///
    /// Keys must be non-empty and use only `[A-Za-z0-9_.-]`, and may not
    /// start with a dot, so every key maps to its own file inside the root.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, CoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(CoreError::ValidationError(format!(
                "Invalid storage key '{key}': use ASCII letters, digits, '_', '-' or '.'"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(self.slot_path(key)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::PersistenceUnavailable(format!(
                "cannot read slot '{key}': {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| {
                CoreError::PersistenceUnavailable(format!("cannot write slot '{key}': {e}"))
            })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(self.slot_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::PersistenceUnavailable(format!(
                "cannot remove slot '{key}': {e}"
            ))),
        }
    }
}
