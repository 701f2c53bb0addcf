//! Persistence adapter over an opaque key-value store.
//!
//! Collections are serialized as JSON documents under named keys. Loads
//! degrade to safe defaults and saves swallow their errors after logging:
//! the in-memory state stays the source of truth for the rest of the
//! session, and the most recent committed write wins.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, error, trace, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::{Folder, NotesError, Preferences, Result, StoredData, ROOT_FOLDER_ID};

/// Key under which the note collection is persisted.
pub const NOTES_KEY: &str = "notes";
/// Key under which the folder collection is persisted.
pub const FOLDERS_KEY: &str = "folders";
/// Key under which the tag collection is persisted.
pub const TAGS_KEY: &str = "tags";
/// Preference key for the sidebar panel flag.
pub const SIDEBAR_OPEN_KEY: &str = "sidebarOpen";
/// Preference key for the preview pane flag.
pub const PREVIEW_VISIBLE_KEY: &str = "previewVisible";

/// Opaque key-value persistence service.
pub trait KeyValueStore: Send {
    /// Returns the stored value for a key, or `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value under a key, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one JSON document per key in a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // Write-then-rename keeps the previous record intact if the write
        // dies midway.
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path).map_err(|e| NotesError::Io(e.error))?;
        trace!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed boundary over a [`KeyValueStore`].
///
/// Cheap to clone; all clones share the same underlying store.
#[derive(Clone)]
pub struct StorageAdapter {
    store: Arc<Mutex<Box<dyn KeyValueStore>>>,
}

impl StorageAdapter {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    /// Loads the three collections, falling back to an empty workspace with
    /// a single root folder when a record is missing or unparsable.
    pub fn load(&self) -> StoredData {
        let mut data = StoredData {
            notes: self.get_or_default(NOTES_KEY),
            folders: self.get_or_default(FOLDERS_KEY),
            tags: self.get_or_default(TAGS_KEY),
        };
        if !data.folders.iter().any(|f| f.id == ROOT_FOLDER_ID) {
            warn!("Stored folder list lacks the root folder, reinstating it");
            data.folders.insert(0, Folder::root());
        }
        debug!(
            "Loaded {} notes, {} folders, {} tags",
            data.notes.len(),
            data.folders.len(),
            data.tags.len()
        );
        data
    }

    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.lock() {
            Ok(store) => store.get(key),
            Err(e) => {
                error!("Failed to acquire lock on key-value store: {}", e);
                None
            }
        };
        let Some(raw) = raw else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse stored record {}: {}", key, e);
                T::default()
            }
        }
    }

    /// Serializes and writes one record. All errors are logged, never
    /// surfaced.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let json = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {} for persistence: {}", key, e);
                return;
            }
        };
        match self.store.lock() {
            Ok(mut store) => {
                if let Err(e) = store.set(key, &json) {
                    error!("Failed to persist {}: {}", key, e);
                }
            }
            Err(e) => error!("Failed to acquire lock on key-value store: {}", e),
        }
    }

    /// Loads the two persisted panel flags, defaulting where absent.
    pub fn load_preferences(&self) -> Preferences {
        let defaults = Preferences::default();
        Preferences {
            sidebar_open: self
                .get_bool(SIDEBAR_OPEN_KEY)
                .unwrap_or(defaults.sidebar_open),
            preview_visible: self
                .get_bool(PREVIEW_VISIBLE_KEY)
                .unwrap_or(defaults.preview_visible),
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        let raw = self.store.lock().ok()?.get(key)?;
        raw.trim().parse().ok()
    }

    /// Persists one boolean preference flag.
    pub fn save_bool(&self, key: &str, value: bool) {
        match self.store.lock() {
            Ok(mut store) => {
                if let Err(e) = store.set(key, if value { "true" } else { "false" }) {
                    error!("Failed to persist {}: {}", key, e);
                }
            }
            Err(e) => error!("Failed to acquire lock on key-value store: {}", e),
        }
    }
}
