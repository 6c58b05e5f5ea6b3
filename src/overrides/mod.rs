//! Locally persisted position edits.
//!
//! Overrides live in a JSON document on disk under a namespacing key, the
//! shape being `{ "<key>": { "<note id>": { "position": {x, y, rotation} } } }`.
//! They only exist for privileged sessions: with a read-only [`Capability`]
//! loading yields nothing, saving does nothing and merging is the identity,
//! so viewers always see the sheet layout.
//!
//! Writes go through a temp file in the same directory and are serialised by a
//! mutex. Last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::capability::Capability;
use crate::models::{FeedSnapshot, PartialPosition, Position};

/// Storage key used by the board's admin overrides.
pub const DEFAULT_STORAGE_KEY: &str = "weekly_fridge_admin_overrides_v2";

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("Failed to access override store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode overrides: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace override store: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// One note's persisted edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(default, alias = "pos")]
    pub position: PartialPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// Overrides by note id.
pub type OverrideMap = BTreeMap<String, OverrideEntry>;

#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
    key: String,
    capability: Capability,
    lock: Arc<Mutex<()>>,
}

impl OverrideStore {
    pub fn open(path: impl Into<PathBuf>, capability: Capability) -> Self {
        Self::with_key(path, DEFAULT_STORAGE_KEY, capability)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>, capability: Capability) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            capability,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Current overrides. Empty when read-only, and when the store is
    /// missing, unreadable or corrupt. A corrupt store is left as is.
    pub fn load(&self) -> OverrideMap {
        if !self.capability.is_privileged() {
            return OverrideMap::new();
        }
        let _guard = self.lock.lock().expect("override store lock poisoned");
        self.read_overrides()
    }

    /// Upsert the full position for `id`. Other entries are untouched, even
    /// ones that cannot be read; a zone tag already stored for `id` is kept.
    /// No-op when read-only.
    pub fn save(&self, id: &str, position: Position) -> Result<(), OverrideError> {
        if !self.capability.is_privileged() {
            return Ok(());
        }
        let _guard = self.lock.lock().expect("override store lock poisoned");

        let mut document = self.read_document();
        let mut entries = match document.remove(&self.key) {
            Some(Value::Object(entries)) => entries,
            _ => Map::new(),
        };

        let mut entry: OverrideEntry = entries
            .remove(id)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        entry.position = position.into();
        entries.insert(id.to_string(), serde_json::to_value(&entry)?);

        document.insert(self.key.clone(), Value::Object(entries));
        self.write_document(&document)?;

        tracing::debug!(id, x = position.x, y = position.y, "Saved position override");
        Ok(())
    }

    /// Drop every override under this store's key. No-op when read-only.
    pub fn clear(&self) -> Result<(), OverrideError> {
        if !self.capability.is_privileged() {
            return Ok(());
        }
        let _guard = self.lock.lock().expect("override store lock poisoned");

        let mut document = self.read_document();
        if document.remove(&self.key).is_some() {
            self.write_document(&document)?;
            tracing::info!("Cleared position overrides");
        }
        Ok(())
    }

    /// Overlay stored overrides onto `feed`. Identity when read-only.
    pub fn merge(&self, feed: &FeedSnapshot) -> FeedSnapshot {
        if !self.capability.is_privileged() {
            return feed.clone();
        }
        merge_overrides(feed, &self.load())
    }

    /// Entries are decoded one by one so a bad entry only loses itself.
    fn read_overrides(&self) -> OverrideMap {
        let entries = match self.read_document().remove(&self.key) {
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                tracing::warn!("Ignoring malformed overrides in {}: {}", self.path.display(), other);
                return OverrideMap::new();
            }
            None => return OverrideMap::new(),
        };

        entries
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value(value) {
                Ok(entry) => Some((id, entry)),
                Err(e) => {
                    tracing::warn!(id = %id, "Skipping unreadable override: {}", e);
                    None
                }
            })
            .collect()
    }

    fn read_document(&self) -> Map<String, Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return Map::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Ignoring corrupt store {}: {}", self.path.display(), e);
                Map::new()
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), OverrideError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.persist(&self.path)?;
        Ok(())
    }
}

/// Pure overlay of `overrides` onto `feed`, returning a new snapshot.
///
/// Override fields win, unspecified fields keep the note's value, notes
/// without an override pass through. Applying it twice changes nothing.
pub fn merge_overrides(feed: &FeedSnapshot, overrides: &OverrideMap) -> FeedSnapshot {
    if overrides.is_empty() {
        return feed.clone();
    }

    let items = feed
        .items
        .iter()
        .map(|note| match overrides.get(&note.id) {
            Some(entry) => {
                let mut note = note.clone();
                note.position = note.position.overlay(&entry.position);
                if entry.zone.is_some() {
                    note.zone = entry.zone.clone();
                }
                note
            }
            None => note.clone(),
        })
        .collect();

    FeedSnapshot {
        items,
        ..feed.clone()
    }
}
