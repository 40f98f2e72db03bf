// SPDX-License-Identifier: GPL-3.0-only

//! Image store
//!
//! The gallery is an ordered collection of saved image records, persisted as
//! a single JSON document. The store is the only writer of that document;
//! it exposes exactly two mutations (add, remove) and everything else reads
//! snapshots.
//!
//! Persistence is best-effort: write failures are logged and swallowed, and
//! a malformed document on load falls back to an empty collection rather
//! than failing startup.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// A persisted gallery entry
///
/// Immutable once created; destroyed only by explicit deletion. `id` is
/// used for identity and removal, never for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique record id
    pub id: String,
    /// Display name, unique case-insensitively across the store
    pub name: String,
    /// Encoded image payload as a JPEG data URL
    pub src: String,
    /// Creation time, ISO-8601
    pub timestamp: String,
}

impl ImageRecord {
    /// Create a record with a fresh id and the current timestamp
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            src: src.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Ordered, persisted collection of [`ImageRecord`]s, most recent first
#[derive(Debug)]
pub struct GalleryStore {
    images: Vec<ImageRecord>,
    path: PathBuf,
}

impl GalleryStore {
    /// Load the gallery from the given path
    ///
    /// A missing document yields an empty gallery. A malformed document is
    /// logged and also yields an empty gallery - the parse failure never
    /// propagates past this boundary.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let images = match std::fs::read_to_string(&path) {
            Ok(payload) => match serde_json::from_str(&payload) {
                Ok(images) => images,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Malformed gallery document, starting empty");
                    Vec::new()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %err, "Failed to read gallery document");
                }
                Vec::new()
            }
        };

        debug!(path = %path.display(), count = images.len(), "Gallery loaded");
        Self { images, path }
    }

    /// Prepend a record and persist the full collection
    pub fn add(&mut self, record: ImageRecord) {
        debug!(id = %record.id, name = %record.name, "Adding image");
        self.images.insert(0, record);
        self.persist();
    }

    /// Remove the record with the given id and persist; no-op if absent
    pub fn remove(&mut self, id: &str) {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        if self.images.len() != before {
            debug!(id = %id, "Removed image");
            self.persist();
        }
    }

    /// Snapshot of all records, most recent first
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// The `n` most recent records
    pub fn recent(&self, n: usize) -> &[ImageRecord] {
        &self.images[..n.min(self.images.len())]
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Look up a record by name, using the same case-insensitive match as
    /// the uniqueness guard
    pub fn find_by_name(&self, name: &str) -> Option<&ImageRecord> {
        let lowered = name.to_lowercase();
        self.images
            .iter()
            .find(|image| image.name.to_lowercase() == lowered)
    }

    /// Path of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the collection to disk; failures are logged and swallowed
    fn persist(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            error!(path = %self.path.display(), error = %err, "Failed to create gallery directory");
            return;
        }

        let payload = match serde_json::to_string(&self.images) {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "Failed to serialize gallery");
                return;
            }
        };

        if let Err(err) = std::fs::write(&self.path, payload) {
            error!(path = %self.path.display(), error = %err, "Failed to persist gallery");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            name: name.to_string(),
            src: "data:image/jpeg;base64,".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn empty_store() -> GalleryStore {
        let dir = tempfile::tempdir().unwrap();
        GalleryStore::load(dir.path().join("gallery.json"))
    }

    #[test]
    fn test_add_prepends() {
        let mut store = empty_store();
        store.add(record("1", "A"));
        store.add(record("2", "B"));

        let names: Vec<_> = store.images().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = empty_store();
        store.add(record("1", "A"));
        store.add(record("2", "B"));

        store.remove("1");
        let after_first: Vec<_> = store.images().to_vec();
        store.remove("1");
        assert_eq!(store.images(), after_first.as_slice());
        assert_eq!(store.images().len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = empty_store();
        store.add(record("1", "A"));
        store.remove("nope");
        assert_eq!(store.images().len(), 1);
    }

    #[test]
    fn test_recent_caps_at_length() {
        let mut store = empty_store();
        store.add(record("1", "A"));
        store.add(record("2", "B"));

        assert_eq!(store.recent(4).len(), 2);
        assert_eq!(store.recent(1)[0].name, "B");
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let mut store = empty_store();
        store.add(record("1", "Holiday"));
        assert!(store.find_by_name("holiday").is_some());
        assert!(store.find_by_name("HOLIDAY").is_some());
        assert!(store.find_by_name("work").is_none());
    }
}
