// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the gallery store and naming guard

use webcam_gallery::gallery::{GalleryStore, ImageRecord};
use webcam_gallery::naming;

fn record(id: &str, name: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        name: name.to_string(),
        src: "data:image/jpeg;base64,AAEC".to_string(),
        timestamp: "2024-05-01T12:00:00.000Z".to_string(),
    }
}

#[test]
fn test_persistence_round_trip_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.json");

    let mut store = GalleryStore::load(&path);
    store.add(record("1", "A"));
    store.add(record("2", "B"));
    store.add(record("3", "C"));

    let reloaded = GalleryStore::load(&path);
    assert_eq!(reloaded.images(), store.images());

    let names: Vec<_> = reloaded.images().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["C", "B", "A"]);
}

#[test]
fn test_malformed_document_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.json");
    std::fs::write(&path, "[{\"id\": truncated").unwrap();

    let store = GalleryStore::load(&path);
    assert!(store.images().is_empty());
}

#[test]
fn test_remove_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.json");

    let mut store = GalleryStore::load(&path);
    store.add(record("1", "A"));
    store.add(record("2", "B"));
    store.remove("2");

    let reloaded = GalleryStore::load(&path);
    assert_eq!(reloaded.images().len(), 1);
    assert_eq!(reloaded.images()[0].name, "A");
}

// The validate/add scenario from the store contract: "a" collides with "A"
// case-insensitively, "B" is free, and adding prepends.
#[test]
fn test_validate_then_add_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = GalleryStore::load(dir.path().join("gallery.json"));
    store.add(record("1", "A"));

    assert!(!naming::validate("a", &store));
    assert!(naming::validate("B", &store));

    store.add(record("2", "B"));
    let ids: Vec<_> = store.images().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["2", "1"]);
}
