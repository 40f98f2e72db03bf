// SPDX-License-Identifier: GPL-3.0-only

//! Name validation and auto-naming
//!
//! Names are unique case-insensitively across the gallery. The check runs
//! before a capture or save commits; the store itself stays a pure
//! append/remove structure. Check-then-insert is not atomic, but only one
//! capture flow is ever active at a time.

use crate::gallery::GalleryStore;
use chrono::{DateTime, SecondsFormat, Utc};

/// Check whether a name may be committed to the store
///
/// An empty or whitespace-only name is always valid - it will be
/// auto-named on commit. A non-empty name is valid iff no existing record's
/// name matches it case-insensitively.
pub fn validate(name: &str, store: &GalleryStore) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return true;
    }

    let lowered = trimmed.to_lowercase();
    !store
        .images()
        .iter()
        .any(|image| image.name.to_lowercase() == lowered)
}

/// Generate an automatic name from a timestamp
///
/// Produces `image_<ISO-8601>` with colons replaced by hyphens so the name
/// stays filesystem-safe.
pub fn auto_name(at: DateTime<Utc>) -> String {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("image_{}", stamp.replace(':', "-"))
}

/// Resolve a user-supplied name to the name that will be committed
///
/// Returns the trimmed name, or an auto-generated one when the input is
/// empty after trimming. The flag reports whether auto-naming kicked in so
/// the caller can reset its input field only in that case.
pub fn resolve(name: &str) -> (String, bool) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        (auto_name(Utc::now()), true)
    } else {
        (trimmed.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::ImageRecord;

    fn store_with(names: &[&str]) -> GalleryStore {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GalleryStore::load(dir.path().join("gallery.json"));
        for name in names.iter().rev() {
            store.add(ImageRecord::new(*name, "data:image/jpeg;base64,"));
        }
        store
    }

    #[test]
    fn test_existing_names_are_rejected_case_insensitively() {
        let store = store_with(&["A"]);
        assert!(!validate("A", &store));
        assert!(!validate("a", &store));
        assert!(!validate("  a  ", &store));
        assert!(validate("B", &store));
    }

    #[test]
    fn test_empty_and_whitespace_names_are_always_valid() {
        let store = store_with(&["A"]);
        assert!(validate("", &store));
        assert!(validate("   ", &store));
        assert!(validate("\t\n", &store));
    }

    #[test]
    fn test_auto_name_has_no_colons() {
        let at = "2024-05-01T12:34:56.789Z".parse::<DateTime<Utc>>().unwrap();
        let name = auto_name(at);
        assert_eq!(name, "image_2024-05-01T12-34-56.789Z");
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_resolve_trims_and_flags_auto_naming() {
        let (name, auto) = resolve("  Holiday  ");
        assert_eq!(name, "Holiday");
        assert!(!auto);

        let (name, auto) = resolve("   ");
        assert!(name.starts_with("image_"));
        assert!(auto);
    }
}
