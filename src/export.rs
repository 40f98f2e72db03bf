// SPDX-License-Identifier: GPL-3.0-only

//! Gallery export
//!
//! Converts stored data-URL payloads back to binary and writes them out as
//! files. Used by the browsing surface only; the capture pipeline never
//! reads through this module.

use crate::errors::StorageError;
use crate::gallery::ImageRecord;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::info;

/// Split a data URL into its MIME type and decoded bytes
pub fn decode_data_url(src: &str) -> Result<(String, Vec<u8>), StorageError> {
    let (header, body) = src
        .split_once(',')
        .ok_or_else(|| StorageError::MalformedPayload("missing data URL separator".to_string()))?;

    let mime = header
        .strip_prefix("data:")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(|| StorageError::MalformedPayload("not a base64 data URL".to_string()))?;

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| StorageError::MalformedPayload(format!("base64 decode failed: {}", e)))?;

    Ok((mime.to_string(), bytes))
}

/// Write a record's image to `<name>.jpg` in the given directory
///
/// Returns the path of the written file.
pub fn export_image(record: &ImageRecord, dir: &Path) -> Result<PathBuf, StorageError> {
    let (_, bytes) = decode_data_url(&record.src)?;

    std::fs::create_dir_all(dir).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
    let path = dir.join(format!("{}.jpg", record.name));
    std::fs::write(&path, bytes).map_err(|e| StorageError::WriteFailed(e.to_string()))?;

    info!(path = %path.display(), "Image exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::encoding::to_data_url;

    #[test]
    fn test_decode_round_trip() {
        let bytes = vec![0xFF, 0xD8, 0x01, 0x02];
        let url = to_data_url(&bytes);
        let (mime, decoded) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        assert!(decode_data_url("nonsense").is_err());
        assert!(decode_data_url("data:image/jpeg;base64").is_err());
        assert!(decode_data_url("data:image/jpeg,plain").is_err());
        assert!(decode_data_url("data:image/jpeg;base64,???").is_err());
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let record = ImageRecord::new("snapshot", to_data_url(&[1, 2, 3]));

        let path = export_image(&record, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "snapshot.jpg");
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
