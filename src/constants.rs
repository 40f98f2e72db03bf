// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::path::PathBuf;
use std::time::Duration;

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "webcam-gallery";

/// File name of the persisted gallery collection (single JSON document)
pub const GALLERY_FILE_NAME: &str = "gallery.json";

/// File name of the persisted capture settings
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Default capture resolution (width, height)
pub const DEFAULT_RESOLUTION: (u32, u32) = (1280, 720);

/// Resolution presets offered by the settings surface
pub const RESOLUTION_PRESETS: [(u32, u32); 3] = [(640, 480), (1280, 720), (1920, 1080)];

/// Default JPEG quality in percent
pub const DEFAULT_QUALITY_PERCENT: u32 = 80;

/// Lowest recognized quality setting
pub const QUALITY_MIN_PERCENT: u32 = 10;

/// Highest recognized quality setting
pub const QUALITY_MAX_PERCENT: u32 = 100;

/// Step between recognized quality settings
pub const QUALITY_STEP_PERCENT: u32 = 10;

/// Number of mmap buffers requested for the capture stream
pub const STREAM_BUFFER_COUNT: u32 = 4;

/// How long stream acquisition waits for the first frame to arrive
pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval while waiting for the first frame
pub const FIRST_FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Default path of the persisted gallery document
pub fn default_gallery_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(GALLERY_FILE_NAME)
}

/// Default path of the persisted settings document
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

/// Default directory for exported images
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_steps_cover_range() {
        assert_eq!(QUALITY_MIN_PERCENT % QUALITY_STEP_PERCENT, 0);
        assert_eq!(QUALITY_MAX_PERCENT % QUALITY_STEP_PERCENT, 0);
        assert!(QUALITY_MIN_PERCENT < QUALITY_MAX_PERCENT);
    }

    #[test]
    fn test_default_resolution_is_a_preset() {
        assert!(RESOLUTION_PRESETS.contains(&DEFAULT_RESOLUTION));
    }
}
