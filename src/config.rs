// SPDX-License-Identifier: GPL-3.0-only

//! Capture settings owned by the device registry
//!
//! Settings are a single in-memory object with one owner. Updates go through
//! [`CaptureSettings::apply`] with a merge-style [`SettingsUpdate`]; every
//! other component only reads snapshots.

use crate::constants::{
    DEFAULT_QUALITY_PERCENT, DEFAULT_RESOLUTION, QUALITY_MAX_PERCENT, QUALITY_MIN_PERCENT,
    QUALITY_STEP_PERCENT,
};
use crate::errors::StorageError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Capture resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        let (width, height) = DEFAULT_RESOLUTION;
        Self { width, height }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Capture filter applied to the frame before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// No filter
    #[default]
    None,
    /// Unweighted-mean grayscale
    Grayscale,
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterType::None => write!(f, "none"),
            FilterType::Grayscale => write!(f, "grayscale"),
        }
    }
}

impl std::str::FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(FilterType::None),
            "grayscale" => Ok(FilterType::Grayscale),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

/// Process-wide capture configuration
///
/// `quality_percent` is always a member of the recognized step set
/// (10, 20, ..., 100); off-step updates snap to the nearest member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Requested capture resolution (the driver may substitute the nearest mode)
    pub resolution: Resolution,
    /// Filter applied at capture time
    pub filter: FilterType,
    /// JPEG quality in percent, 10-100 in steps of 10
    pub quality_percent: u32,
    /// Selected camera device path, if any
    pub selected_device_id: Option<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            filter: FilterType::None,
            quality_percent: DEFAULT_QUALITY_PERCENT,
            selected_device_id: None,
        }
    }
}

/// Merge-style partial update for [`CaptureSettings`]
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub resolution: Option<Resolution>,
    pub filter: Option<FilterType>,
    pub quality_percent: Option<u32>,
    pub selected_device_id: Option<String>,
}

impl CaptureSettings {
    /// Merge the given fields into the current configuration
    ///
    /// Synchronous, no suspension. Quality values snap to the recognized
    /// 10-percent steps.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(resolution) = update.resolution {
            self.resolution = resolution;
        }
        if let Some(filter) = update.filter {
            self.filter = filter;
        }
        if let Some(quality) = update.quality_percent {
            self.quality_percent = snap_quality(quality);
        }
        if let Some(device_id) = update.selected_device_id {
            self.selected_device_id = Some(device_id);
        }
    }

    /// Load settings from the given path
    ///
    /// A missing or malformed file falls back to defaults; the failure is
    /// logged and never propagated.
    pub fn load(path: &Path) -> Self {
        let payload = match std::fs::read_to_string(path) {
            Ok(payload) => payload,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %err, "Failed to read settings");
                }
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&payload) {
            Ok(mut settings) => {
                settings.quality_percent = snap_quality(settings.quality_percent);
                settings
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Malformed settings, using defaults");
                Self::default()
            }
        }
    }

    /// Persist settings to the given path as JSON
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }
        let payload = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        std::fs::write(path, payload).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

/// Snap a quality value to the nearest recognized step, clamped to range
pub fn snap_quality(quality: u32) -> u32 {
    let clamped = quality.clamp(QUALITY_MIN_PERCENT, QUALITY_MAX_PERCENT);
    let snapped = (clamped + QUALITY_STEP_PERCENT / 2) / QUALITY_STEP_PERCENT * QUALITY_STEP_PERCENT;
    snapped.clamp(QUALITY_MIN_PERCENT, QUALITY_MAX_PERCENT)
}
