// SPDX-License-Identifier: GPL-3.0-only

//! Device registry
//!
//! Single owner of the known camera list and the capture configuration.
//! Other components read snapshots; mutations go through [`DeviceRegistry::refresh`]
//! and [`DeviceRegistry::update_settings`].

use super::enumeration::enumerate_cameras;
use super::types::CameraDevice;
use crate::config::{CaptureSettings, SettingsUpdate};
use crate::errors::CameraError;
use tracing::{debug, info};

/// Registry of available camera devices and the active capture settings
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<CameraDevice>,
    settings: CaptureSettings,
}

impl DeviceRegistry {
    /// Create a registry with the given initial settings and no known devices
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            devices: Vec::new(),
            settings,
        }
    }

    /// Refresh the device list from the platform
    ///
    /// Requests capture access and enumerates all video-input devices. On
    /// success the available-device list is replaced with the fresh set; if
    /// nothing is selected yet and the list is non-empty, the first device
    /// becomes selected. On failure the previous list and selection are left
    /// untouched and the error is reported to the caller.
    pub async fn refresh(&mut self) -> Result<(), CameraError> {
        let discovered = tokio::task::spawn_blocking(enumerate_cameras)
            .await
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))??;

        self.apply_refresh(discovered);
        Ok(())
    }

    /// Replace the device list with a freshly enumerated set
    ///
    /// Split out of [`refresh`](Self::refresh) so the selection rules stay
    /// testable without camera hardware.
    pub fn apply_refresh(&mut self, discovered: Vec<CameraDevice>) {
        info!(count = discovered.len(), "Refreshed camera list");
        self.devices = discovered;

        if self.settings.selected_device_id.is_none()
            && let Some(first) = self.devices.first()
        {
            debug!(device = %first.device_id, "Auto-selecting first camera");
            self.settings.selected_device_id = Some(first.device_id.clone());
        }
    }

    /// Merge the given fields into the capture configuration
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
    }

    /// Snapshot of the current capture settings
    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Last-known device listing
    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    /// Look up a device by id in the last-known listing
    pub fn device(&self, device_id: &str) -> Option<&CameraDevice> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// The currently selected device, if the selection still resolves
    pub fn selected_device(&self) -> Option<&CameraDevice> {
        self.settings
            .selected_device_id
            .as_deref()
            .and_then(|id| self.device(id))
    }
}
