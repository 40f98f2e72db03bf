// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera enumeration
//!
//! Walks the platform's video nodes and keeps only the ones with video
//! capture capability. Metadata-only nodes (UVC cameras typically expose
//! one capture node and one metadata node) are filtered out here.

use super::types::CameraDevice;
use crate::errors::CameraError;
use tracing::{debug, warn};
use v4l::capability::Flags;

/// Enumerate all video-input devices visible to the platform
///
/// Opening each node doubles as the capture access probe: a node the user
/// is not permitted to open fails the whole refresh with an access error so
/// the caller can keep its previous device list.
///
/// Returns the devices in node order. A system without cameras yields an
/// empty list, which is a successful result.
pub fn enumerate_cameras() -> Result<Vec<CameraDevice>, CameraError> {
    let mut nodes = v4l::context::enum_devices();
    nodes.sort_by_key(|node| node.index());

    let mut devices = Vec::new();

    for node in nodes {
        let path = node.path().to_string_lossy().to_string();

        let dev = match v4l::Device::with_path(node.path()) {
            Ok(dev) => dev,
            Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CameraError::AccessDenied);
            }
            Err(err) => {
                debug!(path = %path, error = %err, "Skipping unopenable video node");
                continue;
            }
        };

        let caps = match dev.query_caps() {
            Ok(caps) => caps,
            Err(err) => {
                warn!(path = %path, error = %err, "Capability query failed, skipping node");
                continue;
            }
        };

        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            debug!(path = %path, "Node has no capture capability, skipping");
            continue;
        }

        let card = caps.card.trim().to_string();
        let label = if !card.is_empty() {
            card
        } else if let Some(name) = node.name() {
            name
        } else {
            format!("Camera {}", devices.len() + 1)
        };

        debug!(path = %path, label = %label, "Found camera");
        devices.push(CameraDevice {
            device_id: path,
            label,
        });
    }

    Ok(devices)
}
