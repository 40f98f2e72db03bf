// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use std::sync::Arc;

/// Represents a camera device visible to the platform
///
/// Devices are enumerated from the platform, never created or destroyed by
/// this application. `device_id` is the V4L2 device path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Opaque device identifier (e.g. /dev/video0)
    pub device_id: String,
    /// Human-readable label, with a "Camera N" fallback when the platform
    /// withholds one
    pub label: String,
}

/// A single captured frame in RGBA format
///
/// The raster buffer between the frame source and the photo pipeline.
/// Pixel data is `width * height * 4` bytes with alpha fixed at 255 by
/// the format converters.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA bytes, shared without copying through the pipeline
    pub data: Arc<[u8]>,
}

impl CameraFrame {
    /// Create a frame from raw RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
        }
    }

    /// Expected byte length of the RGBA buffer
    pub fn expected_len(&self) -> usize {
        (self.width * self.height * 4) as usize
    }
}
