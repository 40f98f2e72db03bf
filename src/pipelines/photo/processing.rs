// SPDX-License-Identifier: GPL-3.0-only

//! Frame post-processing
//!
//! Filters are applied directly on the RGBA data before the alpha channel
//! is dropped for encoding, so the whole-buffer transform runs exactly once
//! per capture.

use crate::backends::camera::types::CameraFrame;
use crate::config::FilterType;
use crate::errors::CaptureError;
use image::RgbImage;

/// Apply the configured filter and convert the frame to an RGB image
pub fn process(frame: &CameraFrame, filter: FilterType) -> Result<RgbImage, CaptureError> {
    let mut rgba = frame.data.to_vec();

    if filter == FilterType::Grayscale {
        apply_grayscale(&mut rgba);
    }

    rgba_to_rgb(&rgba, frame.width, frame.height)
}

/// In-place unweighted-mean grayscale
///
/// Each pixel's red/green/blue channels are replaced with the arithmetic
/// mean of the original three; the alpha channel is untouched.
pub fn apply_grayscale(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let avg = ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8;
        px[0] = avg;
        px[1] = avg;
        px[2] = avg;
    }
}

/// Convert RGBA data to an RGB image (drop alpha channel)
pub fn rgba_to_rgb(rgba: &[u8], width: u32, height: u32) -> Result<RgbImage, CaptureError> {
    let expected = (width * height * 4) as usize;
    if rgba.len() < expected {
        return Err(CaptureError::ProcessingFailed(format!(
            "RGBA data too small: expected {}, got {}",
            expected,
            rgba.len()
        )));
    }

    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .take((width * height) as usize)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
        CaptureError::ProcessingFailed("failed to build RGB image from frame".to_string())
    })
}
