// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion utilities for the V4L2 frame source
//!
//! Webcams commonly deliver YUYV, MJPG, or RGB3 buffers; the photo pipeline
//! works on RGBA. Every converter here produces a full-alpha RGBA buffer of
//! exactly `width * height * 4` bytes.

use crate::errors::CaptureError;

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        // Convert YUV to RGB (BT.601)
        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

            rgba.push(r);
            rgba.push(g);
            rgba.push(b);
            rgba.push(255);

            if rgba.len() >= pixel_count * 4 {
                break;
            }
        }

        if rgba.len() >= pixel_count * 4 {
            break;
        }
    }

    // Short buffers pad with opaque black rather than panicking
    rgba.resize(pixel_count * 4, 0);
    for px in rgba.chunks_exact_mut(4) {
        px[3] = 255;
    }

    rgba
}

/// Convert packed RGB24 to RGBA
pub fn rgb24_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(3).take(pixel_count) {
        rgba.push(chunk[0]);
        rgba.push(chunk[1]);
        rgba.push(chunk[2]);
        rgba.push(255);
    }

    rgba.resize(pixel_count * 4, 0);
    for px in rgba.chunks_exact_mut(4) {
        px[3] = 255;
    }

    rgba
}

/// Decode an MJPG buffer to RGBA
///
/// MJPG frames are self-describing JPEG images; the decoded dimensions are
/// trusted over the negotiated ones.
pub fn mjpg_to_rgba(data: &[u8]) -> Result<(u32, u32, Vec<u8>), CaptureError> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CaptureError::ProcessingFailed(format!("MJPG decode failed: {}", e)))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_produces_full_alpha_rgba() {
        // 2x2 mid-gray frame: Y=128, U=V=128 (no chroma)
        let data = vec![128u8; 2 * 2 * 2];
        let rgba = yuyv_to_rgba(&data, 2, 2);

        assert_eq!(rgba.len(), 2 * 2 * 4);
        for px in rgba.chunks_exact(4) {
            assert_eq!(px[0], 128);
            assert_eq!(px[1], 128);
            assert_eq!(px[2], 128);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_yuyv_short_buffer_pads() {
        let rgba = yuyv_to_rgba(&[128, 128, 128, 128], 2, 2);
        assert_eq!(rgba.len(), 2 * 2 * 4);
        // All pixels opaque, including the padded ones
        for px in rgba.chunks_exact(4) {
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_rgb24_to_rgba() {
        let data = vec![10, 20, 30, 40, 50, 60];
        let rgba = rgb24_to_rgba(&data, 2, 1);
        assert_eq!(rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }
}
