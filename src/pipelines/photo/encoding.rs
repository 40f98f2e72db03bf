// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! Captured frames are encoded to JPEG with the configured quality and
//! wrapped in a base64 data URL, which is the payload the gallery persists.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use tracing::debug;

use crate::errors::CaptureError;

/// MIME type of encoded capture payloads
pub const IMAGE_MIME: &str = "image/jpeg";

/// Map a 10-100 percent quality setting to the encoder parameter in [0.10, 1.00]
pub fn quality_fraction(quality_percent: u32) -> f32 {
    quality_percent as f32 / 100.0
}

/// Encode an RGB image as JPEG at the given quality percent
pub fn encode_jpeg(image: &RgbImage, quality_percent: u32) -> Result<Vec<u8>, CaptureError> {
    let quality = (quality_fraction(quality_percent) * 100.0).round() as u8;

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CaptureError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    debug!(size = buffer.len(), quality, "Encoded JPEG");
    Ok(buffer)
}

/// Wrap encoded image bytes in a base64 data URL
pub fn to_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", IMAGE_MIME, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_fraction_range() {
        assert_eq!(quality_fraction(10), 0.10);
        assert_eq!(quality_fraction(100), 1.00);
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg_magic() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([128, 64, 32]));
        let bytes = encode_jpeg(&image, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_data_url_shape() {
        let url = to_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let body = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        assert_eq!(STANDARD.decode(body).unwrap(), vec![1, 2, 3]);
    }
}
