//! Image processing utilities using the image crate

use crate::Result;
use anyhow::Context;
use image::{imageops::FilterType, ImageFormat, RgbImage};
use std::io::Cursor;

/// Image utility functions for camera frames
pub struct ImageUtils;

impl ImageUtils {
    /// Decode encoded image bytes (JPEG from the camera) into RGB
    pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
        let img = image::load_from_memory(bytes).context("Failed to decode image bytes")?;
        Ok(img.to_rgb8())
    }

    /// Encode RGB image as JPEG
    pub fn encode_jpeg(rgb_image: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        rgb_image
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .context("Failed to encode JPEG")?;
        Ok(buffer.into_inner())
    }

    /// Resize to a `size` x `size` square, scale to [0, 1] and lay out
    /// channel-planar (CHW, RGB order), as darknet-style detectors expect
    pub fn to_blob(rgb_image: &RgbImage, size: u32) -> Vec<f32> {
        let resized = image::imageops::resize(rgb_image, size, size, FilterType::Triangle);
        let plane = (size * size) as usize;
        let mut blob = vec![0.0f32; 3 * plane];

        for (x, y, pixel) in resized.enumerate_pixels() {
            let idx = (y * size + x) as usize;
            for c in 0..3 {
                blob[c * plane + idx] = pixel[c] as f32 / 255.0;
            }
        }

        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() -> Result<()> {
        let rgb_img = RgbImage::new(64, 48);

        let bytes = ImageUtils::encode_jpeg(&rgb_img)?;
        let decoded = ImageUtils::decode_rgb(&bytes)?;

        assert_eq!(rgb_img.dimensions(), decoded.dimensions());
        Ok(())
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(ImageUtils::decode_rgb(b"not an image").is_err());
    }

    #[test]
    fn test_blob_layout() {
        let rgb_img = RgbImage::from_pixel(8, 8, image::Rgb([255, 0, 51]));

        let blob = ImageUtils::to_blob(&rgb_img, 4);
        assert_eq!(blob.len(), 3 * 16);
        assert!(blob[..16].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(blob[16..32].iter().all(|&v| v.abs() < 1e-6));
        assert!(blob[32..].iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }
}
