//! A decoded camera frame

use crate::utils::ImageUtils;
use crate::Result;
use image::RgbImage;

/// One camera frame, kept both decoded and in its original encoding
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    pub encoded: Vec<u8>,
}

impl Frame {
    /// Decode the bytes served by the camera
    pub fn decode(encoded: Vec<u8>) -> Result<Self> {
        let image = ImageUtils::decode_rgb(&encoded)?;
        Ok(Self { image, encoded })
    }

    /// Wrap an in-memory image, encoding it as JPEG
    pub fn from_image(image: RgbImage) -> Result<Self> {
        let encoded = ImageUtils::encode_jpeg(&image)?;
        Ok(Self { image, encoded })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
