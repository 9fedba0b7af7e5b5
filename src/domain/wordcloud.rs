//! Decoded word-cloud image

use image::imageops::FilterType;
use image::RgbImage;

/// Longest edge of the preview raster kept in memory; the terminal never
/// shows more than a few hundred half-block pixels anyway.
const PREVIEW_MAX_EDGE: u32 = 320;

#[derive(Debug, thiserror::Error)]
pub enum WordcloudError {
    #[error("empty image body")]
    Empty,
    #[error("not a decodable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A word-cloud image as downloaded from the backend
#[derive(Debug, Clone)]
pub struct WordcloudImage {
    /// Raw bytes, kept so the image can be saved unchanged
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Downscaled RGB raster used for terminal rendering
    pub preview: RgbImage,
}

impl WordcloudImage {
    pub fn decode(bytes: Vec<u8>, content_type: Option<String>) -> Result<Self, WordcloudError> {
        if bytes.is_empty() {
            return Err(WordcloudError::Empty);
        }
        let decoded = image::load_from_memory(&bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        let preview = if width.max(height) > PREVIEW_MAX_EDGE {
            decoded
                .resize(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE, FilterType::Triangle)
                .to_rgb8()
        } else {
            decoded.to_rgb8()
        };

        Ok(Self {
            bytes,
            content_type,
            width,
            height,
            preview,
        })
    }

    pub fn size_label(&self) -> String {
        format!("{}x{} ({} KB)", self.width, self.height, self.bytes.len().div_ceil(1024))
    }
}
