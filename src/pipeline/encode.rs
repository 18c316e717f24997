//! Image encoding: rasterised pages → JPEG bytes, payloads → base64 `ImageData`.
//!
//! Rasterised pages are re-encoded as JPEG before they are attached to the
//! prompt. At 2× magnification a lecture page is a few megapixels; JPEG keeps
//! a multi-page PDF well under the inline-data limit of vision APIs while
//! handwriting stays legible.

use crate::model::ImagePayload;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as JPEG.
///
/// pdfium hands back RGBA bitmaps and the JPEG encoder rejects an alpha
/// channel, so the image is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    debug!(
        "Encoded {}x{} page → {} bytes JPEG",
        rgb.width(),
        rgb.height(),
        buf.len()
    );
    Ok(buf)
}

impl ImagePayload {
    /// Wrap the payload as a base64 inline image for the model request.
    pub fn to_image_data(&self) -> ImageData {
        ImageData::new(STANDARD.encode(&self.data), self.mime.as_str())
    }
}
