//! In-memory image decode and PNG re-encode.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::error::MandalaError;

/// Decode raw fetched bytes into an in-memory image.
///
/// # Errors
///
/// Returns [`MandalaError::Decode`] if the bytes are not a valid image.
pub fn decode(data: &[u8]) -> Result<DynamicImage, MandalaError> {
    image::load_from_memory(data)
        .map_err(|e| MandalaError::Decode(format!("fetched bytes are not a valid image: {e}")))
}

/// Encode a decoded image as a PNG byte buffer with default settings.
///
/// # Errors
///
/// Returns [`MandalaError::Decode`] if the encoder fails, which does not
/// happen for images produced by [`decode`].
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, MandalaError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| MandalaError::Decode(format!("failed to encode PNG: {e}")))?;
    Ok(buffer.into_inner())
}
