//! Download artifact naming and PNG writing.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::codec;
use crate::error::MandalaError;

/// Derive the download filename for an inspiration word.
///
/// The word is lower-cased with whitespace runs collapsed to single
/// underscores, prefixed `mandala_` and suffixed `.png`.
#[must_use]
pub fn mandala_filename(word: &str) -> String {
    let normalized: Vec<String> =
        word.split_whitespace().map(str::to_lowercase).collect();
    format!("mandala_{}.png", normalized.join("_"))
}

/// Resolve the output path: use the explicit path or derive one from
/// the word in the current directory.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, word: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(mandala_filename(word)),
    }
}

/// Encode the image as PNG and write it to the given path.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<(), MandalaError> {
    let data = codec::encode_png(image)?;
    std::fs::write(path, data).map_err(MandalaError::Io)
}
