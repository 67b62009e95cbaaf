//! Loading the image reference list from disk.

use std::path::Path;

use crate::error::InputError;
use crate::types::ImageRef;

/// Read image references from a file.
///
/// References are separated by any whitespace. Order and duplicates are kept.
pub fn load_image_list(path: &Path) -> Result<Vec<ImageRef>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let images = parse_image_list(&content);
    tracing::debug!("Loaded {} image references from {:?}", images.len(), path);
    Ok(images)
}

/// Split text into image references on whitespace.
pub fn parse_image_list(content: &str) -> Vec<ImageRef> {
    content.split_whitespace().map(String::from).collect()
}
