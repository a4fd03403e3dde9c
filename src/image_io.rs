//! Loading and saving carriers.
//!
//! Images are decoded by the `image` crate and normalised to 8-bit RGB; raw
//! carriers are read and written verbatim.

use crate::error::{Result, StegoError};
use image::{ImageFormat, RgbImage};
use log::{debug, warn};
use std::path::Path;

/// Load an image in any supported format as 8-bit RGB
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)
        .map_err(|e| StegoError::Image(format!("{}: {}", path.display(), e)))?
        .to_rgb8();
    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Save an RGB image, format chosen by the file extension.
///
/// Lossy formats are written with a warning; `hide` refuses them unless asked.
pub fn save_rgb(path: &Path, image: &RgbImage) -> Result<()> {
    if is_lossy(path) {
        warn!(
            "{} uses a lossy format; hidden bits will not survive encoding",
            path.display()
        );
    }
    image
        .save(path)
        .map_err(|e| StegoError::Image(format!("{}: {}", path.display(), e)))?;
    debug!("saved {}", path.display());
    Ok(())
}

/// Whether the extension maps to a lossy image format
pub fn is_lossy(path: &Path) -> bool {
    matches!(
        ImageFormat::from_path(path),
        Ok(ImageFormat::Jpeg) | Ok(ImageFormat::WebP) | Ok(ImageFormat::Avif)
    )
}

/// Read a raw carrier file
pub fn load_raw(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    debug!("loaded {} raw bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Write a raw carrier file
pub fn save_raw(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)?;
    debug!("wrote {} raw bytes to {}", data.len(), path.display());
    Ok(())
}
