/// Writing frame buffers to image files
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use nalgebra::Vector3;

use crate::error::ExportError;

/// Convert a float color buffer (0..=255 per channel) into an 8-bit RGB image
///
/// Values are truncated 1:1 with no gamma; anything outside 0..=255 saturates.
pub fn to_rgb_image(
    buffer: &[Vector3<f32>],
    width: usize,
    height: usize,
) -> Result<RgbImage, ExportError> {
    let expected = width * height;
    if buffer.len() != expected {
        return Err(ExportError::BufferSize {
            expected,
            actual: buffer.len(),
        });
    }

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let c = buffer[y as usize * width + x as usize];
        Rgb([c.x as u8, c.y as u8, c.z as u8])
    }))
}

/// Save a float color buffer as a PNG
pub fn save_png(
    buffer: &[Vector3<f32>],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    let image = to_rgb_image(buffer, width, height)?;
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("wrote {}x{} frame to {}", width, height, path.display());
    Ok(())
}
