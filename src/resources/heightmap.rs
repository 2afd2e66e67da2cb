use std::path::Path;

use image::GrayImage;

use crate::{
    data_structures::terrain::HeightField,
    error::Result,
    resources::load_image,
};

/// Decodes an image file (PNG, JPEG or BMP) and converts it to 8-bit luma.
pub fn load_gray_image(path: impl AsRef<Path>) -> Result<GrayImage> {
    Ok(load_image(path)?.into_luma8())
}

/// Builds terrain from a grayscale heightmap: one cell per pixel, pixel
/// columns along `x` and rows along `z`.
pub fn load_heightmap(path: impl AsRef<Path>, height_scale: f32) -> Result<HeightField> {
    let path = path.as_ref();
    let image = load_gray_image(path)?;
    log::info!(
        "loaded heightmap {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    HeightField::from_image(&image, height_scale)
}
