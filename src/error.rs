//! Error types shared by the scene core and the asset loaders.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grid coordinate ({x}, {z}) is outside the {width}x{length} height field")]
    IndexOutOfRange {
        x: usize,
        z: usize,
        width: usize,
        length: usize,
    },
    #[error("a height field needs at least one cell in each direction, got {width}x{length}")]
    InvalidDimensions { width: usize, length: usize },
    #[error("pixel buffer holds {actual} values but the grid needs {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },
    #[error("could not load mesh {path}: {reason}")]
    MeshLoadFailed { path: String, reason: String },
    #[error("could not load image {path}: {reason}")]
    ImageLoadFailed { path: String, reason: String },
    #[error("invalid cube map: {0}")]
    InvalidCubemap(String),
}
