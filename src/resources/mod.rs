//! Loading meshes, heightmaps, textures and skybox faces from files.
//!
//! Paths are used as given; [`asset_path`] builds them from the configured
//! asset directory. Loaders are synchronous and run once at start-up.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub mod heightmap;
pub mod mesh;
pub mod texture;

pub use heightmap::{load_gray_image, load_heightmap};
pub use mesh::load_mesh;
pub use texture::{load_cubemap, load_image, load_texture};

pub fn asset_path(dir: impl AsRef<Path>, file_name: &str) -> PathBuf {
    dir.as_ref().join(file_name)
}

pub fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}
