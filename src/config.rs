//! Demo configuration.
//!
//! Defaults reproduce the hierarchy lab. A few fields can be overridden from
//! the environment:
//!
//! | variable           | field          |
//! |--------------------|----------------|
//! | `LAB_ASSET_DIR`    | `asset_dir`    |
//! | `LAB_HEIGHTMAP`    | `heightmap`    |
//! | `LAB_HEIGHT_SCALE` | `height_scale` |
//! | `LAB_ROOT_MESH`    | `root_mesh`    |
//! | `LAB_CHILD_MESH`   | `child_mesh`   |
//! | `LAB_DIFFUSE_MAP`  | `diffuse_map`  |
//! | `LAB_SPECULAR_MAP` | `specular_map` |
//! | `LAB_SKYBOX_DIR`   | `skybox_dir`   |
//!
//! An empty `LAB_DIFFUSE_MAP`, `LAB_SPECULAR_MAP` or `LAB_SKYBOX_DIR`
//! switches that feature off.

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct LabConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub asset_dir: PathBuf,
    pub root_mesh: String,
    pub child_mesh: String,
    pub heightmap: String,
    /// Heights span `[-height_scale / 2, height_scale / 2]`.
    pub height_scale: f32,
    /// World-space size of the terrain's longer side.
    pub terrain_extent: f32,
    /// Colour map modulating ambient and diffuse light; white when `None`.
    pub diffuse_map: Option<String>,
    /// Intensity map modulating specular light; white when `None`.
    pub specular_map: Option<String>,
    /// Folder under `asset_dir` holding the skybox faces; no skybox when `None`.
    pub skybox_dir: Option<String>,
    /// Face files in `+X, -X, +Y, -Y, +Z, -Z` order.
    pub skybox_faces: [String; 6],
    /// Whether keyboard input also drives the fly camera.
    pub camera_keys: bool,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            title: "Scene Labs".to_string(),
            width: 800,
            height: 600,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            asset_dir: PathBuf::from("./assets"),
            root_mesh: "steyerdorf.obj".to_string(),
            child_mesh: "x1014_boxcar.obj".to_string(),
            heightmap: "heightmap.bmp".to_string(),
            height_scale: 20.0,
            terrain_extent: 5.0,
            diffuse_map: Some("hat.jpg".to_string()),
            specular_map: Some("container2.jpg".to_string()),
            skybox_dir: Some("sor_hills".to_string()),
            skybox_faces: [
                "hills_lf.JPG",
                "hills_rt.JPG",
                "hills_up.JPG",
                "hills_dn.JPG",
                "hills_ft.JPG",
                "hills_bk.JPG",
            ]
            .map(String::from),
            camera_keys: true,
        }
    }
}

impl LabConfig {
    /// Defaults overlaid with the `LAB_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unparsable numbers are logged and skipped.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("LAB_ASSET_DIR") {
            self.asset_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("LAB_HEIGHTMAP") {
            self.heightmap = file;
        }
        if let Some(file) = lookup("LAB_ROOT_MESH") {
            self.root_mesh = file;
        }
        if let Some(file) = lookup("LAB_CHILD_MESH") {
            self.child_mesh = file;
        }
        if let Some(file) = lookup("LAB_DIFFUSE_MAP") {
            self.diffuse_map = non_empty(file);
        }
        if let Some(file) = lookup("LAB_SPECULAR_MAP") {
            self.specular_map = non_empty(file);
        }
        if let Some(dir) = lookup("LAB_SKYBOX_DIR") {
            self.skybox_dir = non_empty(dir);
        }
        if let Some(raw) = lookup("LAB_HEIGHT_SCALE") {
            match raw.trim().parse::<f32>() {
                Ok(scale) if scale.is_finite() => self.height_scale = scale,
                _ => log::warn!("ignoring LAB_HEIGHT_SCALE={raw:?}: not a finite number"),
            }
        }
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
