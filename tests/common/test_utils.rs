#![allow(dead_code)]

use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use cgmath::{Matrix4, Vector3};

pub(crate) const EPSILON: f32 = 1e-5;

pub(crate) fn assert_mat_near(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let (a, e): ([[f32; 4]; 4], [[f32; 4]; 4]) = (actual.into(), expected.into());
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (a[col][row] - e[col][row]).abs() < EPSILON,
                "element [{col}][{row}]: {} != {}\nactual:   {actual:?}\nexpected: {expected:?}",
                a[col][row],
                e[col][row],
            );
        }
    }
}

pub(crate) fn assert_vec_near(actual: Vector3<f32>, expected: Vector3<f32>) {
    let diff = actual - expected;
    assert!(
        diff.x.abs() < EPSILON && diff.y.abs() < EPSILON && diff.z.abs() < EPSILON,
        "{actual:?} != {expected:?}"
    );
}

pub(crate) fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A fresh directory under the system temp dir, unique per test and process.
/// Removed with its contents when dropped, also when the test panics.
pub(crate) struct ScratchDir(PathBuf);

impl ScratchDir {
    pub(crate) fn new(test_name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "scene-labs-{test_name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir is writable");
        Self(dir)
    }
}

impl Deref for ScratchDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
