use image::{GrayImage, Luma, Rgb, RgbImage};
use scene_labs::{Error, resources};

use crate::common::test_utils::{ScratchDir, fixture};

mod common;

#[test]
fn triangle_keeps_its_attributes() {
    let mesh = resources::load_mesh(fixture("triangle.obj")).unwrap();
    assert_eq!(mesh.name, "triangle");
    assert_eq!(mesh.point_count, 3);
    assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
    assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    // Texture v is flipped
    assert_eq!(mesh.tex_coords[2], [0.0, 0.0]);
}

#[test]
fn every_model_in_a_file_is_appended() {
    let mesh = resources::load_mesh(fixture("two_models.obj")).unwrap();
    // A triangulated quad followed by one triangle
    assert_eq!(mesh.point_count, 6 + 3);
    assert_eq!(mesh.positions.len(), mesh.point_count);
    assert_eq!(mesh.positions[8], [0.5, 2.0, 1.0]);
}

#[test]
fn missing_mesh_file_fails_with_its_path() {
    let path = fixture("does_not_exist.obj");
    let err = resources::load_mesh(&path).unwrap_err();
    match err {
        Error::MeshLoadFailed { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mesh_without_faces_is_rejected() {
    assert!(matches!(
        resources::load_mesh(fixture("no_faces.obj")),
        Err(Error::MeshLoadFailed { .. })
    ));
}

#[test]
fn heightmap_png_becomes_terrain() {
    let dir = ScratchDir::new("heightmap_png");
    let path = dir.join("ramp.png");
    let mut image = GrayImage::new(3, 2);
    image.put_pixel(0, 0, Luma([0]));
    image.put_pixel(2, 1, Luma([255]));
    image.save(&path).unwrap();

    let mut field = resources::load_heightmap(&path, 20.0).unwrap();
    assert_eq!((field.width(), field.length()), (3, 2));
    assert!((field.height(0, 0).unwrap() + 10.0).abs() < 1e-5);
    assert!((field.height(2, 1).unwrap() - 10.0).abs() < 1e-5);
    assert!(!field.is_dirty());
    assert!(field.normal(1, 1).is_ok());
}

#[test]
fn colour_images_are_converted_to_luma() {
    let dir = ScratchDir::new("colour_heightmap");
    let path = dir.join("white.png");
    RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]))
        .save(&path)
        .unwrap();

    let gray = resources::load_gray_image(&path).unwrap();
    assert_eq!(gray.dimensions(), (2, 2));
    assert!(gray.pixels().all(|p| p.0 == [255]));
}

#[test]
fn missing_heightmap_fails_with_image_error() {
    let err = resources::load_heightmap(fixture("no_such_heightmap.bmp"), 20.0).unwrap_err();
    assert!(matches!(err, Error::ImageLoadFailed { .. }), "{err}");
}

#[test]
fn undecodable_heightmap_fails_with_image_error() {
    let dir = ScratchDir::new("garbage_heightmap");
    let path = dir.join("garbage.png");
    std::fs::write(&path, b"definitely not an image").unwrap();

    assert!(matches!(
        resources::load_heightmap(&path, 1.0),
        Err(Error::ImageLoadFailed { .. })
    ));
}

#[test]
fn asset_path_joins_directory_and_file() {
    let path = resources::asset_path("assets", "heightmap.bmp");
    assert!(path.ends_with("assets/heightmap.bmp"));
}

#[test]
fn scratch_dirs_are_removed_on_drop() {
    let dir = ScratchDir::new("scratch_cleanup");
    std::fs::write(dir.join("leftover.txt"), b"left behind").unwrap();
    let path = dir.to_path_buf();
    assert!(path.exists());

    drop(dir);
    assert!(!path.exists());
}

const FACE_NAMES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

fn face_names() -> [String; 6] {
    FACE_NAMES.map(String::from)
}

fn write_faces(dir: &std::path::Path, size: u32) {
    for (i, name) in FACE_NAMES.iter().enumerate() {
        RgbImage::from_pixel(size, size, Rgb([i as u8 * 40, 0, 0]))
            .save(dir.join(name))
            .unwrap();
    }
}

#[test]
fn cubemap_faces_keep_their_order() {
    let dir = ScratchDir::new("cubemap_order");
    write_faces(&dir, 4);

    let cube = resources::load_cubemap(&*dir, &face_names()).unwrap();
    assert_eq!(cube.size(), 4);
    assert_eq!(cube.faces().len(), 6);
    for (i, face) in cube.faces().iter().enumerate() {
        assert_eq!(face.get_pixel(0, 0).0, [i as u8 * 40, 0, 0, 255]);
    }
}

#[test]
fn cubemap_with_a_missing_face_names_that_file() {
    let dir = ScratchDir::new("cubemap_missing");
    write_faces(&dir, 2);
    std::fs::remove_file(dir.join("ny.png")).unwrap();

    match resources::load_cubemap(&*dir, &face_names()).unwrap_err() {
        Error::ImageLoadFailed { path, .. } => assert!(path.ends_with("ny.png"), "{path}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cubemap_faces_must_match_in_size() {
    let dir = ScratchDir::new("cubemap_sizes");
    write_faces(&dir, 2);
    RgbImage::new(3, 3).save(dir.join("pz.png")).unwrap();

    assert!(matches!(
        resources::load_cubemap(&*dir, &face_names()),
        Err(Error::InvalidCubemap(_))
    ));
}

#[test]
fn colour_images_load_with_every_channel() {
    let dir = ScratchDir::new("rgba_image");
    let path = dir.join("teal.png");
    RgbImage::from_pixel(3, 1, Rgb([0, 128, 128])).save(&path).unwrap();

    let image = resources::load_image(&path).unwrap().into_rgba8();
    assert_eq!(image.dimensions(), (3, 1));
    assert_eq!(image.get_pixel(2, 0).0, [0, 128, 128, 255]);
}

#[test]
fn undecodable_texture_fails_with_image_error() {
    let dir = ScratchDir::new("garbage_texture");
    let path = dir.join("hat.jpg");
    std::fs::write(&path, b"not a jpeg either").unwrap();

    assert!(matches!(
        resources::load_image(&path),
        Err(Error::ImageLoadFailed { .. })
    ));
}
