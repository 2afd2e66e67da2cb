use image::RgbaImage;
use scene_labs::{
    Error,
    data_structures::cubemap::{CubeFaces, FACE_COUNT},
};

const ZENITH: [u8; 3] = [0, 0, 255];
const HORIZON: [u8; 3] = [255, 255, 255];
const GROUND: [u8; 3] = [0, 255, 0];

fn rgb(image: &RgbaImage, x: u32, y: u32) -> [u8; 3] {
    let [r, g, b, _] = image.get_pixel(x, y).0;
    [r, g, b]
}

#[test]
fn six_equal_square_faces_are_accepted() {
    let cube = CubeFaces::new(vec![RgbaImage::new(8, 8); FACE_COUNT]).unwrap();
    assert_eq!(cube.size(), 8);
    assert_eq!(cube.faces().len(), FACE_COUNT);
}

#[test]
fn wrong_face_count_is_rejected() {
    assert!(matches!(
        CubeFaces::new(vec![RgbaImage::new(8, 8); 5]),
        Err(Error::InvalidCubemap(_))
    ));
}

#[test]
fn rectangular_faces_are_rejected() {
    assert!(matches!(
        CubeFaces::new(vec![RgbaImage::new(8, 4); FACE_COUNT]),
        Err(Error::InvalidCubemap(_))
    ));
}

#[test]
fn empty_faces_are_rejected() {
    assert!(matches!(
        CubeFaces::new(vec![RgbaImage::new(0, 0); FACE_COUNT]),
        Err(Error::InvalidCubemap(_))
    ));
}

#[test]
fn gradient_top_face_is_sky_and_bottom_face_is_ground() {
    let cube = CubeFaces::gradient(9, ZENITH, HORIZON, GROUND);
    // The centre pixels of +Y and -Y look straight up and down
    assert_eq!(rgb(&cube.faces()[2], 4, 4), ZENITH);
    assert_eq!(rgb(&cube.faces()[3], 4, 4), GROUND);
}

#[test]
fn gradient_side_faces_are_horizon_in_the_middle() {
    let cube = CubeFaces::gradient(9, ZENITH, HORIZON, GROUND);
    for face in [0, 1, 4, 5] {
        assert_eq!(rgb(&cube.faces()[face], 4, 4), HORIZON, "face {face}");
        // Top rows lean towards the sky, bottom rows towards the ground
        let [_, top_green, top_blue] = rgb(&cube.faces()[face], 4, 0);
        let [_, bottom_green, bottom_blue] = rgb(&cube.faces()[face], 4, 8);
        assert!(top_green < 255 && top_blue == 255, "face {face}");
        assert!(bottom_blue < 255 && bottom_green == 255, "face {face}");
    }
}

#[test]
fn gradient_size_is_at_least_one_pixel() {
    let cube = CubeFaces::gradient(0, ZENITH, HORIZON, GROUND);
    assert_eq!(cube.size(), 1);
    assert!(cube.faces().iter().all(|face| face.dimensions() == (1, 1)));
}
