use cgmath::{Point3, Vector3};
use scene_labs::pipelines::light::{
    DirectionalLightRaw, LightUniform, LightingSetup, MaterialRaw, POINT_LIGHT_COUNT,
    PointLightRaw, SpotLightRaw,
};

#[test]
fn uniform_layout_is_vec4_aligned() {
    assert_eq!(std::mem::size_of::<DirectionalLightRaw>(), 64);
    assert_eq!(std::mem::size_of::<PointLightRaw>(), 80);
    assert_eq!(std::mem::size_of::<SpotLightRaw>(), 112);
    assert_eq!(std::mem::size_of::<MaterialRaw>(), 48);
    assert_eq!(
        std::mem::size_of::<LightUniform>(),
        64 + 80 * POINT_LIGHT_COUNT + 112 + 48
    );
    assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);
}

#[test]
fn raw_uniform_packs_every_light() {
    let setup = LightingSetup::default();
    let raw = setup.to_raw();

    assert_eq!(raw.directional.direction, [-0.2, -1.0, -0.3, 0.0]);
    for (light, packed) in setup.points.iter().zip(&raw.points) {
        assert_eq!(
            packed.position,
            [light.position.x, light.position.y, light.position.z, 1.0]
        );
        assert_eq!(packed.attenuation, [1.0, 0.09, 0.032, 0.0]);
    }
    assert_eq!(raw.material.specular[3], 64.0);
    assert_eq!(bytemuck::bytes_of(&raw).len(), std::mem::size_of::<LightUniform>());
}

#[test]
fn spot_cutoffs_are_stored_as_cosines() {
    let raw = LightingSetup::default().to_raw();
    let inner = raw.spot.attenuation[3];
    let outer = raw.spot.outer_cutoff[0];
    assert!((inner - 12.5f32.to_radians().cos()).abs() < 1e-6);
    assert!((outer - 15f32.to_radians().cos()).abs() < 1e-6);
    // Wider cone, smaller cosine
    assert!(outer < inner);
}

#[test]
fn flashlight_follows_the_camera() {
    let mut setup = LightingSetup::default();
    setup.follow_camera(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, -4.0));
    assert_eq!(setup.spot.position, Point3::new(1.0, 2.0, 3.0));
    assert_eq!(setup.spot.direction, Vector3::new(0.0, 0.0, -1.0));

    // A degenerate direction keeps the previous one
    setup.follow_camera(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(setup.spot.direction, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn first_point_light_sits_near_the_train() {
    let setup = LightingSetup::default();
    assert_eq!(setup.points.len(), POINT_LIGHT_COUNT);
    assert_eq!(setup.points[0].position, Point3::new(0.7, 0.2, 2.0));
}
