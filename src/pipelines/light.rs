//! Typed light and material parameters for the multi-light Phong shader.
//!
//! Each light kind is a plain struct; [`LightingSetup::to_raw`] packs the whole
//! setup into the std140-compatible [`LightUniform`] uploaded to group 0.

use cgmath::{Deg, InnerSpace, Point3, Vector3};

pub const POINT_LIGHT_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    /// Roughly a 50 unit falloff range.
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(-0.2, -1.0, -0.3),
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.4, 0.4, 0.4),
            specular: Vector3::new(0.5, 0.5, 0.5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::default(),
        }
    }
}

/// A cone light. Full intensity inside `inner`, fading to zero at `outer`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
    pub inner: Deg<f32>,
    pub outer: Deg<f32>,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            direction: -Vector3::unit_z(),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::default(),
            inner: Deg(12.5),
            outer: Deg(15.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(1.0, 0.5, 0.31),
            diffuse: Vector3::new(1.0, 0.5, 0.31),
            specular: Vector3::new(0.5, 0.5, 0.5),
            shininess: 64.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightingSetup {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
    pub material: Material,
}

impl Default for LightingSetup {
    fn default() -> Self {
        Self {
            directional: DirectionalLight::default(),
            points: [
                PointLight::at(Point3::new(0.7, 0.2, 2.0)),
                PointLight::at(Point3::new(2.3, -3.3, -4.0)),
                PointLight::at(Point3::new(-4.0, 2.0, -12.0)),
                PointLight::at(Point3::new(0.0, 0.0, -3.0)),
            ],
            spot: SpotLight::default(),
            material: Material::default(),
        }
    }
}

impl LightingSetup {
    /// Attaches the spot light to the viewer, like a flashlight.
    pub fn follow_camera(&mut self, position: Point3<f32>, front: Vector3<f32>) {
        self.spot.position = position;
        if front.magnitude2() > 0.0 {
            self.spot.direction = front.normalize();
        }
    }

    pub fn to_raw(&self) -> LightUniform {
        let d = &self.directional;
        let s = &self.spot;
        let m = &self.material;
        LightUniform {
            directional: DirectionalLightRaw {
                direction: extend(d.direction, 0.0),
                ambient: extend(d.ambient, 0.0),
                diffuse: extend(d.diffuse, 0.0),
                specular: extend(d.specular, 0.0),
            },
            points: self.points.map(|p| PointLightRaw {
                position: extend(Vector3::new(p.position.x, p.position.y, p.position.z), 1.0),
                ambient: extend(p.ambient, 0.0),
                diffuse: extend(p.diffuse, 0.0),
                specular: extend(p.specular, 0.0),
                attenuation: attenuation(&p.attenuation, 0.0),
            }),
            spot: SpotLightRaw {
                position: extend(Vector3::new(s.position.x, s.position.y, s.position.z), 1.0),
                direction: extend(s.direction, 0.0),
                ambient: extend(s.ambient, 0.0),
                diffuse: extend(s.diffuse, 0.0),
                specular: extend(s.specular, 0.0),
                // The shader compares cosines
                attenuation: attenuation(&s.attenuation, s.inner.0.to_radians().cos()),
                outer_cutoff: [s.outer.0.to_radians().cos(), 0.0, 0.0, 0.0],
            },
            material: MaterialRaw {
                ambient: extend(m.ambient, 0.0),
                diffuse: extend(m.diffuse, 0.0),
                specular: extend(m.specular, m.shininess),
            },
        }
    }
}

fn extend(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn attenuation(a: &Attenuation, w: f32) -> [f32; 4] {
    [a.constant, a.linear, a.quadratic, w]
}

// Every field is a vec4 so the Rust layout matches WGSL uniform alignment
// without explicit padding.

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, cos(inner)
    pub attenuation: [f32; 4],
    /// cos(outer) in `x`
    pub outer_cutoff: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialRaw {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// rgb specular, shininess in `w`
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub directional: DirectionalLightRaw,
    pub points: [PointLightRaw; POINT_LIGHT_COUNT],
    pub spot: SpotLightRaw,
    pub material: MaterialRaw,
}
