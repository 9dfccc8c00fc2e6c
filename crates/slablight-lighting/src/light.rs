use slablight_geom::{Transform, Vec3};

use crate::axes::{CubeFace, MajorAxes, compute_major_axes};
use crate::clip::ClipPlane;

/// A directional light. `direction` is the propagation direction (the light
/// shines from `-direction`). `color` is carried but unused by the
/// monochrome light volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, intensity: f32) -> Self {
        Self {
            direction,
            color: Vec3::ONE,
            intensity,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}

/// Placement of the volume in the world.
///
/// The volume's proxy mesh spans `[-mesh_max_bounds, mesh_max_bounds]` in
/// local space, which maps onto the unit cube the textures live in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldParameters {
    pub volume_transform: Transform,
    pub mesh_max_bounds: Vec3,
    pub clip: Option<ClipPlane>,
}

impl Default for WorldParameters {
    fn default() -> Self {
        Self {
            volume_transform: Transform::IDENTITY,
            mesh_max_bounds: Vec3::splat(0.5),
            clip: None,
        }
    }
}

/// A light expressed in the volume's local frame, with its propagation axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalLight {
    pub light: DirectionalLight,
    pub axes: MajorAxes,
}

impl LocalLight {
    /// Transforms `light` into local space. `None` when the direction is zero.
    pub fn from_world(light: &DirectionalLight, world: &WorldParameters) -> Option<LocalLight> {
        if light.direction.is_zero() {
            return None;
        }
        let direction = world
            .volume_transform
            .inverse_transform_vector(light.direction)
            .normalized();
        if direction.is_zero() || !direction.length().is_finite() {
            return None;
        }
        let local = DirectionalLight {
            direction,
            ..*light
        };
        // The light sits opposite its propagation direction.
        let axes = compute_major_axes(-direction);
        Some(LocalLight { light: local, axes })
    }

    /// Unit vector pointing from the volume toward the light.
    #[inline]
    pub fn position(&self) -> Vec3 {
        -self.light.direction
    }

    /// Incoming light level on `face`: intensity scaled by the face weight.
    pub fn light_alpha(&self, face: CubeFace) -> f32 {
        self.weight(face) * self.light.intensity
    }

    pub fn weight(&self, face: CubeFace) -> f32 {
        self.axes
            .faces
            .iter()
            .find(|(f, _)| *f == face)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}
