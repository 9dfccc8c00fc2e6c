use slablight_geom::Vec3;

use crate::light::WorldParameters;

/// World-space clipping plane. Voxels behind `normal` are clipped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipPlane {
    pub center: Vec3,
    pub normal: Vec3,
}

/// Clipping plane in the volume's unit-cube space (`[0, 1]^3`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalClipPlane {
    pub center: Vec3,
    pub normal: Vec3,
}

impl LocalClipPlane {
    /// Zero normal: every signed distance is 0, nothing is clipped.
    pub const NONE: LocalClipPlane = LocalClipPlane {
        center: Vec3::ZERO,
        normal: Vec3::ZERO,
    };

    pub fn from_world(world: &WorldParameters) -> LocalClipPlane {
        let Some(plane) = world.clip else {
            return LocalClipPlane::NONE;
        };
        let xf = &world.volume_transform;
        let center = xf.inverse_transform_position(plane.center) / world.mesh_max_bounds / 2.0
            + Vec3::splat(0.5);
        // Unrotate, then stretch by the volume scale.
        let normal = (xf.inverse_transform_vector_no_scale(plane.normal) * xf.scale).normalized();
        LocalClipPlane { center, normal }
    }

    #[inline]
    pub fn signed_distance(&self, uvw: Vec3) -> f32 {
        (uvw - self.center).dot(self.normal)
    }

    #[inline]
    pub fn is_clipped(&self, uvw: Vec3) -> bool {
        self.signed_distance(uvw) < 0.0
    }
}
