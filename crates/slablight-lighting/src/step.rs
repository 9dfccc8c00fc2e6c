use slablight_geom::{Mat3, Vec2, Vec3};

use crate::axes::CubeFace;
use crate::light::WorldParameters;

/// Per-axis marching geometry for one light.
///
/// Everything here is expressed in the transposed frame where the two
/// cross-section axes come first and the marching axis is last.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepGeometry {
    pub face: CubeFace,
    /// `[cross_x, cross_y, layers]`.
    pub transposed: [usize; 3],
    pub axis_direction: i32,
    /// Sideways drift per layer in buffer UV units, toward the light.
    pub uv_offset: Vec2,
    /// World-space length of one step through a layer.
    pub step_size: f32,
    /// `step_size` divided by the on-axis layer thickness; 1 for on-axis light.
    pub step_ratio: f32,
    /// Per-step direction toward the light, scaled to `1 / min(cross dims)`.
    pub uvw_offset: Vec3,
    /// Maps local `(x, y, z)` to `(cross_x, cross_y, march)`.
    pub permutation: Mat3,
}

impl StepGeometry {
    /// `dims` are the volume dimensions; `light_position` points toward the light.
    pub fn new(face: CubeFace, dims: [usize; 3], light_position: Vec3, world: &WorldParameters) -> Self {
        let transposed = transposed_dimensions(face, dims);
        let permutation = permutation_matrix(face);
        let layers = transposed[2].max(1) as f32;

        // Scale so the marching component is 1; the other two become the
        // drift per unit of travel along the axis.
        let facing = light_position.dot(face.normal());
        let ratio = if facing > 0.0 {
            light_position / facing
        } else {
            face.normal()
        };
        let drift = permutation * ratio;
        let uv_offset = Vec2::new(drift.x, drift.y) / layers;

        let to_world = |local: Vec3| {
            world
                .volume_transform
                .transform_vector(local * world.mesh_max_bounds * 2.0)
                .length()
        };
        let step_size = to_world(ratio / layers);
        let layer_thickness = to_world(face.normal() / layers);
        let step_ratio = if layer_thickness > 0.0 {
            step_size / layer_thickness
        } else {
            1.0
        };

        let min_cross = transposed[0].min(transposed[1]).max(1) as f32;
        let uvw_offset = ratio.normalized() / min_cross;

        StepGeometry {
            face,
            transposed,
            axis_direction: face.march_direction(),
            uv_offset,
            step_size,
            step_ratio,
            uvw_offset,
            permutation,
        }
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.transposed[2]
    }

    /// First layer index of the march.
    pub fn start(&self) -> isize {
        if self.axis_direction == 1 {
            0
        } else {
            self.layer_count() as isize - 1
        }
    }

    /// Exclusive stop index; `-1` when marching down to zero.
    pub fn stop(&self) -> isize {
        if self.axis_direction == 1 {
            self.layer_count() as isize
        } else {
            -1
        }
    }

    /// Layer after `layer` in march order, or `None` once `stop` is reached.
    pub fn next_layer(&self, layer: isize) -> Option<isize> {
        let next = layer + self.axis_direction as isize;
        (next != self.stop()).then_some(next)
    }

    /// Offset in buffer texels (texel centers at integer coordinates).
    #[inline]
    pub fn texel_offset(&self) -> Vec2 {
        Vec2::new(
            self.uv_offset.x * self.transposed[0] as f32,
            self.uv_offset.y * self.transposed[1] as f32,
        )
    }

    /// Local voxel addressed by cross-section pixel `(px, py)` on `layer`.
    #[inline]
    pub fn local_voxel(&self, px: usize, py: usize, layer: usize) -> [usize; 3] {
        match self.face.axis() {
            0 => [layer, px, py],
            1 => [px, layer, py],
            _ => [px, py, layer],
        }
    }

    /// Center of `(px, py, layer)` in the volume's unit-cube space.
    pub fn local_uvw(&self, px: usize, py: usize, layer: usize) -> Vec3 {
        let t = Vec3::new(
            (px as f32 + 0.5) / self.transposed[0] as f32,
            (py as f32 + 0.5) / self.transposed[1] as f32,
            (layer as f32 + 0.5) / self.transposed[2] as f32,
        );
        self.permutation.transpose() * t
    }
}

/// Volume dimensions reordered so the marching axis comes last.
pub fn transposed_dimensions(face: CubeFace, dims: [usize; 3]) -> [usize; 3] {
    let [x, y, z] = dims;
    match face.axis() {
        0 => [y, z, x],
        1 => [x, z, y],
        _ => [x, y, z],
    }
}

pub fn permutation_matrix(face: CubeFace) -> Mat3 {
    match face.axis() {
        0 => Mat3::from_rows(Vec3::Y, Vec3::Z, Vec3::X),
        1 => Mat3::from_rows(Vec3::X, Vec3::Z, Vec3::Y),
        _ => Mat3::IDENTITY,
    }
}
