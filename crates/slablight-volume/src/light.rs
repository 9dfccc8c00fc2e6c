use crate::Grid3;

/// Lifecycle of a light volume as seen by the propagation code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightVolumeState {
    /// Allocated, never cleared. Contents are zero.
    Uninitialized,
    /// Uniformly filled by `clear`; no light contributions since.
    Cleared,
    /// At least one add/remove/change has been accumulated.
    Lit,
}

/// Accumulated light intensity per voxel, same dimensions as the density volume.
///
/// Contributions are additive: adding a light writes `+I` terms and removing
/// it writes `-I` terms, so a light is updated by remove-then-add, never by
/// mutating values in place.
#[derive(Clone, Debug)]
pub struct LightVolume {
    grid: Grid3<f32>,
    state: LightVolumeState,
}

impl LightVolume {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            grid: Grid3::filled(sx, sy, sz, 0.0),
            state: LightVolumeState::Uninitialized,
        }
    }

    pub fn matching(dims: [usize; 3]) -> Self {
        Self::new(dims[0], dims[1], dims[2])
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.grid.dims()
    }

    #[inline]
    pub fn state(&self) -> LightVolumeState {
        self.state
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.grid.get(x, y, z)
    }

    #[inline]
    pub fn accumulate(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let i = self.grid.idx(x, y, z);
        self.grid.data[i] += value;
    }

    /// Overwrites every voxel; not a marching operation.
    pub fn clear(&mut self, value: f32) {
        self.grid.fill(value);
        self.state = LightVolumeState::Cleared;
    }

    pub fn mark_lit(&mut self) {
        self.state = LightVolumeState::Lit;
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.grid.data
    }

    #[inline]
    pub fn grid(&self) -> &Grid3<f32> {
        &self.grid
    }
}
