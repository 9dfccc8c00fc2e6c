use crate::Grid3;

/// Normalized density samples in `[0, 1]`. Read-only during propagation.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarVolume {
    grid: Grid3<f32>,
}

impl ScalarVolume {
    pub fn uniform(sx: usize, sy: usize, sz: usize, density: f32) -> Self {
        Self {
            grid: Grid3::filled(sx, sy, sz, density.clamp(0.0, 1.0)),
        }
    }

    pub fn from_fn(sx: usize, sy: usize, sz: usize, f: impl Fn(usize, usize, usize) -> f32) -> Self {
        Self {
            grid: Grid3::from_fn(sx, sy, sz, |x, y, z| f(x, y, z).clamp(0.0, 1.0)),
        }
    }

    /// Takes ownership of samples already in `[0, 1]`; out-of-range values are clamped.
    pub fn from_grid(mut grid: Grid3<f32>) -> Self {
        for v in grid.data.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
        Self { grid }
    }

    /// 8-bit samples, normalized the way a G8 texture is read.
    pub fn from_u8(sx: usize, sy: usize, sz: usize, raw: &[u8]) -> Self {
        let data = raw.iter().map(|&v| v as f32 / u8::MAX as f32).collect();
        Self {
            grid: Grid3::from_vec(sx, sy, sz, data, 0.0),
        }
    }

    /// 16-bit samples, normalized the way an R16 texture is read.
    pub fn from_u16(sx: usize, sy: usize, sz: usize, raw: &[u16]) -> Self {
        let data = raw.iter().map(|&v| v as f32 / u16::MAX as f32).collect();
        Self {
            grid: Grid3::from_vec(sx, sy, sz, data, 0.0),
        }
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.grid.dims()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.grid.get(x, y, z)
    }

    #[inline]
    pub fn grid(&self) -> &Grid3<f32> {
        &self.grid
    }
}
