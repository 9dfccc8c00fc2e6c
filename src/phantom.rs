use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::scene::{Phantom, VolumeConfig};
use slablight_volume::ScalarVolume;

/// Synthesizes a density volume for `cfg`. `seed` overrides `cfg.seed`.
pub fn build_volume(cfg: &VolumeConfig, seed: Option<i32>) -> ScalarVolume {
    let [sx, sy, sz] = cfg.dims;
    match cfg.phantom {
        Phantom::Uniform => ScalarVolume::uniform(sx, sy, sz, cfg.density),
        Phantom::Sphere => sphere(cfg),
        Phantom::Noise => noise(cfg, seed.unwrap_or(cfg.seed)),
    }
}

// Density falls off linearly from the center to `radius` (in half extents).
fn sphere(cfg: &VolumeConfig) -> ScalarVolume {
    let [sx, sy, sz] = cfg.dims;
    let half = [sx as f32 * 0.5, sy as f32 * 0.5, sz as f32 * 0.5];
    let radius = cfg.radius.max(f32::EPSILON);
    ScalarVolume::from_fn(sx, sy, sz, |x, y, z| {
        let u = (x as f32 + 0.5 - half[0]) / half[0];
        let v = (y as f32 + 0.5 - half[1]) / half[1];
        let w = (z as f32 + 0.5 - half[2]) / half[2];
        let r = (u * u + v * v + w * w).sqrt() / radius;
        cfg.density * (1.0 - r).max(0.0)
    })
}

fn noise(cfg: &VolumeConfig, seed: i32) -> ScalarVolume {
    let [sx, sy, sz] = cfg.dims;
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    n.set_frequency(Some(cfg.noise_frequency));
    ScalarVolume::from_fn(sx, sy, sz, |x, y, z| {
        let v = n.get_noise_3d(x as f32, y as f32, z as f32);
        // Keep only the upper half of the noise so the field has empty gaps.
        cfg.density * (v * 2.0).clamp(0.0, 1.0)
    })
}
