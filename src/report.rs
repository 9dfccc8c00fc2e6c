use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use slablight_volume::{Grid3, LightVolume, MAX_MIP_LEVELS, max_mip_chain};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl Stats {
    pub fn of(values: &[f32]) -> Stats {
        if values.is_empty() {
            return Stats {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }
        let (mut min, mut max, mut sum) = (f32::INFINITY, f32::NEG_INFINITY, 0.0f64);
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        Stats {
            min,
            max,
            mean: (sum / values.len() as f64) as f32,
        }
    }
}

/// Statistics of each Z slice of `lv`.
pub fn layer_stats(lv: &LightVolume) -> Vec<Stats> {
    let grid = lv.grid();
    (0..grid.sz).map(|z| Stats::of(grid.slice_z(z))).collect()
}

pub fn log_light_volume(label: &str, lv: &LightVolume) {
    let all = Stats::of(lv.values());
    log::info!(
        "{label}: dims={:?} state={:?} min={:.5} max={:.5} mean={:.5}",
        lv.dims(),
        lv.state(),
        all.min,
        all.max,
        all.mean
    );
    for (z, s) in layer_stats(lv).iter().enumerate() {
        log::debug!("{label}: z={z:>4} min={:.5} max={:.5} mean={:.5}", s.min, s.max, s.mean);
    }
}

/// Logs the max-mip pyramid of the density field.
pub fn log_density_mips(density: &Grid3<f32>) {
    let chain = max_mip_chain(density, MAX_MIP_LEVELS);
    for (i, level) in chain.iter().enumerate() {
        let s = Stats::of(&level.data);
        log::debug!("density mip {}: dims={:?} max={:.4}", i + 1, level.dims(), s.max);
    }
    log::info!("density max-mip chain: {} levels below base", chain.len());
}

pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
}

/// Writes the light volume as raw little-endian `f32`, X fastest.
pub fn dump_raw(lv: &LightVolume, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut w = BufWriter::new(File::create(path)?);
    for v in lv.values() {
        w.write_all(&v.to_le_bytes())?;
    }
    w.flush()?;
    log::info!("wrote {} voxels to {}", lv.values().len(), path.display());
    Ok(())
}
