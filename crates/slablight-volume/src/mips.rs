use crate::Grid3;

/// Levels generated below the base volume (eight mips including level 0).
pub const MAX_MIP_LEVELS: usize = 7;

/// Successive 2x-downsampled levels where each texel is the max of its children.
///
/// Level 0 is not included. Generation stops early as soon as a level would
/// have a zero dimension; the remaining levels are simply not produced.
pub fn max_mip_chain(base: &Grid3<f32>, levels: usize) -> Vec<Grid3<f32>> {
    let levels = levels.min(MAX_MIP_LEVELS);
    let mut chain: Vec<Grid3<f32>> = Vec::with_capacity(levels);
    for level in 1..=levels {
        let prev = chain.last().unwrap_or(base);
        let (sx, sy, sz) = (prev.sx / 2, prev.sy / 2, prev.sz / 2);
        if sx == 0 || sy == 0 || sz == 0 {
            log::warn!(
                "zero dimension mip at level {level} ({sx}, {sy}, {sz}); aborting mip generation"
            );
            break;
        }
        let next = Grid3::from_fn(sx, sy, sz, |x, y, z| max_of_children(prev, x, y, z));
        chain.push(next);
    }
    chain
}

fn max_of_children(prev: &Grid3<f32>, x: usize, y: usize, z: usize) -> f32 {
    let mut m = f32::NEG_INFINITY;
    for cz in (z * 2)..((z * 2 + 2).min(prev.sz)) {
        for cy in (y * 2)..((y * 2 + 2).min(prev.sy)) {
            for cx in (x * 2)..((x * 2 + 2).min(prev.sx)) {
                m = m.max(prev.get(cx, cy, cz));
            }
        }
    }
    m
}
