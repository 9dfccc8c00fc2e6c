use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Per-texel kernel: `(x, y) -> value`.
pub type Kernel<'k> = dyn Fn(usize, usize) -> f32 + Sync + 'k;
/// Kernel producing one value for each buffer of a fused pass.
pub type PairKernel<'k> = dyn Fn(usize, usize) -> (f32, f32) + Sync + 'k;

/// Executes one layer's worth of per-texel work.
///
/// Every texel of an output buffer is written exactly once per dispatch and
/// reads only from buffers that are not being written, so any execution
/// order is valid. `barrier` must return only after all prior dispatches
/// have finished writing.
pub trait ComputeBackend {
    fn dispatch(&self, width: usize, out: &mut [f32], kernel: &Kernel<'_>);

    fn dispatch_pair(&self, width: usize, out_a: &mut [f32], out_b: &mut [f32], kernel: &PairKernel<'_>);

    /// No-op for backends whose dispatches are synchronous.
    fn barrier(&self) {}

    fn clear(&self, out: &mut [f32], value: f32) {
        out.fill(value);
    }
}

/// Runs every kernel inline on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct SerialBackend;

impl ComputeBackend for SerialBackend {
    fn dispatch(&self, width: usize, out: &mut [f32], kernel: &Kernel<'_>) {
        if width == 0 {
            return;
        }
        for (y, row) in out.chunks_mut(width).enumerate() {
            for (x, texel) in row.iter_mut().enumerate() {
                *texel = kernel(x, y);
            }
        }
    }

    fn dispatch_pair(&self, width: usize, out_a: &mut [f32], out_b: &mut [f32], kernel: &PairKernel<'_>) {
        if width == 0 {
            return;
        }
        for (y, (row_a, row_b)) in out_a.chunks_mut(width).zip(out_b.chunks_mut(width)).enumerate() {
            for (x, (a, b)) in row_a.iter_mut().zip(row_b.iter_mut()).enumerate() {
                (*a, *b) = kernel(x, y);
            }
        }
    }
}

/// Splits each layer into rows and runs them on a dedicated rayon pool.
pub struct RayonBackend {
    pool: ThreadPool,
}

impl RayonBackend {
    /// `threads == 0` lets rayon pick the thread count.
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("slablight-march-{i}"))
            .build()?;
        log::debug!("rayon march pool ready ({} threads)", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ComputeBackend for RayonBackend {
    fn dispatch(&self, width: usize, out: &mut [f32], kernel: &Kernel<'_>) {
        if width == 0 {
            return;
        }
        self.pool.install(|| {
            out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                for (x, texel) in row.iter_mut().enumerate() {
                    *texel = kernel(x, y);
                }
            });
        });
    }

    fn dispatch_pair(&self, width: usize, out_a: &mut [f32], out_b: &mut [f32], kernel: &PairKernel<'_>) {
        if width == 0 {
            return;
        }
        self.pool.install(|| {
            out_a
                .par_chunks_mut(width)
                .zip(out_b.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (row_a, row_b))| {
                    for (x, (a, b)) in row_a.iter_mut().zip(row_b.iter_mut()).enumerate() {
                        (*a, *b) = kernel(x, y);
                    }
                });
        });
    }

    fn clear(&self, out: &mut [f32], value: f32) {
        self.pool.install(|| out.par_iter_mut().for_each(|v| *v = value));
    }
}
