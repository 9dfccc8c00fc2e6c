//! Layer-by-layer propagation through one axis of the volume.

use std::time::Instant;

use slablight_volume::{LightVolume, ScalarVolume, TransferFunction};

use crate::backend::ComputeBackend;
use crate::buffers::{AxisBuffers, SlabBuffer};
use crate::clip::LocalClipPlane;
use crate::step::StepGeometry;

/// One light's contribution along one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightPass {
    pub geometry: StepGeometry,
    /// Light entering the volume: intensity times axis weight.
    pub light_alpha: f32,
    /// `+1` adds the light, `-1` removes it.
    pub sign: f32,
}

impl LightPass {
    pub fn new(geometry: StepGeometry, light_alpha: f32, added: bool) -> Self {
        Self {
            geometry,
            light_alpha,
            sign: if added { 1.0 } else { -1.0 },
        }
    }
}

/// Read-only data shared by every layer of a march.
#[derive(Copy, Clone)]
pub struct MarchInputs<'a> {
    pub volume: &'a ScalarVolume,
    pub tf: &'a TransferFunction,
    pub clip: LocalClipPlane,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarchState {
    Idle,
    BuffersCleared,
    Marching { layer: isize },
    Done,
}

#[derive(Copy, Clone, Debug)]
enum Passes {
    Single(LightPass),
    /// Removal of `removed` and addition of `added` in one layer loop.
    /// Both share the march axis and direction.
    Fused { removed: LightPass, added: LightPass },
}

impl Passes {
    fn geometry(&self) -> &StepGeometry {
        match self {
            Passes::Single(p) => &p.geometry,
            Passes::Fused { added, .. } => &added.geometry,
        }
    }
}

/// Beer-Lambert absorption for a step `step_ratio` layers thick.
#[inline]
pub fn attenuated_alpha(alpha: f32, step_ratio: f32) -> f32 {
    let a = alpha.clamp(0.0, 1.0);
    if step_ratio == 1.0 {
        a
    } else {
        1.0 - (1.0 - a).powf(step_ratio)
    }
}

/// Drives one axis of propagation: `Idle -> BuffersCleared -> Marching -> Done`.
pub struct SlabMarcher<'a, B: ComputeBackend> {
    backend: &'a B,
    buffers: &'a mut AxisBuffers,
    inputs: MarchInputs<'a>,
    passes: Passes,
    state: MarchState,
    dispatches: usize,
}

impl<'a, B: ComputeBackend> SlabMarcher<'a, B> {
    pub fn new(backend: &'a B, buffers: &'a mut AxisBuffers, inputs: MarchInputs<'a>, pass: LightPass) -> Self {
        Self::with_passes(backend, buffers, inputs, Passes::Single(pass))
    }

    /// Marches `removed` and `added` together; both must use the same face.
    pub fn fused(
        backend: &'a B,
        buffers: &'a mut AxisBuffers,
        inputs: MarchInputs<'a>,
        removed: LightPass,
        added: LightPass,
    ) -> Self {
        debug_assert_eq!(removed.geometry.face, added.geometry.face);
        Self::with_passes(backend, buffers, inputs, Passes::Fused { removed, added })
    }

    fn with_passes(backend: &'a B, buffers: &'a mut AxisBuffers, inputs: MarchInputs<'a>, passes: Passes) -> Self {
        Self {
            backend,
            buffers,
            inputs,
            passes,
            state: MarchState::Idle,
            dispatches: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> MarchState {
        self.state
    }

    /// Layer dispatches issued so far.
    #[inline]
    pub fn dispatches(&self) -> usize {
        self.dispatches
    }

    /// Sizes the buffers and fills each active pair with its border light.
    pub fn clear(&mut self) {
        let g = *self.passes.geometry();
        self.buffers.ensure(g.transposed[0], g.transposed[1]);
        match self.passes {
            Passes::Single(p) => {
                for b in &mut self.buffers.buffers[..2] {
                    self.backend.clear(&mut b.data, p.light_alpha);
                }
            }
            Passes::Fused { removed, added } => {
                let [b0, b1, b2, b3] = &mut self.buffers.buffers;
                self.backend.clear(&mut b0.data, removed.light_alpha);
                self.backend.clear(&mut b1.data, removed.light_alpha);
                self.backend.clear(&mut b2.data, added.light_alpha);
                self.backend.clear(&mut b3.data, added.light_alpha);
            }
        }
        self.backend.barrier();
        self.state = MarchState::BuffersCleared;
    }

    /// Marches at most `max_layers` layers and returns the resulting state.
    pub fn advance(&mut self, out: &mut LightVolume, max_layers: usize) -> MarchState {
        if self.state == MarchState::Idle {
            self.clear();
        }
        let g = *self.passes.geometry();
        let mut next = match self.state {
            MarchState::Idle | MarchState::BuffersCleared => {
                if g.layer_count() == 0 || g.transposed[0] == 0 || g.transposed[1] == 0 {
                    self.state = MarchState::Done;
                    return self.state;
                }
                g.start()
            }
            MarchState::Marching { layer } => layer,
            MarchState::Done => return MarchState::Done,
        };
        for _ in 0..max_layers {
            self.march_layer(next as usize, out);
            match g.next_layer(next) {
                Some(layer) => next = layer,
                None => {
                    self.state = MarchState::Done;
                    return self.state;
                }
            }
        }
        self.state = MarchState::Marching { layer: next };
        self.state
    }

    /// Runs the march to completion.
    pub fn run(&mut self, out: &mut LightVolume) {
        let t0 = Instant::now();
        while self.advance(out, usize::MAX) != MarchState::Done {}
        log::debug!(
            target: "perf",
            "ms={:.3} slab_march face={:?} layers={} fused={}",
            t0.elapsed().as_secs_f64() * 1000.0,
            self.passes.geometry().face,
            self.passes.geometry().layer_count(),
            matches!(self.passes, Passes::Fused { .. })
        );
    }

    fn march_layer(&mut self, layer: usize, out: &mut LightVolume) {
        let parity = layer % 2;
        let inputs = self.inputs;
        match self.passes {
            Passes::Single(pass) => {
                let (read, write) = self.buffers.ping_pong(0, parity);
                let width = write.width;
                let kernel = |x: usize, y: usize| propagate_texel(&inputs, &pass, read, x, y, layer);
                self.backend.dispatch(width, &mut write.data, &kernel);
                self.backend.barrier();
                scatter(&pass, write, layer, out);
            }
            Passes::Fused { removed, added } => {
                let (read_r, write_r, read_a, write_a) = self.buffers.ping_pong_both(parity);
                let width = write_r.width;
                let kernel = |x: usize, y: usize| {
                    (
                        propagate_texel(&inputs, &removed, read_r, x, y, layer),
                        propagate_texel(&inputs, &added, read_a, x, y, layer),
                    )
                };
                self.backend.dispatch_pair(width, &mut write_r.data, &mut write_a.data, &kernel);
                self.backend.barrier();
                scatter(&removed, write_r, layer, out);
                scatter(&added, write_a, layer, out);
            }
        }
        self.dispatches += 1;
    }
}

fn propagate_texel(
    inputs: &MarchInputs<'_>,
    pass: &LightPass,
    read: &SlabBuffer,
    x: usize,
    y: usize,
    layer: usize,
) -> f32 {
    let g = &pass.geometry;
    let off = g.texel_offset();
    let prev = read.sample_bilinear(x as f32 + off.x, y as f32 + off.y, pass.light_alpha);
    if inputs.clip.is_clipped(g.local_uvw(x, y, layer)) {
        return prev;
    }
    let [vx, vy, vz] = g.local_voxel(x, y, layer);
    let alpha = inputs.tf.alpha(inputs.volume.get(vx, vy, vz));
    prev * (1.0 - attenuated_alpha(alpha, g.step_ratio))
}

fn scatter(pass: &LightPass, layer_values: &SlabBuffer, layer: usize, out: &mut LightVolume) {
    let width = layer_values.width;
    for (i, v) in layer_values.data.iter().enumerate() {
        let [vx, vy, vz] = pass.geometry.local_voxel(i % width, i / width, layer);
        out.accumulate(vx, vy, vz, pass.sign * v);
    }
}
