use std::time::Instant;

use slablight_volume::{LightVolume, ScalarVolume, TransferFunction};

use crate::backend::{ComputeBackend, SerialBackend};
use crate::buffers::SlabBufferSet;
use crate::clip::LocalClipPlane;
use crate::light::{DirectionalLight, LocalLight, WorldParameters};
use crate::march::{LightPass, MarchInputs, MarchState, SlabMarcher};
use crate::step::StepGeometry;

/// Everything a propagation needs besides the light and the output.
#[derive(Copy, Clone)]
pub struct VolumeInputs<'a> {
    pub volume: &'a ScalarVolume,
    pub tf: &'a TransferFunction,
    pub world: WorldParameters,
}

impl<'a> VolumeInputs<'a> {
    pub fn new(volume: &'a ScalarVolume, tf: &'a TransferFunction, world: WorldParameters) -> Self {
        Self { volume, tf, world }
    }

    fn march_inputs(&self) -> MarchInputs<'a> {
        MarchInputs {
            volume: self.volume,
            tf: self.tf,
            clip: LocalClipPlane::from_world(&self.world),
        }
    }
}

/// How a `change` call was carried out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Both lights shared their axis pair; one fused march per axis.
    Fused,
    /// Axis pairs differed; remove then add.
    Fallback,
    /// The old light had a zero direction; the new one was added.
    AddedOnly,
    /// The new light had a zero direction; nothing was written.
    Ignored,
}

/// Sequences axis marches for add, remove and change operations.
///
/// Owns the ping-pong buffers so repeated operations on same-sized volumes
/// do not reallocate.
pub struct LightVolumeOrchestrator<B: ComputeBackend = SerialBackend> {
    backend: B,
    buffers: SlabBufferSet,
    layers_per_batch: usize,
}

impl Default for LightVolumeOrchestrator<SerialBackend> {
    fn default() -> Self {
        Self::new(SerialBackend)
    }
}

impl<B: ComputeBackend> LightVolumeOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            buffers: SlabBufferSet::new(),
            layers_per_batch: usize::MAX,
        }
    }

    /// Marches in batches of `layers` between state checks; 0 means unbatched.
    pub fn with_layers_per_batch(mut self, layers: usize) -> Self {
        self.layers_per_batch = if layers == 0 { usize::MAX } else { layers };
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clear(&self, light_volume: &mut LightVolume, value: f32) {
        light_volume.clear(value);
    }

    /// Adds (`added == true`) or removes a light's contribution.
    ///
    /// Returns `false` without touching `light_volume` when the light has no
    /// direction.
    pub fn add_or_remove(
        &mut self,
        inputs: &VolumeInputs<'_>,
        light_volume: &mut LightVolume,
        light: &DirectionalLight,
        added: bool,
    ) -> bool {
        let Some(local) = LocalLight::from_world(light, &inputs.world) else {
            log::warn!("ignoring light with zero direction ({:?})", light.direction);
            return false;
        };
        debug_assert_eq!(inputs.volume.dims(), light_volume.dims());

        let t0 = Instant::now();
        let dims = inputs.volume.dims();
        let march_inputs = inputs.march_inputs();
        let mut axes_marched = 0;
        for (face, _) in local.axes.active() {
            let geometry = StepGeometry::new(face, dims, local.position(), &inputs.world);
            let pass = LightPass::new(geometry, local.light_alpha(face), added);
            let buffers = self.buffers.for_axis(face.axis());
            let mut marcher = SlabMarcher::new(&self.backend, buffers, march_inputs, pass);
            drive(&mut marcher, light_volume, self.layers_per_batch);
            axes_marched += 1;
        }
        light_volume.mark_lit();
        log::info!(
            target: "perf",
            "ms={:.3} light_{} axes={} dims={:?}",
            t0.elapsed().as_secs_f64() * 1000.0,
            if added { "add" } else { "remove" },
            axes_marched,
            dims
        );
        true
    }

    /// Replaces `old` with `new` in `light_volume`.
    ///
    /// When both lights have the same two major faces, removal and addition
    /// run in a single fused march per axis. Otherwise falls back to a
    /// remove followed by an add.
    pub fn change(
        &mut self,
        inputs: &VolumeInputs<'_>,
        light_volume: &mut LightVolume,
        old: &DirectionalLight,
        new: &DirectionalLight,
    ) -> ChangeOutcome {
        let Some(new_local) = LocalLight::from_world(new, &inputs.world) else {
            log::warn!("ignoring light change to zero direction ({:?})", new.direction);
            return ChangeOutcome::Ignored;
        };
        let Some(old_local) = LocalLight::from_world(old, &inputs.world) else {
            self.add_or_remove(inputs, light_volume, new, true);
            return ChangeOutcome::AddedOnly;
        };
        if !old_local.axes.same_faces(&new_local.axes) {
            log::debug!(
                "light change crosses axes ({:?} -> {:?}); remove then add",
                old_local.axes.dominant_face(),
                new_local.axes.dominant_face()
            );
            self.add_or_remove(inputs, light_volume, old, false);
            self.add_or_remove(inputs, light_volume, new, true);
            return ChangeOutcome::Fallback;
        }
        debug_assert_eq!(inputs.volume.dims(), light_volume.dims());

        let t0 = Instant::now();
        let dims = inputs.volume.dims();
        let march_inputs = inputs.march_inputs();
        for slot in 0..2 {
            let (face, old_w) = old_local.axes.faces[slot];
            let new_w = new_local.axes.faces[slot].1;
            if old_w <= 0.0 && new_w <= 0.0 {
                continue;
            }
            let removed = LightPass::new(
                StepGeometry::new(face, dims, old_local.position(), &inputs.world),
                old_local.light_alpha(face),
                false,
            );
            let added = LightPass::new(
                StepGeometry::new(face, dims, new_local.position(), &inputs.world),
                new_local.light_alpha(face),
                true,
            );
            let buffers = self.buffers.for_axis(face.axis());
            let mut marcher = SlabMarcher::fused(&self.backend, buffers, march_inputs, removed, added);
            drive(&mut marcher, light_volume, self.layers_per_batch);
        }
        light_volume.mark_lit();
        log::info!(
            target: "perf",
            "ms={:.3} light_change fused dims={:?}",
            t0.elapsed().as_secs_f64() * 1000.0,
            dims
        );
        ChangeOutcome::Fused
    }
}

fn drive<B: ComputeBackend>(marcher: &mut SlabMarcher<'_, B>, out: &mut LightVolume, batch: usize) {
    if batch == usize::MAX {
        marcher.run(out);
        return;
    }
    let mut batches = 0usize;
    while marcher.advance(out, batch) != MarchState::Done {
        batches += 1;
    }
    log::trace!("march finished in {} batches", batches + 1);
}
