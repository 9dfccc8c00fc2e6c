//! Axis-decomposed directional light propagation through scalar volumes.
#![forbid(unsafe_code)]

mod axes;
mod backend;
mod buffers;
mod clip;
mod light;
mod march;
mod orchestrator;
mod step;

pub use axes::{CubeFace, FACE_NORMALS, MajorAxes, ON_AXIS_THRESHOLD, compute_major_axes};
pub use backend::{ComputeBackend, Kernel, PairKernel, RayonBackend, SerialBackend};
pub use buffers::{AxisBuffers, SlabBuffer, SlabBufferSet};
pub use clip::{ClipPlane, LocalClipPlane};
pub use light::{DirectionalLight, LocalLight, WorldParameters};
pub use march::{LightPass, MarchInputs, MarchState, SlabMarcher, attenuated_alpha};
pub use orchestrator::{ChangeOutcome, LightVolumeOrchestrator, VolumeInputs};
pub use step::{StepGeometry, permutation_matrix, transposed_dimensions};
