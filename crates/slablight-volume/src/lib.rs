//! Density volumes, light volumes and transfer functions.
#![forbid(unsafe_code)]

mod grid;
mod light;
mod mips;
mod scalar;
mod transfer;

pub use grid::Grid3;
pub use light::{LightVolume, LightVolumeState};
pub use mips::{MAX_MIP_LEVELS, max_mip_chain};
pub use scalar::ScalarVolume;
pub use transfer::{ColorCurve, CutMode, DEFAULT_TF_SAMPLES, Rgba, TfRange, TransferFunction};
