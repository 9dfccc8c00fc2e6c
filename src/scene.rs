use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use slablight_geom::{Mat3, Transform, Vec3};
use slablight_lighting::{ClipPlane, DirectionalLight, WorldParameters};
use slablight_volume::{ColorCurve, CutMode, DEFAULT_TF_SAMPLES, Rgba, TfRange, TransferFunction};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub transfer_function: TransferFunctionConfig,
    #[serde(default)]
    pub light: LightConfig,
    /// Target of a `change` operation.
    #[serde(default)]
    pub change: Option<LightConfig>,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub march: MarchConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phantom {
    Uniform,
    Sphere,
    Noise,
}

fn default_phantom() -> Phantom {
    Phantom::Sphere
}

#[derive(Clone, Debug, Deserialize)]
pub struct VolumeConfig {
    #[serde(default = "default_dims")]
    pub dims: [usize; 3],
    #[serde(default = "default_phantom")]
    pub phantom: Phantom,
    #[serde(default = "default_density")]
    pub density: f32,
    /// Sphere radius as a fraction of the half extent.
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_noise_frequency")]
    pub noise_frequency: f32,
    #[serde(default = "default_seed")]
    pub seed: i32,
}
fn default_dims() -> [usize; 3] {
    [64, 64, 64]
}
fn default_density() -> f32 {
    0.8
}
fn default_radius() -> f32 {
    0.8
}
fn default_noise_frequency() -> f32 {
    0.06
}
fn default_seed() -> i32 {
    1337
}
impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            dims: default_dims(),
            phantom: default_phantom(),
            density: default_density(),
            radius: default_radius(),
            noise_frequency: default_noise_frequency(),
            seed: default_seed(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CutModeConfig {
    #[default]
    Clamp,
    Clear,
}

impl From<CutModeConfig> for CutMode {
    fn from(mode: CutModeConfig) -> Self {
        match mode {
            CutModeConfig::Clamp => CutMode::Clamp,
            CutModeConfig::Clear => CutMode::Clear,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TfPoint {
    pub position: f32,
    /// Linear RGBA.
    pub color: [f32; 4],
}

#[derive(Clone, Debug, Deserialize)]
pub struct TransferFunctionConfig {
    #[serde(default = "default_tf_points")]
    pub points: Vec<TfPoint>,
    #[serde(default = "default_unit_range")]
    pub domain: [f32; 2],
    #[serde(default = "default_unit_range")]
    pub cutoffs: [f32; 2],
    #[serde(default)]
    pub low_cut: CutModeConfig,
    #[serde(default)]
    pub high_cut: CutModeConfig,
    #[serde(default = "default_tf_resolution")]
    pub resolution: usize,
}
fn default_tf_points() -> Vec<TfPoint> {
    vec![
        TfPoint {
            position: 0.0,
            color: [0.0, 0.0, 0.0, 0.0],
        },
        TfPoint {
            position: 1.0,
            color: [1.0, 1.0, 1.0, 0.2],
        },
    ]
}
fn default_unit_range() -> [f32; 2] {
    [0.0, 1.0]
}
fn default_tf_resolution() -> usize {
    DEFAULT_TF_SAMPLES
}
impl Default for TransferFunctionConfig {
    fn default() -> Self {
        Self {
            points: default_tf_points(),
            domain: default_unit_range(),
            cutoffs: default_unit_range(),
            low_cut: CutModeConfig::Clamp,
            high_cut: CutModeConfig::Clamp,
            resolution: default_tf_resolution(),
        }
    }
}

impl TransferFunctionConfig {
    pub fn build(&self) -> Result<TransferFunction, Box<dyn Error>> {
        let points = self
            .points
            .iter()
            .map(|p| {
                let [r, g, b, a] = p.color;
                (p.position, Rgba::new(r, g, b, a))
            })
            .collect();
        let curve = ColorCurve::new(points)?;
        let range = TfRange {
            intensity_domain: (self.domain[0], self.domain[1]),
            cutoffs: (self.cutoffs[0], self.cutoffs[1]),
            low_cut: self.low_cut.into(),
            high_cut: self.high_cut.into(),
        };
        TransferFunction::bake(&curve, range, self.resolution)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LightConfig {
    /// Propagation direction in world space.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_one3")]
    pub color: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}
fn default_light_direction() -> [f32; 3] {
    [0.3, -0.5, 0.8]
}
fn default_one3() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_intensity() -> f32 {
    1.0
}
impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_one3(),
            intensity: default_intensity(),
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> DirectionalLight {
        DirectionalLight::new(vec3(self.direction), self.intensity).with_color(vec3(self.color))
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ClipConfig {
    pub center: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler angles in degrees, applied X then Y then Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_one3")]
    pub scale: [f32; 3],
    #[serde(default = "default_mesh_max_bounds")]
    pub mesh_max_bounds: [f32; 3],
    #[serde(default)]
    pub clip: Option<ClipConfig>,
}
fn default_mesh_max_bounds() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}
impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: default_one3(),
            mesh_max_bounds: default_mesh_max_bounds(),
            clip: None,
        }
    }
}

impl WorldConfig {
    pub fn to_params(&self) -> Result<WorldParameters, Box<dyn Error>> {
        if self.scale.iter().any(|s| *s == 0.0) || self.mesh_max_bounds.iter().any(|b| *b <= 0.0) {
            return Err(format!(
                "degenerate volume placement: scale {:?}, mesh_max_bounds {:?}",
                self.scale, self.mesh_max_bounds
            )
            .into());
        }
        Ok(WorldParameters {
            volume_transform: Transform::new(
                vec3(self.translation),
                Mat3::from_euler_degrees(vec3(self.rotation)),
                vec3(self.scale),
            ),
            mesh_max_bounds: vec3(self.mesh_max_bounds),
            clip: self.clip.map(|c| ClipPlane {
                center: vec3(c.center),
                normal: vec3(c.normal),
            }),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MarchConfig {
    #[serde(default)]
    pub parallel: bool,
    /// 0 lets rayon choose.
    #[serde(default)]
    pub threads: usize,
    /// 0 marches each axis in one go.
    #[serde(default)]
    pub layers_per_batch: usize,
    /// Value the light volume is cleared to before the first operation.
    #[serde(default)]
    pub clear_value: f32,
}
impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: 0,
            layers_per_batch: 0,
            clear_value: 0.0,
        }
    }
}

#[inline]
fn vec3(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

pub fn parse_scene(s: &str) -> Result<SceneConfig, Box<dyn Error>> {
    let cfg: SceneConfig = toml::from_str(s)?;
    if cfg.volume.dims.iter().any(|d| *d == 0) {
        return Err(format!("volume dims must be non-zero, got {:?}", cfg.volume.dims).into());
    }
    Ok(cfg)
}

pub fn load_scene(path: &Path) -> Result<SceneConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    parse_scene(&s)
}
