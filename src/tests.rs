use crate::phantom::build_volume;
use crate::report::{Stats, dump_raw, layer_stats, max_abs_diff};
use crate::scene::{CutModeConfig, Phantom, SceneConfig, parse_scene};
use slablight_lighting::{DirectionalLight, LightVolumeOrchestrator, VolumeInputs};
use slablight_volume::LightVolume;

#[test]
fn empty_scene_uses_defaults() {
    let cfg = parse_scene("").unwrap();
    assert_eq!(cfg.volume.dims, [64, 64, 64]);
    assert_eq!(cfg.volume.phantom, Phantom::Sphere);
    assert!(cfg.change.is_none());
    assert!(cfg.world.clip.is_none());
    assert!(!cfg.march.parallel);
    assert_eq!(cfg.transfer_function.resolution, 1000);
}

#[test]
fn shipped_scene_parses() {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenes/default.toml");
    let cfg = crate::scene::load_scene(&path).unwrap();
    assert_eq!(cfg.transfer_function.low_cut, CutModeConfig::Clear);
    assert!(cfg.change.is_some());
    assert!(cfg.world.clip.is_some());
    cfg.transfer_function.build().unwrap();
    cfg.world.to_params().unwrap();
}

#[test]
fn partial_sections_fill_in_defaults() {
    let cfg = parse_scene(
        r#"
        [volume]
        dims = [8, 4, 2]
        phantom = "uniform"

        [light]
        intensity = 2.5

        [world]
        scale = [2.0, 1.0, 1.0]
        "#,
    )
    .unwrap();
    assert_eq!(cfg.volume.dims, [8, 4, 2]);
    assert_eq!(cfg.volume.density, 0.8);
    assert_eq!(cfg.light.intensity, 2.5);
    assert_eq!(cfg.light.direction, [0.3, -0.5, 0.8]);
    assert_eq!(cfg.world.mesh_max_bounds, [0.5, 0.5, 0.5]);
    let world = cfg.world.to_params().unwrap();
    assert_eq!(world.volume_transform.scale.x, 2.0);
}

#[test]
fn invalid_scenes_are_rejected() {
    assert!(parse_scene("[volume]\ndims = [0, 4, 4]\n").is_err());
    assert!(parse_scene("[volume]\nphantom = \"teapot\"\n").is_err());
    let cfg = parse_scene("[transfer_function]\ndomain = [0.8, 0.2]\n").unwrap();
    assert!(cfg.transfer_function.build().is_err());
    let cfg = parse_scene("[transfer_function]\ndomain = [1.2, 1.5]\n").unwrap();
    assert!(cfg.transfer_function.build().is_err());
    let cfg = parse_scene("[world]\nscale = [1.0, 0.0, 1.0]\n").unwrap();
    assert!(cfg.world.to_params().is_err());
}

#[test]
fn phantoms_stay_in_unit_range() {
    let mut cfg = SceneConfig::default();
    cfg.volume.dims = [12, 10, 8];
    for phantom in [Phantom::Uniform, Phantom::Sphere, Phantom::Noise] {
        cfg.volume.phantom = phantom;
        let v = build_volume(&cfg.volume, Some(7));
        assert_eq!(v.dims(), [12, 10, 8]);
        assert!(v.grid().data.iter().all(|d| (0.0..=1.0).contains(d)));
    }
}

#[test]
fn sphere_phantom_is_densest_at_center() {
    let mut cfg = SceneConfig::default();
    cfg.volume.dims = [9, 9, 9];
    cfg.volume.phantom = Phantom::Sphere;
    let v = build_volume(&cfg.volume, None);
    assert!(v.get(4, 4, 4) > v.get(1, 4, 4));
    assert_eq!(v.get(0, 0, 0), 0.0);
}

#[test]
fn noise_phantom_depends_on_seed() {
    let mut cfg = SceneConfig::default();
    cfg.volume.dims = [16, 16, 16];
    cfg.volume.phantom = Phantom::Noise;
    let a = build_volume(&cfg.volume, Some(1));
    let b = build_volume(&cfg.volume, Some(1));
    let c = build_volume(&cfg.volume, Some(2));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn stats_and_diff() {
    let s = Stats::of(&[1.0, 3.0, 2.0]);
    assert_eq!((s.min, s.max, s.mean), (1.0, 3.0, 2.0));
    assert_eq!(Stats::of(&[]).mean, 0.0);
    assert_eq!(max_abs_diff(&[1.0, 2.0], &[1.5, 1.0]), 1.0);
}

#[test]
fn layer_stats_follow_scene_light() {
    let cfg = parse_scene(
        r#"
        [volume]
        dims = [4, 4, 4]
        phantom = "uniform"
        density = 1.0

        [transfer_function]
        points = [{ position = 0.0, color = [1.0, 1.0, 1.0, 0.5] }]
        "#,
    )
    .unwrap();
    let volume = build_volume(&cfg.volume, None);
    let tf = cfg.transfer_function.build().unwrap();
    let inputs = VolumeInputs::new(&volume, &tf, cfg.world.to_params().unwrap());
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(slablight_geom::Vec3::Z, 1.0), true);
    let means: Vec<f32> = layer_stats(&lv).iter().map(|s| s.mean).collect();
    for (m, e) in means.iter().zip([0.5, 0.25, 0.125, 0.0625]) {
        assert!((m - e).abs() < 1e-5, "{means:?}");
    }
}

#[test]
fn dump_writes_little_endian_floats() {
    let mut lv = LightVolume::new(2, 1, 1);
    lv.clear(0.5);
    let path = std::env::temp_dir().join(format!("slablight-dump-{}.raw", std::process::id()));
    dump_raw(&lv, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.5);
}
