use slablight_geom::{Mat3, Transform, Vec3};
use slablight_lighting::{
    ChangeOutcome, ClipPlane, DirectionalLight, LightVolumeOrchestrator, RayonBackend, SerialBackend, VolumeInputs,
    WorldParameters,
};
use slablight_volume::{LightVolume, LightVolumeState, ScalarVolume, TransferFunction};

fn assert_close(a: &[f32], b: &[f32], tol: f32) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!((x - y).abs() <= tol, "voxel {i}: {x} vs {y}");
    }
}

fn ramp_volume(n: usize) -> ScalarVolume {
    ScalarVolume::from_fn(n, n, n, |x, y, z| ((x * 7 + y * 3 + z * 5) % 11) as f32 / 10.0)
}

fn ramp_tf() -> TransferFunction {
    let samples = (0..16)
        .map(|i| slablight_volume::Rgba::new(1.0, 1.0, 1.0, i as f32 / 30.0))
        .collect();
    TransferFunction::from_samples(samples).unwrap()
}

#[test]
fn four_cube_half_alpha_along_z() {
    let volume = ScalarVolume::uniform(4, 4, 4, 1.0);
    let tf = TransferFunction::constant_alpha(0.5);
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();

    assert!(orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(Vec3::Z, 1.0), true));
    assert_eq!(lv.state(), LightVolumeState::Lit);
    let expected = [0.5, 0.25, 0.125, 0.0625];
    for z in 0..4 {
        for y in 0..4 {
            for x in 0..4 {
                assert!((lv.get(x, y, z) - expected[z]).abs() < 1e-6, "({x},{y},{z}) = {}", lv.get(x, y, z));
            }
        }
    }
}

#[test]
fn transparent_volume_passes_full_light() {
    let volume = ScalarVolume::uniform(5, 4, 6, 0.3);
    let tf = TransferFunction::constant_alpha(0.0);
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut orch = LightVolumeOrchestrator::default();
    for dir in [
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0).normalized(),
        Vec3::new(-0.3, 0.8, 0.5).normalized(),
    ] {
        let mut lv = LightVolume::matching(volume.dims());
        assert!(orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(dir, 0.8), true));
        for &v in lv.values() {
            assert!((v - 0.8).abs() < 1e-5, "direction {dir:?}: {v}");
        }
    }
}

#[test]
fn opaque_volume_blocks_after_first_layer() {
    let volume = ScalarVolume::uniform(3, 3, 3, 1.0);
    let tf = TransferFunction::constant_alpha(1.0);
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(-Vec3::X, 1.0), true);
    assert!(lv.values().iter().all(|&v| v == 0.0));
}

#[test]
fn light_never_increases_along_the_march() {
    let n = 8;
    let volume = ramp_volume(n);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    // Propagates toward -Y; marching starts at y = n - 1.
    orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(-Vec3::Y, 1.0), true);
    for x in 0..n {
        for z in 0..n {
            for y in (1..n).rev() {
                assert!(lv.get(x, y - 1, z) <= lv.get(x, y, z) + 1e-7);
            }
        }
    }
}

#[test]
fn add_then_remove_restores_previous_values() {
    let volume = ramp_volume(6);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    orch.clear(&mut lv, 0.1);
    let before = lv.values().to_vec();

    let light = DirectionalLight::new(Vec3::new(0.4, -0.7, 0.6).normalized(), 1.3);
    orch.add_or_remove(&inputs, &mut lv, &light, true);
    assert!(lv.values().iter().zip(&before).any(|(a, b)| a != b));
    orch.add_or_remove(&inputs, &mut lv, &light, false);
    assert_close(lv.values(), &before, 1e-5);
}

#[test]
fn change_to_same_light_is_a_no_op() {
    let volume = ramp_volume(6);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let mut orch = LightVolumeOrchestrator::default();
    for dir in [Vec3::Z, Vec3::new(0.5, 0.2, -0.8).normalized()] {
        let light = DirectionalLight::new(dir, 1.0);
        let mut lv = LightVolume::matching(volume.dims());
        orch.add_or_remove(&inputs, &mut lv, &light, true);
        let before = lv.values().to_vec();
        assert_eq!(orch.change(&inputs, &mut lv, &light, &light), ChangeOutcome::Fused);
        assert_close(lv.values(), &before, 1e-6);
    }
}

#[test]
fn fused_change_matches_remove_then_add() {
    let volume = ramp_volume(7);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let old = DirectionalLight::new(Vec3::new(0.3, 0.1, 1.0).normalized(), 1.0);
    let new = DirectionalLight::new(Vec3::new(0.35, 0.05, 1.0).normalized(), 0.9);
    let mut orch = LightVolumeOrchestrator::default();

    let mut fused = LightVolume::matching(volume.dims());
    orch.add_or_remove(&inputs, &mut fused, &old, true);
    let mut reference = fused.clone();

    assert_eq!(orch.change(&inputs, &mut fused, &old, &new), ChangeOutcome::Fused);
    orch.add_or_remove(&inputs, &mut reference, &old, false);
    orch.add_or_remove(&inputs, &mut reference, &new, true);
    assert_close(fused.values(), reference.values(), 1e-5);
}

#[test]
fn change_across_axes_falls_back() {
    let volume = ramp_volume(5);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let old = DirectionalLight::new(Vec3::Z, 1.0);
    let new = DirectionalLight::new(Vec3::X, 1.0);
    let mut orch = LightVolumeOrchestrator::default();

    let mut lv = LightVolume::matching(volume.dims());
    orch.add_or_remove(&inputs, &mut lv, &old, true);
    assert_eq!(orch.change(&inputs, &mut lv, &old, &new), ChangeOutcome::Fallback);

    let mut direct = LightVolume::matching(volume.dims());
    orch.add_or_remove(&inputs, &mut direct, &new, true);
    assert_close(lv.values(), direct.values(), 1e-5);
}

#[test]
fn clipped_voxels_do_not_absorb() {
    let volume = ScalarVolume::uniform(4, 4, 4, 1.0);
    let tf = TransferFunction::constant_alpha(1.0);
    let world = WorldParameters {
        clip: Some(ClipPlane {
            center: Vec3::ZERO,
            normal: Vec3::Z,
        }),
        ..WorldParameters::default()
    };
    let inputs = VolumeInputs::new(&volume, &tf, world);
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(Vec3::Z, 1.0), true);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(lv.get(x, y, 0), 1.0);
            assert_eq!(lv.get(x, y, 1), 1.0);
            assert_eq!(lv.get(x, y, 2), 0.0);
            assert_eq!(lv.get(x, y, 3), 0.0);
        }
    }
}

#[test]
fn scaled_volume_keeps_on_axis_attenuation() {
    let volume = ScalarVolume::uniform(4, 4, 4, 1.0);
    let tf = TransferFunction::constant_alpha(0.5);
    let world = WorldParameters {
        volume_transform: Transform::new(Vec3::new(3.0, 0.0, 0.0), Mat3::IDENTITY, Vec3::new(1.0, 2.0, 5.0)),
        ..WorldParameters::default()
    };
    let inputs = VolumeInputs::new(&volume, &tf, world);
    let mut lv = LightVolume::matching(volume.dims());
    let mut orch = LightVolumeOrchestrator::default();
    orch.add_or_remove(&inputs, &mut lv, &DirectionalLight::new(Vec3::Z, 1.0), true);
    assert!((lv.get(1, 2, 3) - 0.0625).abs() < 1e-6);
}

#[test]
fn serial_and_rayon_backends_agree() {
    let volume = ramp_volume(9);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let light = DirectionalLight::new(Vec3::new(-0.6, 0.3, 0.74).normalized(), 1.0);
    let next = DirectionalLight::new(Vec3::new(-0.62, 0.32, 0.72).normalized(), 1.0);

    let mut serial = LightVolumeOrchestrator::new(SerialBackend);
    let mut a = LightVolume::matching(volume.dims());
    serial.add_or_remove(&inputs, &mut a, &light, true);
    serial.change(&inputs, &mut a, &light, &next);

    let mut parallel = LightVolumeOrchestrator::new(RayonBackend::new(3).unwrap());
    let mut b = LightVolume::matching(volume.dims());
    parallel.add_or_remove(&inputs, &mut b, &light, true);
    parallel.change(&inputs, &mut b, &light, &next);

    assert_eq!(a.values(), b.values());
}

#[test]
fn batched_march_matches_single_run() {
    let volume = ramp_volume(8);
    let tf = ramp_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let light = DirectionalLight::new(Vec3::new(0.2, 0.9, -0.4).normalized(), 1.0);

    let mut whole = LightVolume::matching(volume.dims());
    LightVolumeOrchestrator::default().add_or_remove(&inputs, &mut whole, &light, true);

    let mut batched = LightVolume::matching(volume.dims());
    LightVolumeOrchestrator::default()
        .with_layers_per_batch(3)
        .add_or_remove(&inputs, &mut batched, &light, true);

    assert_eq!(whole.values(), batched.values());
}
