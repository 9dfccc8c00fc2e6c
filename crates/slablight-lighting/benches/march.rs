use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use slablight_geom::Vec3;
use slablight_lighting::{DirectionalLight, LightVolumeOrchestrator, RayonBackend, SerialBackend, VolumeInputs, WorldParameters};
use slablight_volume::{LightVolume, Rgba, ScalarVolume, TransferFunction};

fn test_volume(n: usize) -> ScalarVolume {
    let c = (n as f32 - 1.0) * 0.5;
    ScalarVolume::from_fn(n, n, n, |x, y, z| {
        let d = Vec3::new(x as f32 - c, y as f32 - c, z as f32 - c).length() / c;
        (1.0 - d).max(0.0)
    })
}

fn test_tf() -> TransferFunction {
    let samples = (0..256).map(|i| Rgba::new(1.0, 1.0, 1.0, i as f32 / 512.0)).collect();
    TransferFunction::from_samples(samples).unwrap()
}

fn bench_add_light(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_light_64");
    let volume = test_volume(64);
    let tf = test_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let oblique = DirectionalLight::new(Vec3::new(0.5, -0.3, 0.8).normalized(), 1.0);

    let mut serial = LightVolumeOrchestrator::new(SerialBackend);
    group.bench_function("serial_oblique", |b| {
        let mut lv = LightVolume::matching(volume.dims());
        b.iter(|| {
            serial.add_or_remove(&inputs, &mut lv, &oblique, true);
            black_box(lv.get(32, 32, 32));
        })
    });

    let mut parallel = LightVolumeOrchestrator::new(RayonBackend::new(0).unwrap());
    group.bench_function("rayon_oblique", |b| {
        let mut lv = LightVolume::matching(volume.dims());
        b.iter(|| {
            parallel.add_or_remove(&inputs, &mut lv, &oblique, true);
            black_box(lv.get(32, 32, 32));
        })
    });
    group.finish();
}

fn bench_change_light(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_light_64");
    let volume = test_volume(64);
    let tf = test_tf();
    let inputs = VolumeInputs::new(&volume, &tf, WorldParameters::default());
    let a = DirectionalLight::new(Vec3::new(0.3, 0.1, 1.0).normalized(), 1.0);
    let b_light = DirectionalLight::new(Vec3::new(0.32, 0.12, 1.0).normalized(), 1.0);

    let mut orch = LightVolumeOrchestrator::new(SerialBackend);
    group.bench_function("fused", |b| {
        let mut lv = LightVolume::matching(volume.dims());
        orch.add_or_remove(&inputs, &mut lv, &a, true);
        b.iter(|| {
            orch.change(&inputs, &mut lv, &a, &b_light);
            orch.change(&inputs, &mut lv, &b_light, &a);
            black_box(lv.get(10, 20, 30));
        })
    });
    group.bench_function("remove_then_add", |b| {
        let mut lv = LightVolume::matching(volume.dims());
        orch.add_or_remove(&inputs, &mut lv, &a, true);
        b.iter(|| {
            orch.add_or_remove(&inputs, &mut lv, &a, false);
            orch.add_or_remove(&inputs, &mut lv, &b_light, true);
            orch.add_or_remove(&inputs, &mut lv, &b_light, false);
            orch.add_or_remove(&inputs, &mut lv, &a, true);
            black_box(lv.get(10, 20, 30));
        })
    });
    group.finish();
}

fn short_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(3))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = short_config();
    targets = bench_add_light, bench_change_light
}
criterion_main!(benches);
