use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use slablight_lighting::{
    ChangeOutcome, ComputeBackend, LightVolumeOrchestrator, RayonBackend, SerialBackend, VolumeInputs,
};
use slablight_volume::LightVolume;

mod phantom;
mod report;
mod scene;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Op {
    /// Add the scene light to a cleared light volume.
    Add,
    /// Remove the scene light from a cleared light volume.
    Remove,
    /// Add the scene light, then change it to the `[change]` light.
    Change,
    /// Add then remove the scene light and report the residual.
    Roundtrip,
}

#[derive(Parser, Debug)]
#[command(name = "slablight", about = "Propagate a directional light through a synthetic volume")]
struct Args {
    /// Scene description (TOML). Built-in defaults are used when absent.
    #[arg(long, default_value = "scenes/default.toml")]
    scene: PathBuf,
    #[arg(long, value_enum, default_value_t = Op::Add)]
    op: Op,
    /// Write the final light volume as raw little-endian f32.
    #[arg(long)]
    dump: Option<PathBuf>,
    /// March layers on a rayon pool.
    #[arg(long)]
    parallel: bool,
    /// Worker threads for --parallel (0 = rayon default).
    #[arg(long)]
    threads: Option<usize>,
    /// Noise phantom seed.
    #[arg(long)]
    seed: Option<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = if args.scene.exists() {
        scene::load_scene(&args.scene)?
    } else {
        log::warn!("scene {} not found; using built-in defaults", args.scene.display());
        scene::SceneConfig::default()
    };
    if args.parallel {
        cfg.march.parallel = true;
    }
    if let Some(t) = args.threads {
        cfg.march.threads = t;
    }

    if cfg.march.parallel {
        let backend = RayonBackend::new(cfg.march.threads)?;
        log::info!("rayon backend with {} threads", backend.threads());
        run(&args, &cfg, backend)
    } else {
        run(&args, &cfg, SerialBackend)
    }
}

fn run<B: ComputeBackend>(args: &Args, cfg: &scene::SceneConfig, backend: B) -> Result<(), Box<dyn Error>> {
    let t0 = Instant::now();
    let volume = phantom::build_volume(&cfg.volume, args.seed);
    let tf = cfg.transfer_function.build()?;
    let world = cfg.world.to_params()?;
    log::info!(
        target: "perf",
        "ms={:.3} setup phantom={:?} dims={:?}",
        t0.elapsed().as_secs_f64() * 1000.0,
        cfg.volume.phantom,
        volume.dims()
    );
    report::log_density_mips(volume.grid());

    let inputs = VolumeInputs::new(&volume, &tf, world);
    let mut orch = LightVolumeOrchestrator::new(backend).with_layers_per_batch(cfg.march.layers_per_batch);
    let mut lv = LightVolume::matching(volume.dims());
    orch.clear(&mut lv, cfg.march.clear_value);

    let light = cfg.light.to_light();
    match args.op {
        Op::Add => {
            if !orch.add_or_remove(&inputs, &mut lv, &light, true) {
                return Err("scene light has a zero direction".into());
            }
        }
        Op::Remove => {
            if !orch.add_or_remove(&inputs, &mut lv, &light, false) {
                return Err("scene light has a zero direction".into());
            }
        }
        Op::Change => {
            let Some(target) = cfg.change.as_ref() else {
                return Err("--op change needs a [change] section in the scene".into());
            };
            orch.add_or_remove(&inputs, &mut lv, &light, true);
            report::log_light_volume("before change", &lv);
            let outcome = orch.change(&inputs, &mut lv, &light, &target.to_light());
            log::info!("change outcome: {:?}", outcome);
            if outcome == ChangeOutcome::Ignored {
                return Err("[change] light has a zero direction".into());
            }
        }
        Op::Roundtrip => {
            let before = lv.values().to_vec();
            orch.add_or_remove(&inputs, &mut lv, &light, true);
            report::log_light_volume("after add", &lv);
            orch.add_or_remove(&inputs, &mut lv, &light, false);
            log::info!("roundtrip residual: {:.3e}", report::max_abs_diff(&before, lv.values()));
        }
    }
    report::log_light_volume("light volume", &lv);

    if let Some(path) = &args.dump {
        report::dump_raw(&lv, path)?;
    }
    log::info!(target: "perf", "ms={:.3} total op={:?}", t0.elapsed().as_secs_f64() * 1000.0, args.op);
    Ok(())
}
