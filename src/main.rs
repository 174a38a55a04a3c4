//! pmdrift headless runner
//!
//! Drives a scene with a simulated host and reports how the population
//! evolves.
//!
//! Usage: `pmdrift --measurement 35 --seconds 120 [--config scene.json]`

use anyhow::Context;
use clap::Parser;
use pmdrift::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pmdrift", version, about = "Simulate a PM2.5 particle scene headlessly")]
struct Cli {
    /// PM2.5 concentration in µg/m³
    #[arg(short, long, default_value_t = 25.0)]
    measurement: f32,

    /// Scene configuration JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 60)]
    seconds: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    if let Some(path) = &cli.dump_config {
        config
            .save(path)
            .with_context(|| format!("writing scene config {}", path.display()))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let fps = cli.fps.max(1);
    let frame = Duration::from_secs(1) / fps;

    let mut host = ManualHost::new();
    let mut sink = RecordingSink::new();
    let mut scene = Scene::from_config(cli.measurement, &config)?;

    println!("=== pmdrift ===");
    println!("Measurement: {} µg/m³", cli.measurement);
    println!("Capacity: {}", config.capacity);
    println!("Density exponent: {}", config.density_exponent);
    println!("Spawn period: {:?}", config.spawn_period());
    println!();

    let activation = scene.activate(&mut host).context("activating scene")?;
    log::info!("activation: {activation:?}");
    scene.present(&mut sink);
    println!("After burst: {} live", scene.population().len());

    for second in 1..=cli.seconds {
        for _ in 0..fps {
            for timer in host.advance(frame) {
                scene.on_timer(timer);
            }
            scene.on_frame(Some(frame));
            scene.present(&mut sink);
        }

        let max_offset = scene
            .population()
            .iter()
            .map(|p| p.displacement().abs().max_element())
            .fold(0.0f32, f32::max);
        log::info!(
            "t={second}s live={} admitted={} evicted={} max_offset={max_offset:.3}",
            scene.population().len(),
            sink.admitted.len(),
            sink.removed.len(),
        );
    }

    let live = scene.population().len();
    scene.teardown(&mut host);
    scene.present(&mut sink);

    println!("Simulated: {} s at {} fps", cli.seconds, fps);
    println!("Live at end: {live}");
    println!("Admitted: {}", sink.admitted.len());
    println!("Removed: {}", sink.removed.len());
    println!("Timers left running: {}", host.active_timers());

    Ok(())
}

/// `-v` flags override `RUST_LOG`; without them `RUST_LOG` applies, else `warn`.
fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = verbosity_filter(verbose) {
        builder.filter_level(level);
    }
    builder.init();
}

fn verbosity_filter(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}
