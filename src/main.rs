use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use disksim::{SimConfig, Simulation, SnapshotWriter};
use log::info;
use std::fs;
use std::path::PathBuf;

/// Event-driven hard-disk simulator.
///
/// Scatters particles inside a circular container, runs the event loop to
/// the time limit, and writes one positions file per snapshot period under
/// a timestamped run directory, next to the exact config that produced it.
#[derive(Debug, Parser)]
#[command(name = "disksim", version)]
struct Args {
    /// Container radius.
    #[arg(long, default_value_t = 0.05)]
    big_radius: f64,

    /// Radius of the fixed central obstacle.
    #[arg(long, default_value_t = 0.005)]
    small_radius: f64,

    /// Remove the central obstacle entirely.
    #[arg(long)]
    no_obstacle: bool,

    /// Particle radius (zero for point particles).
    #[arg(long, default_value_t = 0.0005)]
    particle_radius: f64,

    /// Initial speed of every particle.
    #[arg(long, default_value_t = 0.05)]
    speed: f64,

    /// Mass of every particle.
    #[arg(long, default_value_t = 1.0)]
    mass: f64,

    /// Simulated time horizon.
    #[arg(long, default_value_t = 10.0)]
    time_limit: f64,

    /// Interval between state snapshots.
    #[arg(long, default_value_t = 0.01)]
    redraw_period: f64,

    /// Number of particles.
    #[arg(short = 'n', long, default_value_t = 5)]
    particle_count: usize,

    /// Wrap neighbor queries around the bounding box.
    #[arg(long)]
    periodic: bool,

    /// Cells per axis of the neighbor grid.
    #[arg(long, default_value_t = 5)]
    grid_cells: usize,

    /// Neighbor cutoff radius; defaults to speed * redraw_period.
    #[arg(long)]
    neighbor_radius: Option<f64>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Parent directory for run outputs.
    #[arg(long, default_value = "results")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimConfig {
        big_radius: args.big_radius,
        small_radius: (!args.no_obstacle).then_some(args.small_radius),
        particle_radius: args.particle_radius,
        speed: args.speed,
        mass: args.mass,
        time_limit: args.time_limit,
        redraw_period: args.redraw_period,
        particle_count: args.particle_count,
        periodic: args.periodic,
        grid_cells: args.grid_cells,
        neighbor_radius: args.neighbor_radius,
        seed: args.seed,
    };

    let run_dir = args
        .out
        .join(Local::now().format("%Y-%m-%d-%H-%M-%S").to_string());
    let snapshot_dir = run_dir.join("snapshots");
    fs::create_dir_all(&snapshot_dir)
        .with_context(|| format!("creating {}", snapshot_dir.display()))?;

    let config_path = run_dir.join("config.json");
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;
    info!("run directory {}", run_dir.display());

    let mut sim = Simulation::new(config)?;
    let mut sink = SnapshotWriter::new(&snapshot_dir)?;
    sim.run(&mut sink)?;

    println!(
        "run complete: t = {:.3}, {} events processed, output in {}",
        sim.time(),
        sim.events_processed(),
        run_dir.display()
    );
    Ok(())
}
