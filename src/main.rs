//! Truck Loading Planner
//!
//! Computes where each crate goes in a truck's cargo volume so that no two
//! crates collide, and prints the loading steps in order.

use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use truckload::{plan_loading, AnnealingConfig, Crate, Dimensions, Truck};

/// Plans how to load crates into a truck and prints the loading steps.
#[derive(Parser, Debug)]
#[command(name = "truckload")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cargo volume as WIDTHxHEIGHTxLENGTH, e.g. 4x2x6.
    #[arg(long, value_parser = parse_dimensions)]
    truck: Dimensions,

    /// A crate as WIDTHxHEIGHTxLENGTH; repeat once per crate. Ids are
    /// assigned from 1 in argument order.
    #[arg(long = "crate", value_parser = parse_dimensions)]
    crates: Vec<Dimensions>,

    /// Seed for the random generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Starting annealing temperature.
    #[arg(long, default_value_t = 1000.0)]
    initial_temperature: f64,

    /// Fraction of the temperature removed per iteration.
    #[arg(long, default_value_t = 0.003)]
    cooling_rate: f64,

    /// Sampling attempts per crate before giving up.
    #[arg(long, default_value_t = 100_000)]
    max_attempts: usize,

    /// Fresh construction passes allowed when a crate is left without room.
    #[arg(long, default_value_t = 100)]
    max_restarts: usize,

    /// Stop annealing as soon as a collision-free plan is found.
    #[arg(long)]
    stop_at_zero: bool,

    /// Also print a layer-by-layer map of the loaded truck.
    #[arg(long)]
    map: bool,
}

impl Cli {
    fn annealing_config(&self) -> AnnealingConfig {
        AnnealingConfig::new()
            .with_initial_temperature(self.initial_temperature)
            .with_cooling_rate(self.cooling_rate)
            .with_max_attempts(self.max_attempts)
            .with_max_restarts(self.max_restarts)
            .with_stop_at_zero_energy(self.stop_at_zero)
    }

    fn manifest(&self) -> Vec<Crate> {
        self.crates
            .iter()
            .zip(1..)
            .map(|(dims, id)| Crate { id, dimensions: *dims })
            .collect()
    }
}

/// Parses `WxHxL` into dimensions.
fn parse_dimensions(text: &str) -> Result<Dimensions, String> {
    let extents = text
        .split(['x', 'X'])
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid extent '{part}': {e}"))
        })
        .collect::<Result<Vec<u32>, String>>()?;

    match extents[..] {
        [width, height, length] => Ok(Dimensions::new(width, height, length)),
        _ => Err(format!("expected WIDTHxHEIGHTxLENGTH, got '{text}'")),
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    enable_tracing();

    let truck = Truck {
        dimensions: cli.truck,
    };
    let crates = cli.manifest();
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

    tracing::info!(
        "Loading {} crates into truck {} (seed {})",
        crates.len(),
        truck.dimensions,
        cli.seed
    );

    match plan_loading(truck, &crates, cli.annealing_config(), &mut rng) {
        Ok(plan) => {
            println!("Valid Loading Instructions:");
            print!("{}", plan.format_steps());
            println!("Energy: {}", plan.energy());
            if cli.map {
                println!();
                print!("{}", plan.format_cargo_map());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to plan loading: {}", e);
            ExitCode::FAILURE
        }
    }
}
