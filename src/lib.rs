//! Truck Loading Planner Library
//!
//! Places rectangular crates inside a truck's cargo volume with simulated
//! annealing and returns step-by-step loading instructions.

pub mod annealing;
pub mod error;
pub mod evaluator;
pub mod freight;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod instruction;

use std::collections::BTreeMap;

use rand::Rng;

pub use annealing::{AnnealingConfig, AnnealingStats};
pub use error::{Error, Result};
pub use freight::{Crate, Dimensions, Truck};
pub use geometry::Orientation;
pub use instruction::PlacementInstruction;

use annealing::Annealer;
use evaluator::Evaluator;

/// The result of a solve: instructions keyed by step number.
#[derive(Debug, Clone)]
pub struct LoadingPlan {
    truck: Truck,
    steps: BTreeMap<u32, PlacementInstruction>,
    crates: Vec<Crate>,
    stats: AnnealingStats,
}

impl LoadingPlan {
    /// Instructions keyed by step number, starting at 1.
    pub fn steps(&self) -> &BTreeMap<u32, PlacementInstruction> {
        &self.steps
    }

    /// Instructions in step order.
    pub fn instructions(&self) -> impl Iterator<Item = &PlacementInstruction> {
        self.steps.values()
    }

    pub fn truck(&self) -> &Truck {
        &self.truck
    }

    /// Overlapping and out-of-bounds cells left in the plan; 0 when valid.
    pub fn energy(&self) -> u64 {
        self.stats.best_energy
    }

    pub fn stats(&self) -> &AnnealingStats {
        &self.stats
    }

    /// One line per step, as printed for the loading crew.
    pub fn format_steps(&self) -> String {
        instruction::format_steps(self.instructions())
    }

    /// Layer-by-layer drawing of the loaded truck.
    pub fn format_cargo_map(&self) -> String {
        let placements = self.crates.iter().filter_map(|item| {
            self.steps
                .values()
                .find(|step| step.crate_id == item.id)
                .map(|step| (step, item.dimensions))
        });
        grid::format_cargo_map(&self.truck, placements)
    }
}

/// Plans how to load `crates` into `truck`.
///
/// Validates the input, builds a random collision-free starting solution,
/// anneals it, and logs each resulting step in order. Fails without a
/// partial result if the input is invalid or a crate cannot be placed within
/// the configured number of attempts.
pub fn plan_loading<R: Rng + ?Sized>(
    truck: Truck,
    crates: &[Crate],
    config: AnnealingConfig,
    rng: &mut R,
) -> Result<LoadingPlan> {
    let evaluator = Evaluator::new(truck, crates)?;
    let annealer = Annealer::new(&evaluator, config)?;

    let (solution, stats) = if crates.is_empty() {
        (Vec::new(), AnnealingStats::default())
    } else {
        let initial = annealer.generator().initial_solution(rng)?;
        annealer.anneal(initial, rng)?
    };

    let steps: BTreeMap<u32, PlacementInstruction> = solution
        .into_iter()
        .map(|instruction| (instruction.step_number, instruction))
        .collect();
    for instruction in steps.values() {
        tracing::info!("{}", instruction);
    }

    Ok(LoadingPlan {
        truck,
        steps,
        crates: crates.to_vec(),
        stats,
    })
}
