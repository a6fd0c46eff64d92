//! Random construction of feasible solutions and single-crate moves.
//!
//! Both operations use rejection sampling: draw an orientation and an origin,
//! keep the candidate if it fits against the loading grid, otherwise draw
//! again. Every crate gets at most `max_attempts` draws. A construction pass
//! that strands a crate is thrown away and started over on an empty truck,
//! at most `max_restarts` times.

use rand::Rng;

use crate::error::{Error, Result};
use crate::evaluator::{is_placeable, Evaluator};
use crate::freight::{Crate, Dimensions};
use crate::geometry::Orientation;
use crate::grid::LoadingGrid;
use crate::instruction::{PlacementInstruction, Solution};

/// Produces initial solutions and neighbors for the annealing loop.
#[derive(Debug, Clone)]
pub struct SolutionGenerator<'a> {
    evaluator: &'a Evaluator,
    max_attempts: usize,
    max_restarts: usize,
}

impl<'a> SolutionGenerator<'a> {
    pub fn new(evaluator: &'a Evaluator, max_attempts: usize) -> Self {
        Self {
            evaluator,
            max_attempts,
            max_restarts: 0,
        }
    }

    /// Sets how many fresh construction passes may follow a stranded one.
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }

    /// Places every crate, in input order, at a random free spot.
    ///
    /// Step numbers run from 1 in the same order. Early placements can leave
    /// no room for a later crate; such a pass is discarded and construction
    /// restarts on an empty truck. The last pass's error is returned once the
    /// restart budget is spent.
    pub fn initial_solution<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Solution> {
        let mut pass = 0;
        loop {
            match self.construct(rng) {
                Err(Error::PlacementInfeasible { crate_id, .. }) if pass < self.max_restarts => {
                    pass += 1;
                    tracing::debug!(
                        "Construction pass {} stranded crate {}, restarting",
                        pass,
                        crate_id
                    );
                }
                Err(e) => {
                    tracing::warn!("Initial construction failed after {} restarts: {}", pass, e);
                    return Err(e);
                }
                result => return result,
            }
        }
    }

    /// One construction pass over an empty truck.
    fn construct<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Solution> {
        let crates = self.evaluator.crates();
        let mut grid = LoadingGrid::new(self.evaluator.truck());
        let mut solution = Vec::with_capacity(crates.len());

        for (step_index, item) in crates.iter().enumerate() {
            let step_number = step_index as u32 + 1;
            let (instruction, oriented) = self.sample_free_spot(item, step_number, &grid, rng)?;
            grid.commit(&instruction, oriented);
            solution.push(instruction);
        }

        Ok(solution)
    }

    /// Moves one randomly chosen crate to a new random spot that is free of
    /// every other crate in the solution.
    ///
    /// The moved crate keeps its step number; all other instructions are
    /// copied unchanged.
    pub fn neighbor<R: Rng + ?Sized>(
        &self,
        solution: &[PlacementInstruction],
        rng: &mut R,
    ) -> Result<Solution> {
        let mut next = solution.to_vec();
        if next.is_empty() {
            return Ok(next);
        }

        let index = rng.gen_range(0..next.len());
        let moved = next[index];
        let item = Crate {
            id: moved.crate_id,
            dimensions: self.evaluator.dimensions_of(moved.crate_id)?,
        };
        let grid = self.evaluator.loading_grid(solution, Some(index))?;
        let (instruction, _) = self
            .sample_free_spot(&item, moved.step_number, &grid, rng)
            .inspect_err(|e| tracing::warn!("Neighbor move failed: {}", e))?;
        next[index] = instruction;

        Ok(next)
    }

    /// Draws orientations and origins until one is placeable on `grid`.
    ///
    /// An orientation that sticks out of the truck on some axis uses up an
    /// attempt without drawing an origin.
    fn sample_free_spot<R: Rng + ?Sized>(
        &self,
        item: &Crate,
        step_number: u32,
        grid: &LoadingGrid,
        rng: &mut R,
    ) -> Result<(PlacementInstruction, Dimensions)> {
        let truck = self.evaluator.truck().dimensions;

        for _ in 0..self.max_attempts {
            let orientation = Orientation::random(rng);
            let oriented = orientation.resolve(item.dimensions);
            if !oriented.fits_within(&truck) {
                continue;
            }

            let origin = (
                rng.gen_range(0..=truck.width - oriented.width),
                rng.gen_range(0..=truck.height - oriented.height),
                rng.gen_range(0..=truck.length - oriented.length),
            );
            let instruction = PlacementInstruction {
                step_number,
                crate_id: item.id,
                origin,
                orientation,
            };
            if is_placeable(&instruction, oriented, grid) {
                return Ok((instruction, oriented));
            }
        }

        tracing::debug!(
            "Crate {} found no free spot in {} attempts",
            item.id,
            self.max_attempts
        );
        Err(Error::PlacementInfeasible {
            crate_id: item.id,
            attempts: self.max_attempts,
        })
    }
}
