//! Placement validity checks and solution energy.
//!
//! Energy is the number of cells a solution puts outside the truck or on top
//! of a cell some earlier crate already fills. Zero energy means every crate
//! sits inside the truck and no two crates intersect.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::freight::{Crate, Dimensions, Truck};
use crate::geometry::fitting_orientations;
use crate::grid::{LoadingGrid, ScoringGrid, MAX_CELLS};
use crate::instruction::PlacementInstruction;

/// Returns true if the crate's oriented box fits inside the truck and touches
/// no cell already committed to `grid`. Never mutates the grid.
pub fn is_placeable(
    instruction: &PlacementInstruction,
    oriented: Dimensions,
    grid: &LoadingGrid,
) -> bool {
    instruction.cells(oriented).all(|cell| grid.is_free(cell))
}

/// Validated view of a loading problem: the truck plus a lookup from crate id
/// to the crate's resting dimensions.
#[derive(Debug, Clone)]
pub struct Evaluator {
    truck: Truck,
    crates: Vec<Crate>,
    dimensions_by_id: FxHashMap<u32, Dimensions>,
}

impl Evaluator {
    /// Validates the problem before any sampling starts.
    ///
    /// Rejects zero extents, trucks too large to grid, duplicate ids, crates
    /// that fit the truck in no orientation and crate sets whose combined
    /// volume exceeds the truck's.
    pub fn new(truck: Truck, crates: &[Crate]) -> Result<Self> {
        if truck.dimensions.is_degenerate() {
            return Err(Error::invalid(format!(
                "truck dimensions must be positive, got {}",
                truck.dimensions
            )));
        }
        if truck.dimensions.volume() > MAX_CELLS {
            return Err(Error::invalid(format!(
                "truck {} has {} cells, more than the limit of {}",
                truck.dimensions,
                truck.dimensions.volume(),
                MAX_CELLS
            )));
        }

        let mut seen_ids = FxHashSet::default();
        let mut total_volume = 0u64;
        for item in crates {
            if item.dimensions.is_degenerate() {
                return Err(Error::invalid(format!(
                    "crate {} dimensions must be positive, got {}",
                    item.id, item.dimensions
                )));
            }
            if !seen_ids.insert(item.id) {
                return Err(Error::invalid(format!("duplicate crate id {}", item.id)));
            }
            if fitting_orientations(item.dimensions, &truck.dimensions).is_empty() {
                return Err(Error::invalid(format!(
                    "crate {} ({}) does not fit truck {} in any orientation",
                    item.id, item.dimensions, truck.dimensions
                )));
            }
            total_volume = total_volume.saturating_add(item.dimensions.volume());
        }

        if total_volume > truck.dimensions.volume() {
            return Err(Error::invalid(format!(
                "crates need {} cells but truck {} holds only {}",
                total_volume,
                truck.dimensions,
                truck.dimensions.volume()
            )));
        }

        let dimensions_by_id = crates.iter().map(|c| (c.id, c.dimensions)).collect();
        Ok(Self {
            truck,
            crates: crates.to_vec(),
            dimensions_by_id,
        })
    }

    pub fn truck(&self) -> &Truck {
        &self.truck
    }

    /// Crates in input order.
    pub fn crates(&self) -> &[Crate] {
        &self.crates
    }

    /// Resting dimensions of a crate.
    pub fn dimensions_of(&self, crate_id: u32) -> Result<Dimensions> {
        self.dimensions_by_id
            .get(&crate_id)
            .copied()
            .ok_or_else(|| Error::invalid(format!("unknown crate id {crate_id}")))
    }

    /// Extents of the instruction's crate after its turn flags are applied.
    pub fn oriented_dimensions(&self, instruction: &PlacementInstruction) -> Result<Dimensions> {
        Ok(instruction
            .orientation
            .resolve(self.dimensions_of(instruction.crate_id)?))
    }

    /// Counts cells that fall outside the truck or collide with an earlier
    /// crate of the same solution. Each call scores on a fresh grid.
    pub fn energy(&self, solution: &[PlacementInstruction]) -> Result<u64> {
        let mut grid = ScoringGrid::new(&self.truck);
        let mut overlaps = 0u64;

        for instruction in solution {
            let oriented = self.oriented_dimensions(instruction)?;
            for cell in instruction.cells(oriented) {
                if !grid.occupy(cell) {
                    overlaps += 1;
                }
            }
        }

        Ok(overlaps)
    }

    /// Builds a loading grid holding every instruction except the one at
    /// `skip`, if given.
    pub fn loading_grid(
        &self,
        solution: &[PlacementInstruction],
        skip: Option<usize>,
    ) -> Result<LoadingGrid> {
        let mut grid = LoadingGrid::new(&self.truck);
        for (index, instruction) in solution.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            grid.commit(instruction, self.oriented_dimensions(instruction)?);
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freight::Coord;
    use crate::geometry::Orientation;

    fn place(step_number: u32, crate_id: u32, origin: Coord) -> PlacementInstruction {
        PlacementInstruction {
            step_number,
            crate_id,
            origin,
            orientation: Orientation::UPRIGHT,
        }
    }

    fn two_bar_problem() -> Evaluator {
        Evaluator::new(
            Truck::new(4, 1, 1),
            &[Crate::new(1, 2, 1, 1), Crate::new(2, 2, 1, 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_energy_zero_for_disjoint_boxes() {
        let evaluator = two_bar_problem();
        let solution = vec![place(1, 1, (0, 0, 0)), place(2, 2, (2, 0, 0))];
        assert_eq!(evaluator.energy(&solution).unwrap(), 0);
    }

    #[test]
    fn test_energy_counts_overlapping_cells() {
        let evaluator = two_bar_problem();
        let solution = vec![place(1, 1, (0, 0, 0)), place(2, 2, (1, 0, 0))];
        assert_eq!(evaluator.energy(&solution).unwrap(), 1);

        let stacked = vec![place(1, 1, (0, 0, 0)), place(2, 2, (0, 0, 0))];
        assert_eq!(evaluator.energy(&stacked).unwrap(), 2);
    }

    #[test]
    fn test_energy_counts_out_of_bounds_cells() {
        let evaluator = two_bar_problem();
        let solution = vec![place(1, 1, (0, 0, 0)), place(2, 2, (3, 0, 0))];
        assert_eq!(evaluator.energy(&solution).unwrap(), 1);

        let turned = PlacementInstruction {
            orientation: Orientation::new(false, true),
            ..place(2, 2, (2, 0, 0))
        };
        // 2x1x1 tipped on its side is 2x1x1; turned horizontally it is 1x1x2
        assert_eq!(evaluator.energy(&[place(1, 1, (0, 0, 0)), turned]).unwrap(), 0);
        let spun = PlacementInstruction {
            orientation: Orientation::new(true, false),
            ..place(2, 2, (2, 0, 0))
        };
        assert_eq!(evaluator.energy(&[place(1, 1, (0, 0, 0)), spun]).unwrap(), 1);
    }

    #[test]
    fn test_energy_is_repeatable() {
        let evaluator = two_bar_problem();
        let solution = vec![place(1, 1, (1, 0, 0)), place(2, 2, (2, 0, 0))];
        let first = evaluator.energy(&solution).unwrap();
        assert_eq!(evaluator.energy(&solution).unwrap(), first);
        assert_eq!(first, 1);
    }

    #[test]
    fn test_energy_rejects_unknown_crate() {
        let evaluator = two_bar_problem();
        let result = evaluator.energy(&[place(1, 99, (0, 0, 0))]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_is_placeable_respects_grid_and_bounds() {
        let evaluator = two_bar_problem();
        let first = place(1, 1, (0, 0, 0));
        let grid = evaluator.loading_grid(&[first], None).unwrap();
        let bar = Dimensions::new(2, 1, 1);

        assert!(is_placeable(&place(2, 2, (2, 0, 0)), bar, &grid));
        assert!(!is_placeable(&place(2, 2, (1, 0, 0)), bar, &grid));
        assert!(!is_placeable(&place(2, 2, (3, 0, 0)), bar, &grid));
        // checking does not commit anything
        assert_eq!(grid.occupied_cells(), 2);
    }

    #[test]
    fn test_placeable_construction_has_zero_energy() {
        let evaluator = Evaluator::new(
            Truck::new(3, 2, 2),
            &[
                Crate::new(1, 3, 1, 1),
                Crate::new(2, 1, 2, 1),
                Crate::new(3, 2, 1, 2),
            ],
        )
        .unwrap();
        let solution = vec![
            place(1, 1, (0, 0, 0)),
            place(2, 2, (0, 0, 1)),
            place(3, 3, (1, 0, 0)),
        ];

        let mut grid = LoadingGrid::new(evaluator.truck());
        let mut all_placeable = true;
        for instruction in &solution {
            let oriented = evaluator.oriented_dimensions(instruction).unwrap();
            all_placeable &= is_placeable(instruction, oriented, &grid);
            grid.commit(instruction, oriented);
        }

        // crate 3 collides with crate 1 at (1, 0, 0)
        assert!(!all_placeable);
        assert!(evaluator.energy(&solution).unwrap() > 0);

        let fixed = vec![
            place(1, 1, (0, 0, 0)),
            place(2, 2, (0, 0, 1)),
            place(3, 3, (1, 1, 0)),
        ];
        assert_eq!(evaluator.energy(&fixed).unwrap(), 0);
    }

    #[test]
    fn test_loading_grid_skips_moved_crate() {
        let evaluator = two_bar_problem();
        let solution = vec![place(1, 1, (0, 0, 0)), place(2, 2, (2, 0, 0))];
        let grid = evaluator.loading_grid(&solution, Some(0)).unwrap();
        assert!(grid.is_free((0, 0, 0)));
        assert!(!grid.is_free((2, 0, 0)));
    }

    #[test]
    fn test_rejects_crate_that_never_fits() {
        let result = Evaluator::new(Truck::new(1, 1, 1), &[Crate::new(1, 2, 1, 1)]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_accepts_crate_that_fits_only_turned() {
        let result = Evaluator::new(Truck::new(1, 1, 3), &[Crate::new(1, 3, 1, 1)]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            Evaluator::new(Truck::new(0, 1, 1), &[]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Evaluator::new(Truck::new(2, 2, 2), &[Crate::new(1, 1, 0, 1)]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_truck_too_large_to_grid() {
        let result = Evaluator::new(Truck::new(100_000, 100_000, 100_000), &[]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // the limit itself is still accepted
        let at_limit = Evaluator::new(Truck::new(1 << 9, 1 << 9, 1 << 9), &[]);
        assert!(at_limit.is_ok());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Evaluator::new(
            Truck::new(4, 1, 1),
            &[Crate::new(7, 1, 1, 1), Crate::new(7, 1, 1, 1)],
        );
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidInput("duplicate crate id 7".to_string())
        );
    }

    #[test]
    fn test_rejects_excess_volume() {
        let result = Evaluator::new(
            Truck::new(2, 1, 1),
            &[Crate::new(1, 2, 1, 1), Crate::new(2, 1, 1, 1)],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
