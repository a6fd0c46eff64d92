//! Placement instructions: where and how each crate goes into the truck.

use std::fmt;

use crate::freight::{Coord, Dimensions};
use crate::geometry::Orientation;

/// One crate's assigned position and orientation.
///
/// Covers the cells `[x, x+w) × [y, y+h) × [z, z+l)` where `(w, h, l)` are the
/// crate's extents after `orientation` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementInstruction {
    /// 1-based loading order.
    pub step_number: u32,
    pub crate_id: u32,
    /// Corner of the crate with the smallest coordinates.
    pub origin: Coord,
    pub orientation: Orientation,
}

/// One instruction per input crate, in step order.
pub type Solution = Vec<PlacementInstruction>;

impl PlacementInstruction {
    /// Iterates over every cell covered by a crate of extents `oriented`
    /// (already turned) placed at this instruction's origin.
    ///
    /// Cells may lie outside the truck; callers decide how to treat them.
    pub fn cells(&self, oriented: Dimensions) -> impl Iterator<Item = Coord> {
        let (ox, oy, oz) = self.origin;
        (0..oriented.width).flat_map(move |dx| {
            (0..oriented.height).flat_map(move |dy| {
                (0..oriented.length).map(move |dz| {
                    (ox.saturating_add(dx), oy.saturating_add(dy), oz.saturating_add(dz))
                })
            })
        })
    }
}

impl fmt::Display for PlacementInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.origin;
        write!(
            f,
            "Step {}: Crate {} at ({}, {}, {}) with TurnHorizontal={}, TurnVertical={}",
            self.step_number,
            self.crate_id,
            x,
            y,
            z,
            self.orientation.turn_horizontal,
            self.orientation.turn_vertical
        )
    }
}

/// Formats instructions one per line, in the order given.
pub fn format_steps<'a>(instructions: impl IntoIterator<Item = &'a PlacementInstruction>) -> String {
    let mut output = String::new();
    for instruction in instructions {
        output.push_str(&instruction.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(step_number: u32, origin: Coord) -> PlacementInstruction {
        PlacementInstruction {
            step_number,
            crate_id: step_number * 10,
            origin,
            orientation: Orientation::new(true, false),
        }
    }

    #[test]
    fn test_cells_cover_box() {
        let cells: Vec<Coord> = instruction(1, (1, 0, 2))
            .cells(Dimensions::new(2, 1, 2))
            .collect();
        assert_eq!(cells, vec![(1, 0, 2), (1, 0, 3), (2, 0, 2), (2, 0, 3)]);
    }

    #[test]
    fn test_cells_count_matches_volume() {
        let dims = Dimensions::new(3, 4, 5);
        assert_eq!(instruction(1, (0, 0, 0)).cells(dims).count() as u64, dims.volume());
    }

    #[test]
    fn test_format_steps() {
        let steps = [instruction(1, (0, 0, 0)), instruction(2, (2, 1, 3))];
        insta::assert_snapshot!(format_steps(&steps), @r"
        Step 1: Crate 10 at (0, 0, 0) with TurnHorizontal=true, TurnVertical=false
        Step 2: Crate 20 at (2, 1, 3) with TurnHorizontal=true, TurnVertical=false
        ");
    }
}
