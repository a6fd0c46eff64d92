//! Occupancy grids for the cargo volume.
//!
//! The volume is stored as a flat bitset, one bit per unit cell, indexed
//! x-major: `idx = (x * height + y) * length + z`.
//!
//! Two grid types share that storage but are never interchangeable:
//! - [`LoadingGrid`] records crates committed while a solution is being
//!   built and decides whether a new crate still fits.
//! - [`ScoringGrid`] is created fresh for every energy evaluation and only
//!   counts collisions.

use crate::freight::{Coord, Dimensions, Truck};
use crate::instruction::PlacementInstruction;

const WORD_BITS: usize = u64::BITS as usize;

/// Largest cargo volume, in cells, a grid will be allocated for.
pub const MAX_CELLS: u64 = 1 << 27;

/// Converts (x, y, z) coordinates to a linear cell index.
///
/// The coordinate must lie inside `dims`.
#[inline(always)]
pub const fn coord_to_idx(dims: &Dimensions, (x, y, z): Coord) -> usize {
    (x as usize * dims.height as usize + y as usize) * dims.length as usize + z as usize
}

/// Bit-per-cell storage sized to a truck.
#[derive(Debug, Clone)]
struct CellBits {
    truck: Truck,
    words: Vec<u64>,
}

impl CellBits {
    fn new(truck: &Truck) -> Self {
        let cell_count = truck.dimensions.volume() as usize;
        Self {
            truck: *truck,
            words: vec![0; cell_count.div_ceil(WORD_BITS)],
        }
    }

    #[inline]
    fn position(&self, coord: Coord) -> Option<(usize, u64)> {
        if !self.truck.contains(coord) {
            return None;
        }
        let idx = coord_to_idx(&self.truck.dimensions, coord);
        Some((idx / WORD_BITS, 1u64 << (idx % WORD_BITS)))
    }

    #[inline]
    fn get(&self, coord: Coord) -> Option<bool> {
        self.position(coord)
            .map(|(word, mask)| self.words[word] & mask != 0)
    }

    /// Marks the cell; returns false if it was out of bounds or already set.
    #[inline]
    fn set(&mut self, coord: Coord) -> bool {
        match self.position(coord) {
            Some((word, mask)) if self.words[word] & mask == 0 => {
                self.words[word] |= mask;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }
}

/// Persistent grid of crates committed during solution construction.
#[derive(Debug, Clone)]
pub struct LoadingGrid {
    bits: CellBits,
}

impl LoadingGrid {
    pub fn new(truck: &Truck) -> Self {
        Self {
            bits: CellBits::new(truck),
        }
    }

    /// Returns true if the cell is inside the truck and free.
    #[inline]
    pub fn is_free(&self, coord: Coord) -> bool {
        self.bits.get(coord) == Some(false)
    }

    /// Marks every cell of the crate's box as occupied.
    ///
    /// Callers must check placeability first; cells outside the truck are
    /// skipped.
    pub fn commit(&mut self, instruction: &PlacementInstruction, oriented: Dimensions) {
        for cell in instruction.cells(oriented) {
            self.bits.set(cell);
        }
    }

    /// Number of occupied cells.
    #[cfg(test)]
    pub(crate) fn occupied_cells(&self) -> u64 {
        self.bits.count_ones()
    }
}

/// Scratch grid used to count collisions in one energy evaluation.
#[derive(Debug)]
pub struct ScoringGrid {
    bits: CellBits,
}

impl ScoringGrid {
    pub fn new(truck: &Truck) -> Self {
        Self {
            bits: CellBits::new(truck),
        }
    }

    /// Marks the cell. Returns false if the cell is outside the truck or
    /// was already taken, i.e. the cell is a collision.
    #[inline]
    pub fn occupy(&mut self, coord: Coord) -> bool {
        self.bits.set(coord)
    }
}

/// Formats a loaded truck as a human-readable string.
///
/// Each height level is drawn as a top-down slice, bottom level first, with
/// the slices side by side. Rows run along the length axis and columns along
/// the width axis. Cells show the step number of the crate that fills them
/// (`1`-`9`, then `A`-`Z`, `#` beyond that) and `.` when empty.
///
/// `placements` pairs each instruction with the crate's unturned dimensions.
pub fn format_cargo_map<'a>(
    truck: &Truck,
    placements: impl IntoIterator<Item = (&'a PlacementInstruction, Dimensions)>,
) -> String {
    let dims = truck.dimensions;
    let mut steps = vec![0u32; dims.volume() as usize];
    for (instruction, resting) in placements {
        let oriented = instruction.orientation.resolve(resting);
        for cell in instruction.cells(oriented) {
            if truck.contains(cell) {
                steps[coord_to_idx(&dims, cell)] = instruction.step_number;
            }
        }
    }

    let labels: Vec<String> = (0..dims.height).map(|y| format!("y={y}")).collect();
    let column_width = labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(dims.width as usize);

    let mut output = String::new();
    let mut line = String::new();
    for label in &labels {
        if !line.is_empty() {
            line.push_str("  ");
        }
        line.push_str(&format!("{label:<column_width$}"));
    }
    output.push_str(line.trim_end());
    output.push('\n');

    for z in 0..dims.length {
        line.clear();
        for y in 0..dims.height {
            if y > 0 {
                line.push_str("  ");
            }
            for x in 0..dims.width {
                line.push(step_symbol(steps[coord_to_idx(&dims, (x, y, z))]));
            }
            // pad short slices so the next level starts in its own column
            for _ in dims.width as usize..column_width {
                line.push(' ');
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Display character for a step number; 0 means empty.
fn step_symbol(step_number: u32) -> char {
    match step_number {
        0 => '.',
        1..=9 => char::from(b'0' + step_number as u8),
        10..=35 => char::from(b'A' + (step_number - 10) as u8),
        _ => '#',
    }
}
