//! Truck and crate definitions.
//!
//! All extents are measured in unit cells along three axes:
//! x (width), y (height) and z (length).

use std::fmt;

/// A 3D cell coordinate inside the cargo volume.
pub type Coord = (u32, u32, u32);

/// Axis-aligned extents of a box, in unit cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    /// Number of unit cells enclosed by the box.
    #[inline]
    pub const fn volume(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.length as u64
    }

    /// True if any extent is zero.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.length == 0
    }

    /// True if a box of these extents fits inside `outer` without turning.
    #[inline]
    pub const fn fits_within(&self, outer: &Dimensions) -> bool {
        self.width <= outer.width && self.height <= outer.height && self.length <= outer.length
    }

    /// Sorted extents; equal for every orientation of the same box.
    #[cfg(test)]
    pub(crate) fn sorted_extents(&self) -> [u32; 3] {
        let mut extents = [self.width, self.height, self.length];
        extents.sort_unstable();
        extents
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.length)
    }
}

/// The cargo volume of a truck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truck {
    pub dimensions: Dimensions,
}

impl Truck {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height, length),
        }
    }

    /// Returns true if the cell lies inside the cargo volume.
    #[inline]
    pub const fn contains(&self, (x, y, z): Coord) -> bool {
        x < self.dimensions.width && y < self.dimensions.height && z < self.dimensions.length
    }
}

/// A crate waiting to be loaded.
///
/// The stored dimensions are the crate's resting orientation; turned extents
/// are resolved through [`crate::geometry::Orientation::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crate {
    pub id: u32,
    pub dimensions: Dimensions,
}

impl Crate {
    pub const fn new(id: u32, width: u32, height: u32, length: u32) -> Self {
        Self {
            id,
            dimensions: Dimensions::new(width, height, length),
        }
    }
}
