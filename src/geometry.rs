//! Crate orientations.
//!
//! A crate can be loaded in four ways, selected by two turn flags:
//!
//! | horizontal | vertical | extents (w, h, l) |
//! |------------|----------|-------------------|
//! | no         | no       | W, H, L           |
//! | yes        | no       | L, H, W           |
//! | no         | yes      | W, L, H           |
//! | yes        | yes      | L, W, H           |
//!
//! A horizontal turn spins the crate a quarter turn on the floor, exchanging
//! width and length. A vertical turn tips it on its side, exchanging height
//! with the (possibly already turned) length.

use rand::Rng;

use crate::freight::Dimensions;

/// Turn flags applied to a crate before it is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub turn_horizontal: bool,
    pub turn_vertical: bool,
}

impl Orientation {
    /// The resting orientation.
    pub const UPRIGHT: Self = Self::new(false, false);

    /// All four orientations, in flag order.
    pub const ALL: [Self; 4] = [
        Self::new(false, false),
        Self::new(true, false),
        Self::new(false, true),
        Self::new(true, true),
    ];

    pub const fn new(turn_horizontal: bool, turn_vertical: bool) -> Self {
        Self {
            turn_horizontal,
            turn_vertical,
        }
    }

    /// Draws both flags as independent fair coin flips.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_bool(0.5), rng.gen_bool(0.5))
    }

    /// Returns the extents of a crate loaded in this orientation.
    #[inline]
    pub const fn resolve(&self, dims: Dimensions) -> Dimensions {
        let Dimensions {
            width,
            height,
            length,
        } = dims;
        match (self.turn_horizontal, self.turn_vertical) {
            (false, false) => Dimensions::new(width, height, length),
            (true, false) => Dimensions::new(length, height, width),
            (false, true) => Dimensions::new(width, length, height),
            (true, true) => Dimensions::new(length, width, height),
        }
    }
}

/// Returns the orientations in which `dims` fits inside `container`.
pub fn fitting_orientations(dims: Dimensions, container: &Dimensions) -> Vec<Orientation> {
    Orientation::ALL
        .into_iter()
        .filter(|orientation| orientation.resolve(dims).fits_within(container))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_resolve_mapping() {
        let dims = Dimensions::new(1, 2, 3);
        assert_eq!(Orientation::new(false, false).resolve(dims), Dimensions::new(1, 2, 3));
        assert_eq!(Orientation::new(true, false).resolve(dims), Dimensions::new(3, 2, 1));
        assert_eq!(Orientation::new(false, true).resolve(dims), Dimensions::new(1, 3, 2));
        assert_eq!(Orientation::new(true, true).resolve(dims), Dimensions::new(3, 1, 2));
    }

    #[test]
    fn test_resolve_is_pure() {
        let dims = Dimensions::new(5, 7, 11);
        for orientation in Orientation::ALL {
            assert_eq!(orientation.resolve(dims), orientation.resolve(dims));
        }
    }

    #[test]
    fn test_resolve_preserves_extent_multiset() {
        let dims = Dimensions::new(2, 9, 4);
        for orientation in Orientation::ALL {
            assert_eq!(
                orientation.resolve(dims).sorted_extents(),
                dims.sorted_extents(),
                "Orientation {orientation:?} changed the crate's extents"
            );
        }
    }

    #[test]
    fn test_resolve_preserves_volume() {
        let dims = Dimensions::new(3, 1, 8);
        for orientation in Orientation::ALL {
            assert_eq!(orientation.resolve(dims).volume(), dims.volume());
        }
    }

    #[test]
    fn test_fitting_orientations() {
        let container = Dimensions::new(4, 1, 1);
        let fitting = fitting_orientations(Dimensions::new(1, 1, 4), &container);
        assert_eq!(
            fitting,
            vec![Orientation::new(true, false), Orientation::new(true, true)]
        );

        let too_big = fitting_orientations(Dimensions::new(2, 1, 1), &Dimensions::new(1, 1, 1));
        assert!(too_big.is_empty());
    }

    #[test]
    fn test_random_produces_every_orientation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let drawn = Orientation::random(&mut rng);
            let index = Orientation::ALL.iter().position(|&o| o == drawn).unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s), "Some orientation was never drawn");
    }
}
