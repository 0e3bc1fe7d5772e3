use glam::{DMat3, DVec3};

use crate::constants::SYMMETRY_TOLERANCE;
use crate::error::Result;

use super::{align_vectors, DirectionSet};

/// Precomputed minimal rotations between every ordered pair of directions.
///
/// Entry `(i, j)` maps direction `i` onto direction `j`. The table also
/// records whether every entry is a symmetry of the direction set (maps the
/// set onto itself). Only then are all Voronoi cells congruent under the
/// cached rotations, which is what lets a sample drawn in one cell be
/// rotated into another without changing its distribution.
#[derive(Debug, Clone)]
pub struct PairwiseRotations {
    n: usize,
    rotations: Vec<DMat3>,
    is_symmetric: bool,
}

impl PairwiseRotations {
    pub fn build(directions: &DirectionSet) -> Result<Self> {
        let n = directions.len();
        let mut rotations = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                rotations.push(align_vectors(directions[j], directions[i])?);
            }
        }

        let is_symmetric = rotations
            .iter()
            .all(|&r| permutes(r, directions.as_slice()));

        log::debug!(
            "pairwise rotations: {}x{} table, cell-symmetric = {}",
            n,
            n,
            is_symmetric
        );

        Ok(Self {
            n,
            rotations,
            is_symmetric,
        })
    }

    /// Number of directions the table was built for.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Rotation taking direction `i` onto direction `j`.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> DMat3 {
        assert!(i < self.n && j < self.n, "rotation index out of range");
        self.rotations[i * self.n + j]
    }

    /// True if every cached rotation maps the direction set onto itself.
    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }
}

/// Whether `r` maps every direction in `directions` onto some direction in
/// `directions`.
fn permutes(r: DMat3, directions: &[DVec3]) -> bool {
    directions.iter().all(|&d| {
        let rd = r * d;
        directions
            .iter()
            .any(|&e| rd.distance(e) < SYMMETRY_TOLERANCE)
    })
}
