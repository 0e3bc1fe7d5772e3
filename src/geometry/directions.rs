use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::constants::{
    CELL_ESTIMATE_MIN_SAMPLES, CELL_ESTIMATE_SAMPLES_PER_DIRECTION, CELL_ESTIMATE_SEED,
    DEGENERATE_EPSILON, MIN_RELATIVE_CELL_AREA,
};
use crate::error::{Result, SamplingError};
use crate::util::Timed;

use super::sample_unit_vector;

/// Normalize `v`, failing if it is too short to have a direction.
pub fn require_unit_vector(v: DVec3) -> Result<DVec3> {
    let norm = v.length();
    if !norm.is_finite() || norm < DEGENERATE_EPSILON {
        return Err(SamplingError::DegenerateVector { norm });
    }
    Ok(v / norm)
}

/// Normalize every vector in `vs`.
pub fn require_unit_vectors(vs: &[DVec3]) -> Result<Vec<DVec3>> {
    vs.iter().map(|&v| require_unit_vector(v)).collect()
}

/// A fixed, ordered set of unit vectors that discretizes the sphere.
///
/// Each direction owns the Voronoi cell of points whose dot product with it
/// is largest. Indices into the set are the "direction buckets" that label
/// training examples, so the order is significant and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSet {
    directions: Vec<DVec3>,
    /// Estimated solid-angle fraction covered by each cell.
    cell_fractions: Vec<f64>,
}

impl DirectionSet {
    /// Build a direction set, normalizing each input vector.
    ///
    /// Rejects empty input, degenerate vectors, and sets where some cell is
    /// so small that rejection sampling from it would effectively never
    /// terminate. The limit is relative to the mean cell `1/n` (see
    /// [`MIN_RELATIVE_CELL_AREA`]), so dense, evenly spread sets are accepted.
    pub fn new(directions: impl IntoIterator<Item = DVec3>) -> Result<Self> {
        let raw: Vec<DVec3> = directions.into_iter().collect();
        if raw.is_empty() {
            return Err(SamplingError::Configuration(
                "direction set must not be empty".into(),
            ));
        }
        let directions = require_unit_vectors(&raw)?;
        let cell_fractions = estimate_cell_fractions(&directions);

        let min_fraction = MIN_RELATIVE_CELL_AREA / directions.len() as f64;
        for (i, &fraction) in cell_fractions.iter().enumerate() {
            if fraction < min_fraction {
                return Err(SamplingError::Configuration(format!(
                    "Voronoi cell of direction {} ({:?}) covers ~{:.2e} of the sphere, below the minimum of {:.2e} for {} directions",
                    i,
                    directions[i],
                    fraction,
                    min_fraction,
                    directions.len()
                )));
            }
        }

        log::debug!(
            "direction set: {} directions, smallest cell fraction {:.4}",
            directions.len(),
            cell_fractions.iter().copied().fold(f64::INFINITY, f64::min)
        );

        Ok(Self {
            directions,
            cell_fractions,
        })
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Get a direction by bucket index.
    pub fn get(&self, index: usize) -> Option<DVec3> {
        self.directions.get(index).copied()
    }

    pub fn as_slice(&self) -> &[DVec3] {
        &self.directions
    }

    pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.directions.iter().copied()
    }

    /// Estimated fraction of the sphere covered by each direction's cell.
    pub fn cell_fractions(&self) -> &[f64] {
        &self.cell_fractions
    }

    /// Index of the direction whose Voronoi cell contains `v`.
    ///
    /// Ties go to the lowest index.
    pub fn nearest(&self, v: DVec3) -> usize {
        nearest_direction(&self.directions, v)
    }
}

impl std::ops::Index<usize> for DirectionSet {
    type Output = DVec3;

    fn index(&self, index: usize) -> &DVec3 {
        &self.directions[index]
    }
}

/// The six face normals of a cube, ordered `-x, +x, -y, +y, -z, +z`.
pub fn cube_faces() -> DirectionSet {
    DirectionSet {
        directions: vec![
            DVec3::NEG_X,
            DVec3::X,
            DVec3::NEG_Y,
            DVec3::Y,
            DVec3::NEG_Z,
            DVec3::Z,
        ],
        cell_fractions: vec![1.0 / 6.0; 6],
    }
}

pub(crate) fn nearest_direction(directions: &[DVec3], v: DVec3) -> usize {
    let mut best = 0;
    let mut best_dot = f64::NEG_INFINITY;
    for (i, d) in directions.iter().enumerate() {
        let dot = d.dot(v);
        if dot > best_dot {
            best_dot = dot;
            best = i;
        }
    }
    best
}

/// Monte Carlo estimate of each cell's share of the sphere.
///
/// Uses a fixed seed so that building the same set twice gives the same
/// answer. Duplicate directions always lose ties to their first copy, so
/// the later copy ends up with an empty cell and is rejected.
fn estimate_cell_fractions(directions: &[DVec3]) -> Vec<f64> {
    if directions.len() == 1 {
        return vec![1.0];
    }

    let samples = cell_estimate_samples(directions.len());
    let mut t = Timed::debug("Estimating Voronoi cell areas");
    t.set_count(samples);
    let mut rng = ChaCha8Rng::seed_from_u64(CELL_ESTIMATE_SEED);
    let mut counts = vec![0usize; directions.len()];
    for _ in 0..samples {
        let p = sample_unit_vector(&mut rng);
        counts[nearest_direction(directions, p)] += 1;
    }

    counts
        .into_iter()
        .map(|c| c as f64 / samples as f64)
        .collect()
}

/// Sample count for `n` directions: enough that a mean-sized cell gets
/// [`CELL_ESTIMATE_SAMPLES_PER_DIRECTION`] hits on average.
fn cell_estimate_samples(n: usize) -> usize {
    n.saturating_mul(CELL_ESTIMATE_SAMPLES_PER_DIRECTION)
        .max(CELL_ESTIMATE_MIN_SAMPLES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_require_unit_vectors() {
        let u = require_unit_vectors(&[DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 2.0, 0.0)])
            .unwrap();
        assert_eq!(u, vec![DVec3::X, DVec3::Y]);
    }

    #[test]
    fn test_require_unit_vector_rejects_zero_and_nan() {
        assert!(matches!(
            require_unit_vector(DVec3::ZERO),
            Err(SamplingError::DegenerateVector { .. })
        ));
        assert!(require_unit_vector(DVec3::new(f64::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_cube_faces_matches_constructed_set() {
        let faces = cube_faces();
        let built = DirectionSet::new(faces.iter()).unwrap();

        assert_eq!(faces.as_slice(), built.as_slice());
        for &f in built.cell_fractions() {
            assert_abs_diff_eq!(f, 1.0 / 6.0, epsilon = 0.015);
        }
    }

    #[test]
    fn test_new_normalizes() {
        let set = DirectionSet::new([DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -0.5)])
            .unwrap();
        assert_eq!(set[0], DVec3::Z);
        assert_eq!(set[1], DVec3::NEG_Z);
    }

    #[test]
    fn test_nearest() {
        let faces = cube_faces();
        assert_eq!(faces.nearest(DVec3::new(-0.9, 0.1, 0.2)), 0);
        assert_eq!(faces.nearest(DVec3::new(0.9, -0.1, 0.2)), 1);
        assert_eq!(faces.nearest(DVec3::new(0.1, 0.2, 0.9)), 5);
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = DirectionSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SamplingError::Configuration(_)));
    }

    #[test]
    fn test_degenerate_direction_rejected() {
        let err = DirectionSet::new([DVec3::X, DVec3::ZERO]).unwrap_err();
        assert!(matches!(err, SamplingError::DegenerateVector { .. }));
    }

    #[test]
    fn test_duplicate_direction_rejected() {
        let err = DirectionSet::new([DVec3::X, DVec3::NEG_X, DVec3::X]).unwrap_err();
        assert!(matches!(err, SamplingError::Configuration(_)));
    }

    #[test]
    fn test_sliver_cell_rejected() {
        // A ring of directions 0.01 rad away from +z leaves +z a tiny cell.
        let eps: f64 = 0.01;
        let (s, c) = eps.sin_cos();
        let directions = [
            DVec3::Z,
            DVec3::new(s, 0.0, c),
            DVec3::new(-s, 0.0, c),
            DVec3::new(0.0, s, c),
            DVec3::new(0.0, -s, c),
        ];
        let err = DirectionSet::new(directions).unwrap_err();
        assert!(matches!(err, SamplingError::Configuration(_)));
    }

    fn fibonacci_sphere(n: usize) -> Vec<DVec3> {
        let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        (0..n)
            .map(|i| {
                let z = 1.0 - (2.0 * i as f64 + 1.0) / n as f64;
                let r = (1.0 - z * z).sqrt();
                let (s, c) = (golden_angle * i as f64).sin_cos();
                DVec3::new(r * c, r * s, z)
            })
            .collect()
    }

    #[test]
    fn test_dense_uniform_sets_accepted() {
        for n in [600, 800] {
            let set = DirectionSet::new(fibonacci_sphere(n))
                .unwrap_or_else(|e| panic!("{} directions rejected: {}", n, e));
            let mean = 1.0 / n as f64;
            let smallest = set.cell_fractions().iter().copied().fold(f64::INFINITY, f64::min);
            assert!(smallest > 0.3 * mean, "n={}: smallest cell {:.2e}", n, smallest);
        }
    }

    #[test]
    fn test_estimate_samples_scale_with_set_size() {
        assert_eq!(cell_estimate_samples(6), CELL_ESTIMATE_MIN_SAMPLES);
        assert_eq!(
            cell_estimate_samples(1000),
            1000 * CELL_ESTIMATE_SAMPLES_PER_DIRECTION
        );
    }

    #[test]
    fn test_single_direction_covers_sphere() {
        let set = DirectionSet::new([DVec3::Y]).unwrap();
        assert_eq!(set.cell_fractions(), &[1.0]);
    }
}
