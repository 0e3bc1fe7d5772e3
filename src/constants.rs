//! Numerical tolerances and tuning constants for frame sampling.

/// Vectors shorter than this have no well-defined direction.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// Cross products shorter than this are treated as (anti-)parallel inputs
/// when aligning two unit vectors.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Largest distance between a rotated direction and a member of the set for
/// the two to count as the same when checking whether a rotation permutes
/// the set.
///
/// Measured on positions, so it is also (to first order) an angle in radians.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

// Voronoi cell area estimation

/// Smallest area a direction's Voronoi cell may cover, relative to the mean
/// cell `1/n`.
///
/// Rejection sampling from a cell of fraction `f` needs `1/f` draws on
/// average, so this bounds the cost of a single-cell sample to `10 * n`
/// draws.
pub const MIN_RELATIVE_CELL_AREA: f64 = 0.1;

/// Expected number of uniform sphere samples per cell when estimating cell
/// areas. A mean-sized cell lands well clear of [`MIN_RELATIVE_CELL_AREA`].
pub const CELL_ESTIMATE_SAMPLES_PER_DIRECTION: usize = 200;

/// Lower bound on the number of samples for small direction sets.
pub const CELL_ESTIMATE_MIN_SAMPLES: usize = 20_000;

/// Fixed seed for cell-area estimation, so construction is deterministic.
pub const CELL_ESTIMATE_SEED: u64 = 0x5eed_ce11;
