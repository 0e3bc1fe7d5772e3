use glam::DVec3;
use rand::Rng;

use crate::error::{Result, SamplingError};

use super::directions::nearest_direction;
use super::{sample_unit_vector, DirectionSet, PairwiseRotations};

/// Draw a unit vector uniformly from the union of the Voronoi cells of
/// `valid_indices`.
///
/// The output always lies in the cell of at least one valid direction. See
/// [`sample_neighbor_direction`] for the algorithm.
pub fn sample_unit_vector_in_neighborhood<R: Rng + ?Sized>(
    rng: &mut R,
    directions: &DirectionSet,
    rotations: &PairwiseRotations,
    valid_indices: &[usize],
) -> Result<DVec3> {
    sample_neighbor_direction(rng, directions, rotations, valid_indices).map(|(x, _)| x)
}

/// Like [`sample_unit_vector_in_neighborhood`], but also returns the index
/// of the cell the sample was drawn in.
///
/// When every direction is valid this is just a uniform sphere sample.
///
/// When the cached rotations are symmetries of the set, all cells are
/// congruent and no sample is ever rejected. A uniform sphere sample lies
/// uniformly in the cell it falls in. If that cell is valid it is returned
/// as is. Otherwise it is rotated into a uniformly chosen valid cell. Each
/// valid cell then ends up with probability `1/|valid|`, and within a cell
/// the sample stays uniform because the rotation maps one cell onto the
/// other. This takes one sphere draw per sample, where rejection over the
/// union takes `n / |valid|` on average.
///
/// Otherwise it falls back to
/// [`sample_unit_vector_in_neighborhood_brute_force`], the reference
/// algorithm. That rejection loop has no retry limit. [`DirectionSet::new`]
/// rejects sets with cells small enough to make it slow.
pub fn sample_neighbor_direction<R: Rng + ?Sized>(
    rng: &mut R,
    directions: &DirectionSet,
    rotations: &PairwiseRotations,
    valid_indices: &[usize],
) -> Result<(DVec3, usize)> {
    if rotations.len() != directions.len() {
        return Err(SamplingError::Configuration(format!(
            "rotation table has {} directions, direction set has {}",
            rotations.len(),
            directions.len()
        )));
    }
    let valid = unique_valid_indices(directions, valid_indices)?;

    if valid.len() == directions.len() {
        let x = sample_unit_vector(rng);
        return Ok((x, directions.nearest(x)));
    }
    if !rotations.is_symmetric() {
        return Ok(reject_until_valid(rng, directions, &valid));
    }

    let x = sample_unit_vector(rng);
    let cell = directions.nearest(x);
    if valid.contains(&cell) {
        return Ok((x, cell));
    }
    let target = valid[rng.gen_range(0..valid.len())];
    Ok((rotations.get(cell, target) * x, target))
}

/// Plain rejection sampling: draw uniform unit vectors until one lands in
/// the cell of a valid direction.
pub fn sample_unit_vector_in_neighborhood_brute_force<R: Rng + ?Sized>(
    rng: &mut R,
    directions: &DirectionSet,
    valid_indices: &[usize],
) -> Result<DVec3> {
    let valid = unique_valid_indices(directions, valid_indices)?;
    Ok(reject_until_valid(rng, directions, &valid).0)
}

fn reject_until_valid<R: Rng + ?Sized>(
    rng: &mut R,
    directions: &DirectionSet,
    valid: &[usize],
) -> (DVec3, usize) {
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let x = sample_unit_vector(rng);
        let winner = nearest_direction(directions.as_slice(), x);
        if valid.contains(&winner) {
            log::trace!("neighborhood sample accepted after {} draws", attempts);
            return (x, winner);
        }
    }
}

/// Check `valid_indices` against the set and drop duplicates, keeping the
/// first occurrence order.
fn unique_valid_indices(directions: &DirectionSet, valid_indices: &[usize]) -> Result<Vec<usize>> {
    if valid_indices.is_empty() {
        return Err(SamplingError::Configuration(
            "at least one valid neighbor direction is required".into(),
        ));
    }

    let mut seen = vec![false; directions.len()];
    let mut unique = Vec::with_capacity(valid_indices.len());
    for &i in valid_indices {
        if i >= directions.len() {
            return Err(SamplingError::Configuration(format!(
                "neighbor direction index {} out of range for {} directions",
                i,
                directions.len()
            )));
        }
        if !seen[i] {
            seen[i] = true;
            unique.push(i);
        }
    }
    Ok(unique)
}
