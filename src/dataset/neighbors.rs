use glam::{DMat4, DVec3};
use rand::Rng;

use crate::error::{Result, SamplingError};
use crate::geometry::{
    align_vectors, frame_from_rotation_translation, require_unit_vector, sample_coord_from_cube,
    sample_neighbor_direction, sample_noise_frame, Frame,
};

use super::{NeighborParams, ZoneCache, ZoneDirectory, ZoneId};

/// One training example's geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborFrames {
    /// Zone the home frame was sampled from.
    pub zone_id: ZoneId,
    /// Maps world ("i") coordinates into the home frame ("a").
    pub frame_ia: Frame,
    /// Maps home-frame coordinates into the (noisy) neighbor frame ("b").
    pub frame_ab: Frame,
    /// Direction bucket of the neighbor, as seen from the home frame.
    pub direction_index: usize,
}

impl NeighborFrames {
    /// Maps world coordinates directly into the neighbor frame.
    pub fn frame_ib(&self) -> Frame {
        self.frame_ab * self.frame_ia
    }
}

/// Build the home and neighbor frames for one example.
///
/// `frame_ia` puts `home_origin_i` at the origin and turns the world-space
/// direction `neighbor_direction_i` onto the canonical `neighbor_direction_a`
/// using the smallest possible rotation. `frame_ab` is a pure translation
/// that moves the origin to `neighbor_distance` along `neighbor_direction_a`,
/// so the two frames share an orientation.
///
/// ```text
///  y 4 │
///      │   b │ x        home_origin_i        = (2, 1, 0)
///    3 │   ──┘          neighbor_direction_i = (0, 1, 0)
///      │   y            neighbor_direction_a = (1, 0, 0)
///    2 │                neighbor_distance    = 2
///      │   a │ x
///    1 │   ──┘          Both frames are rotated 90° CCW relative
///      │   y            to the world frame.
///    0 └──────
///      0  1  2
/// ```
pub fn make_neighboring_frames(
    home_origin_i: DVec3,
    neighbor_distance: f64,
    neighbor_direction_i: DVec3,
    neighbor_direction_a: DVec3,
) -> Result<(Frame, Frame)> {
    let rotation_ia = align_vectors(neighbor_direction_a, neighbor_direction_i)?;
    let frame_ia = frame_from_rotation_translation(rotation_ia, -(rotation_ia * home_origin_i));

    let neighbor_origin_a = require_unit_vector(neighbor_direction_a)? * neighbor_distance;
    let frame_ab = DMat4::from_translation(-neighbor_origin_a);

    Ok((frame_ia, frame_ab))
}

/// Sample the home and neighbor frames for the example at `zone_index`.
///
/// Indices wrap around `zone_ids`, so an unbounded sampler can keep counting
/// up. Zone metadata goes through `cache`, which must not be shared between
/// concurrent callers. The noise frame is applied on the neighbor side
/// (`frame_ab = noise * ideal_frame_ab`): the home frame stays exact and the
/// neighbor origin ends up within `noise_max_distance_a` of its ideal spot.
pub fn get_neighboring_frames<R, D>(
    rng: &mut R,
    zone_directory: &D,
    zone_index: usize,
    zone_ids: &[ZoneId],
    neighbor_params: &NeighborParams,
    cache: &mut ZoneCache,
) -> Result<NeighborFrames>
where
    R: Rng + ?Sized,
    D: ZoneDirectory + ?Sized,
{
    if zone_ids.is_empty() {
        return Err(SamplingError::Configuration("no zones to sample from".into()));
    }
    let zone_id = zone_ids[zone_index % zone_ids.len()];
    let zone = cache.get_or_load(zone_directory, zone_id)?;

    let candidates = neighbor_params.direction_candidates();
    let all_indices: Vec<usize>;
    let valid_indices = match &zone.neighbor_indices {
        Some(indices) => indices.as_slice(),
        None => {
            all_indices = (0..candidates.len()).collect();
            &all_indices
        }
    };

    let home_origin_i = sample_coord_from_cube(rng, zone.info.center_a, zone.info.size_a);
    let (neighbor_direction_i, direction_index) =
        sample_neighbor_direction(rng, candidates, neighbor_params.rotations(), valid_indices)?;
    let neighbor_direction_a = candidates[direction_index];

    let (frame_ia, frame_ab) = make_neighboring_frames(
        home_origin_i,
        neighbor_params.distance_a(),
        neighbor_direction_i,
        neighbor_direction_a,
    )?;

    let noise_b = sample_noise_frame(
        rng,
        neighbor_params.noise_max_distance_a(),
        neighbor_params.noise_max_angle_deg(),
    );

    log::trace!(
        "zone {}: neighbor bucket {} from {:?}",
        zone_id,
        direction_index,
        valid_indices
    );

    Ok(NeighborFrames {
        zone_id,
        frame_ia,
        frame_ab: noise_b * frame_ab,
        direction_index,
    })
}
