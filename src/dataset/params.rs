use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{Result, SamplingError};
use crate::geometry::{DirectionSet, PairwiseRotations};

/// How neighbors are placed relative to a home zone.
///
/// Built once per training configuration. The pairwise rotation table for
/// the direction candidates is computed here, so it is shared by every
/// sample drawn with these parameters.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborParams {
    #[serde(serialize_with = "serialize_directions")]
    direction_candidates: DirectionSet,
    distance_a: f64,
    noise_max_distance_a: f64,
    noise_max_angle_deg: f64,
    #[serde(skip)]
    rotations: PairwiseRotations,
}

impl NeighborParams {
    /// Validate the parameters and precompute the rotation table.
    ///
    /// - `distance_a`: distance between home and neighbor origins, > 0.
    /// - `noise_max_distance_a`: largest neighbor translation noise, ≥ 0.
    /// - `noise_max_angle_deg`: largest neighbor rotation noise, in `[0, 360]`.
    pub fn new(
        direction_candidates: DirectionSet,
        distance_a: f64,
        noise_max_distance_a: f64,
        noise_max_angle_deg: f64,
    ) -> Result<Self> {
        if !(distance_a.is_finite() && distance_a > 0.0) {
            return Err(SamplingError::Configuration(format!(
                "neighbor distance must be positive, got {}",
                distance_a
            )));
        }
        if !(noise_max_distance_a.is_finite() && noise_max_distance_a >= 0.0) {
            return Err(SamplingError::Configuration(format!(
                "noise distance must be non-negative, got {}",
                noise_max_distance_a
            )));
        }
        if !(0.0..=360.0).contains(&noise_max_angle_deg) {
            return Err(SamplingError::Configuration(format!(
                "noise angle must be in [0, 360] degrees, got {}",
                noise_max_angle_deg
            )));
        }

        let rotations = PairwiseRotations::build(&direction_candidates)?;

        Ok(Self {
            direction_candidates,
            distance_a,
            noise_max_distance_a,
            noise_max_angle_deg,
            rotations,
        })
    }

    pub fn direction_candidates(&self) -> &DirectionSet {
        &self.direction_candidates
    }

    pub fn distance_a(&self) -> f64 {
        self.distance_a
    }

    pub fn noise_max_distance_a(&self) -> f64 {
        self.noise_max_distance_a
    }

    pub fn noise_max_angle_deg(&self) -> f64 {
        self.noise_max_angle_deg
    }

    /// Rotations between every pair of direction candidates.
    pub fn rotations(&self) -> &PairwiseRotations {
        &self.rotations
    }
}

fn serialize_directions<S: Serializer>(
    directions: &DirectionSet,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(directions.len()))?;
    for d in directions.iter() {
        seq.serialize_element(&d.to_array())?;
    }
    seq.end()
}
