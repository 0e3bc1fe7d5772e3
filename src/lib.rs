//! Neighbor-zone coordinate frames for self-supervised pretraining on
//! macromolecular structures.
//!
//! Given a zone (a small cube of space cut out of a structure), the crate
//! samples a second, neighboring zone and returns the pair of rigid
//! coordinate frames relating the two. The direction to the neighbor is
//! discretized into a fixed set of buckets (by default the six cube faces),
//! so a model can be trained to predict which bucket a neighbor came from.
//!
//! - [`geometry`] - direction sets, vector alignment, uniform sampling on
//!   the sphere and in cubes, rigid frames.
//! - [`dataset`] - zone directory interface, the per-worker lookup cache and
//!   the top-level [`get_neighboring_frames`] driver.

pub mod constants;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod stats;
pub mod util;

pub use dataset::{
    get_neighboring_frames, make_neighboring_frames, InMemoryZoneDirectory, NeighborFrames,
    NeighborParams, ZoneCache, ZoneDirectory, ZoneId, ZoneInfo,
};
pub use error::{Result, SamplingError};
pub use geometry::{cube_faces, DirectionSet, Frame, PairwiseRotations};
