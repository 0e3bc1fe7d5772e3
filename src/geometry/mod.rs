mod align;
mod directions;
mod frame;
mod neighborhood;
mod pairwise;
mod sphere;

pub use align::*;
pub use directions::{cube_faces, require_unit_vector, require_unit_vectors, DirectionSet};
pub use frame::*;
pub use neighborhood::*;
pub use pairwise::PairwiseRotations;
pub use sphere::*;
