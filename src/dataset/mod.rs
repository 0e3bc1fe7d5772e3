//! Training-example plumbing: zones, per-worker caching, and the driver that
//! turns a zone index into a pair of neighboring coordinate frames.

mod cache;
mod neighbors;
mod params;
mod zone;

pub use cache::{load_from_cache, try_load_from_cache, CachedZone, ZoneCache};
pub use neighbors::{get_neighboring_frames, make_neighboring_frames, NeighborFrames};
pub use params::NeighborParams;
pub use zone::{InMemoryZoneDirectory, ZoneDirectory, ZoneId, ZoneInfo};
