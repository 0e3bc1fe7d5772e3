use glam::DVec3;
use rustc_hash::FxHashMap;

use crate::error::{Result, SamplingError};

/// Identifier of a zone in a [`ZoneDirectory`].
pub type ZoneId = u64;

/// Geometry of a zone: a cube of edge `size_a` (Å) centered on `center_a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneInfo {
    pub center_a: DVec3,
    pub size_a: f64,
}

/// Read-only source of zone metadata, typically backed by a database.
///
/// Lookups must be side-effect free: results are memoized by
/// [`ZoneCache`](super::ZoneCache) for the lifetime of a worker.
pub trait ZoneDirectory {
    /// Center and size of a zone.
    fn lookup_zone(&self, zone_id: ZoneId) -> Result<ZoneInfo>;

    /// Direction buckets in which this zone has a usable neighbor.
    ///
    /// `None` means every candidate direction is valid.
    fn zone_neighbor_indices(&self, _zone_id: ZoneId) -> Result<Option<Vec<usize>>> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
struct ZoneEntry {
    info: ZoneInfo,
    neighbor_indices: Option<Vec<usize>>,
}

/// A [`ZoneDirectory`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryZoneDirectory {
    zones: FxHashMap<ZoneId, ZoneEntry>,
    order: Vec<ZoneId>,
}

impl InMemoryZoneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a zone. Insertion order is kept for [`zone_ids`](Self::zone_ids).
    pub fn insert(&mut self, zone_id: ZoneId, info: ZoneInfo) {
        self.insert_with_neighbors(zone_id, info, None);
    }

    /// Add a zone whose neighbors are restricted to the given direction buckets.
    pub fn insert_with_neighbors(
        &mut self,
        zone_id: ZoneId,
        info: ZoneInfo,
        neighbor_indices: Option<Vec<usize>>,
    ) {
        let entry = ZoneEntry {
            info,
            neighbor_indices,
        };
        if self.zones.insert(zone_id, entry).is_none() {
            self.order.push(zone_id);
        }
    }

    /// A cubic grid of `n × n × n` touching zones of edge `size_a`, centered
    /// on the origin.
    ///
    /// Neighbor buckets follow [`cube_faces`](crate::geometry::cube_faces)
    /// order: a zone on the grid boundary only lists the faces that have
    /// another zone behind them. A 1×1×1 grid has no neighbors at all, so
    /// its single zone is left unrestricted.
    pub fn cubic_grid(n: usize, size_a: f64) -> Self {
        let mut directory = Self::new();
        let offset = (n as f64 - 1.0) / 2.0;
        let mut zone_id: ZoneId = 0;

        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let center_a =
                        (DVec3::new(i as f64, j as f64, k as f64) - DVec3::splat(offset)) * size_a;

                    let mut faces = Vec::with_capacity(6);
                    for (axis, &c) in [i, j, k].iter().enumerate() {
                        if c > 0 {
                            faces.push(2 * axis);
                        }
                        if c + 1 < n {
                            faces.push(2 * axis + 1);
                        }
                    }
                    let neighbor_indices = match faces.len() {
                        0 | 6 => None,
                        _ => Some(faces),
                    };

                    directory.insert_with_neighbors(
                        zone_id,
                        ZoneInfo { center_a, size_a },
                        neighbor_indices,
                    );
                    zone_id += 1;
                }
            }
        }

        directory
    }

    /// Zone ids in insertion order.
    pub fn zone_ids(&self) -> &[ZoneId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ZoneDirectory for InMemoryZoneDirectory {
    fn lookup_zone(&self, zone_id: ZoneId) -> Result<ZoneInfo> {
        self.zones
            .get(&zone_id)
            .map(|e| e.info)
            .ok_or(SamplingError::UnknownZone(zone_id))
    }

    fn zone_neighbor_indices(&self, zone_id: ZoneId) -> Result<Option<Vec<usize>>> {
        self.zones
            .get(&zone_id)
            .map(|e| e.neighbor_indices.clone())
            .ok_or(SamplingError::UnknownZone(zone_id))
    }
}
