//! Get-or-insert memoization for per-worker zone lookups.
//!
//! The cache is an explicit map owned by whoever drives sampling (normally
//! one per worker thread). It never evicts, and it needs `&mut` access, so
//! sharing one between threads requires an external lock.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::Result;

use super::{ZoneDirectory, ZoneId, ZoneInfo};

/// Return the cached value for `key`, calling `factory` only on a miss.
pub fn load_from_cache<K, V, F>(cache: &mut FxHashMap<K, V>, key: K, factory: F) -> &V
where
    K: Eq + Hash,
    F: FnOnce() -> V,
{
    cache.entry(key).or_insert_with(factory)
}

/// Fallible [`load_from_cache`]: a failed factory leaves the cache untouched.
pub fn try_load_from_cache<K, V, E, F>(
    cache: &mut FxHashMap<K, V>,
    key: K,
    factory: F,
) -> std::result::Result<&V, E>
where
    K: Eq + Hash,
    F: FnOnce() -> std::result::Result<V, E>,
{
    match cache.entry(key) {
        Entry::Occupied(e) => Ok(e.into_mut()),
        Entry::Vacant(e) => Ok(e.insert(factory()?)),
    }
}

/// Everything the frame sampler needs to know about one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedZone {
    pub info: ZoneInfo,
    /// Valid direction buckets, or `None` if all are valid.
    pub neighbor_indices: Option<Vec<usize>>,
}

/// Per-worker memo of zone directory lookups.
#[derive(Debug, Clone, Default)]
pub struct ZoneCache {
    zones: FxHashMap<ZoneId, CachedZone>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a zone, querying `directory` only the first time it is seen.
    pub fn get_or_load<D: ZoneDirectory + ?Sized>(
        &mut self,
        directory: &D,
        zone_id: ZoneId,
    ) -> Result<&CachedZone> {
        try_load_from_cache(&mut self.zones, zone_id, || -> Result<CachedZone> {
            log::trace!("zone cache miss: {}", zone_id);
            Ok(CachedZone {
                info: directory.lookup_zone(zone_id)?,
                neighbor_indices: directory.zone_neighbor_indices(zone_id)?,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
