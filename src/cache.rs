/*
nanohelix, a virtual helix geometry engine for DNA nanostructure design.
    Copyright (C) 2026  nanohelix developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Memoization of proximity queries.
//!
//! Both query families scan every stored point and filter by squared
//! distance. There is no spatial tree: at the expected problem sizes
//! (hundreds of helices times hundreds of bases) the plain scan is cheap
//! enough, and the cache absorbs the repeated queries issued while a tool
//! hovers the same region.
//!
//! Eviction is by insertion order, not by access recency: the cache is a
//! ring of the most recently *issued* queries.

use crate::origins::OriginTable;
use crate::packed_store::PackedCoordinateStore;
use ahash::RandomState;
use ordered_float::OrderedFloat;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use ultraviolet::{Vec2, Vec3};

/// Default number of remembered queries per cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

type PointKey = (OrderedFloat<f32>, [OrderedFloat<f32>; 3]);
type OriginKey = (OrderedFloat<f32>, [OrderedFloat<f32>; 2]);

/// The slots returned by a point query: parallel lists of owning helix and
/// intra-helix base index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointQueryResult {
    pub ids: Vec<usize>,
    pub intra_indices: Vec<usize>,
}

/// A bounded map that evicts the oldest *inserted* entry when full.
struct FifoCache<K: Eq + Hash + Clone, V> {
    capacity: usize,
    map: HashMap<K, V, RandomState>,
    ring: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> FifoCache<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            map: Default::default(),
            ring: VecDeque::with_capacity(capacity),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            // refreshed value for a key already in the ring
            return;
        }
        if self.ring.len() == self.capacity {
            if let Some(oldest) = self.ring.pop_front() {
                self.map.remove(&oldest);
            }
        }
        self.ring.push_back(key);
    }

    fn clear(&mut self) {
        self.map.clear();
        self.ring.clear();
    }

    fn len(&self) -> usize {
        self.ring.len()
    }
}

/// Two independent bounded memos over the point buffers and the per-helix
/// origins. Must be cleared whenever the packed store or the origin table
/// mutates.
pub struct SpatialQueryCache {
    points: FifoCache<PointKey, PointQueryResult>,
    origins: FifoCache<OriginKey, Vec<usize>>,
}

impl Default for SpatialQueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl SpatialQueryCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: FifoCache::with_capacity(capacity),
            origins: FifoCache::with_capacity(capacity),
        }
    }

    /// Every packed slot within `radius` of `point`.
    pub fn query_points(
        &mut self,
        store: &PackedCoordinateStore,
        radius: f32,
        point: Vec3,
    ) -> PointQueryResult {
        let key = point_key(radius, point);
        if let Some(hit) = self.points.get(&key) {
            return hit.clone();
        }
        let result = raw_query_points(store, radius, point);
        self.points.insert(key, result.clone());
        result
    }

    /// Every helix whose origin lies within `radius` of `point`, sorted by
    /// ascending distance.
    pub fn query_origins(&mut self, origins: &OriginTable, radius: f32, point: Vec2) -> Vec<usize> {
        let key = origin_key(radius, point);
        if let Some(hit) = self.origins.get(&key) {
            return hit.clone();
        }
        let result = raw_query_origins(origins, radius, point);
        self.origins.insert(key, result.clone());
        result
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.origins.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.origins.len()
    }
}

fn point_key(radius: f32, point: Vec3) -> PointKey {
    (
        OrderedFloat(radius),
        [
            OrderedFloat(point.x),
            OrderedFloat(point.y),
            OrderedFloat(point.z),
        ],
    )
}

fn origin_key(radius: f32, point: Vec2) -> OriginKey {
    (
        OrderedFloat(radius),
        [OrderedFloat(point.x), OrderedFloat(point.y)],
    )
}

/// The uncached point scan, squared distance against every stored point.
pub fn raw_query_points(
    store: &PackedCoordinateStore,
    radius: f32,
    point: Vec3,
) -> PointQueryResult {
    let radius_sq = radius * radius;
    let mut result = PointQueryResult::default();
    for (slot, axis_point) in store.axis_points().iter().enumerate() {
        if (*axis_point - point).mag_sq() <= radius_sq {
            if let Some((id, intra)) = store.slot(slot) {
                result.ids.push(id);
                result.intra_indices.push(intra);
            }
        }
    }
    result
}

/// The uncached origin scan, sorted by ascending distance.
pub fn raw_query_origins(origins: &OriginTable, radius: f32, point: Vec2) -> Vec<usize> {
    let radius_sq = radius * radius;
    let mut hits: Vec<(f32, usize)> = origins
        .iter()
        .filter_map(|(id, entry)| {
            let dist_sq = (entry.origin - point).mag_sq();
            if dist_sq <= radius_sq {
                Some((dist_sq, id))
            } else {
                None
            }
        })
        .collect();
    hits.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    hits.into_iter().map(|(_, id)| id).collect()
}
