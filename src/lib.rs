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
//! This crate owns the 3D geometry of the virtual helices of a DNA
//! nanostructure design: identifier management, per-base positions computed
//! from helical parameters, proximity queries used to propose crossovers,
//! and a packed contiguous buffer representation that stays consistent as
//! helices are created, resized and removed.
//!
//! The engine is a pure data layer. It knows nothing about views, dialogs
//! or undo stacks; callers wrap each mutating call in an undoable command
//! built from the call's exact inverse, and poll [`HelixGroup::version`] to
//! notice changes. All operations are synchronous and single-threaded: an
//! embedding application that needs concurrent access must protect a whole
//! `HelixGroup` behind one exclusive lock.

#[macro_use]
extern crate serde_derive;
extern crate serde;

/// Re-export ultraviolet for linear algebra
pub use ultraviolet;
use ultraviolet::{Vec2, Vec3};

mod cache;
mod errors;
pub mod geometry;
mod id_allocator;
mod neighbors;
mod origins;
mod packed_store;
mod parameters;
mod properties;
mod segments;
mod utils;

pub use cache::{
    raw_query_origins, raw_query_points, PointQueryResult, SpatialQueryCache,
    DEFAULT_CACHE_CAPACITY,
};
pub use errors::ErrEngine;
use geometry::{points_from_params, HelixTwist};
pub use id_allocator::IdentityAllocator;
pub use neighbors::{BondedHits, BondedPair, StrandHits};
pub use origins::{HelixOrigin, Lattice, OriginTable};
pub use packed_store::{OffsetSize, PackedCoordinateStore, NO_OWNER};
pub use parameters::Parameters;
pub use properties::{HelixProperties, PropertyTable, PROPERTY_SCHEMA_VERSION};
pub use segments::{refresh_segments, Segment, StrandEndpoints};

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::ops::Range;

/// Wether a geometry-affecting property write recomputes the helix points
/// immediately, or defers the recomputation until `flush_deferred`,
/// typically at the end of a batch import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Immediate,
    Deferred,
}

/// A group of virtual helices and all of their geometry.
#[derive(Default)]
pub struct HelixGroup {
    parameters: Parameters,
    ids: IdentityAllocator,
    store: PackedCoordinateStore,
    properties: PropertyTable,
    origins: OriginTable,
    cache: SpatialQueryCache,
    /// Helices whose geometry is stale because a property write was made in
    /// `BatchMode::Deferred`.
    deferred: Vec<usize>,
    version: u64,
}

impl HelixGroup {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            ..Default::default()
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Number of live helices.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// A counter bumped by every mutation. Collaborators holding derived
    /// data compare it against the value they last saw.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn invalidate(&mut self) {
        self.version += 1;
        log::debug!("invalidating spatial caches (version {})", self.version);
        self.cache.clear();
    }

    // Lifecycle
    // ===========================================================================

    /// Create a new helix of `length` bases and return its identifier.
    ///
    /// The smallest recycled identifier is reused if one exists.
    pub fn create_helix(
        &mut self,
        origin: Vec2,
        direction: Vec3,
        length: usize,
        mut properties: HelixProperties,
    ) -> Result<usize, ErrEngine> {
        let direction = if direction.mag_sq() < 1e-12 {
            log::warn!("degenerate helix direction, falling back to +Z");
            Vec3::unit_z()
        } else {
            direction.normalized()
        };
        let id = self.ids.new_id();
        self.ids.reserve(id)?;
        self.store.register(id)?;
        properties.length = length;
        if properties.name.is_empty() {
            properties.name = format!("Helix {}", id);
        }
        let entry = HelixOrigin { origin, direction };
        let twist = HelixTwist::of(&properties);
        let (axis, forward, reverse) = points_from_params(
            entry.space_origin(properties.z),
            direction,
            &twist,
            &self.parameters,
            0,
            length,
        );
        self.origins.insert(id, entry)?;
        self.properties.insert(id, properties)?;
        self.store.insert(id, &axis, &forward, &reverse, true)?;
        self.invalidate();
        Ok(id)
    }

    /// Create a new helix on a vertex of a lattice, pointing along +Z.
    pub fn create_helix_on_lattice(
        &mut self,
        lattice: Lattice,
        x: isize,
        y: isize,
        length: usize,
    ) -> Result<usize, ErrEngine> {
        let origin = lattice.origin_of(&self.parameters, x, y);
        self.create_helix(origin, Vec3::unit_z(), length, Default::default())
    }

    /// Grow or shrink a helix by `delta` bases at one of its two ends.
    ///
    /// `resize_helix(id, delta, end)` followed by
    /// `resize_helix(id, -delta, end)` restores the point buffers bit for
    /// bit; the undo layer relies on this.
    pub fn resize_helix(
        &mut self,
        id: usize,
        delta: isize,
        at_high_end: bool,
    ) -> Result<(), ErrEngine> {
        let twist = HelixTwist::of(self.properties.get(id)?);
        let z = self.properties.get(id)?.z;
        let entry = *self.origins.get(id)?;
        let current = self.store.range_of(id)?.size;
        if delta == 0 {
            return Ok(());
        }

        if delta < 0 {
            let shrink = (-delta) as usize;
            if shrink > current {
                return Err(ErrEngine::IllegalResize { current, delta });
            }
            self.store.remove(id, shrink, at_high_end)?;
            if !at_high_end {
                self.rebase(id, shrink as isize, &twist, &entry, z)?;
            }
        } else {
            let grow = delta as usize;
            let start = if at_high_end {
                current as isize
            } else {
                -(grow as isize)
            };
            let (axis, forward, reverse) = points_from_params(
                entry.space_origin(z),
                entry.direction,
                &twist,
                &self.parameters,
                start,
                grow,
            );
            self.store.insert(id, &axis, &forward, &reverse, at_high_end)?;
            if !at_high_end {
                self.rebase(id, start, &twist, &entry, z)?;
            }
        }
        let new_length = self.store.range_of(id)?.size;
        self.properties.get_mut(id)?.length = new_length;
        self.invalidate();
        Ok(())
    }

    /// Make the base at `delta` the new base 0 after a low-end resize, so
    /// that subsequent appends remain phase consistent.
    fn rebase(
        &mut self,
        id: usize,
        delta: isize,
        twist: &HelixTwist,
        entry: &HelixOrigin,
        z: f32,
    ) -> Result<(), ErrEngine> {
        let anchor =
            entry.space_origin(z) + (delta as f32 * self.parameters.z_step) * entry.direction;
        self.origins.get_mut(id)?.origin = Vec2::new(anchor.x, anchor.y);
        let properties = self.properties.get_mut(id)?;
        properties.z = anchor.z;
        properties.euler_z = twist.rebased_phase(delta);
        Ok(())
    }

    /// Remove a helix entirely and recycle its identifier. The removed
    /// properties and origin are returned so that the undo layer can invert
    /// the call.
    pub fn remove_helix(&mut self, id: usize) -> Result<(HelixProperties, HelixOrigin), ErrEngine> {
        let size = self.store.range_of(id)?.size;
        self.properties.get(id)?;
        self.origins.get(id)?;
        self.store.remove(id, size, true)?;
        self.store.unregister(id)?;
        let properties = self.properties.remove(id)?;
        let origin = self.origins.remove(id)?;
        self.ids.recycle(id)?;
        self.invalidate();
        Ok((properties, origin))
    }

    /// Translate a set of helices. The identifiers must be distinct. The
    /// whole call is validated first: either every helix moves or none
    /// does.
    pub fn translate_helices(
        &mut self,
        ids: &[usize],
        translation: Vec3,
    ) -> Result<(), ErrEngine> {
        for &id in ids {
            self.store.range_of(id)?;
            self.properties.get(id)?;
            self.origins.get(id)?;
        }
        for &id in ids {
            self.store.translate(id, translation)?;
            self.origins.get_mut(id)?.origin += Vec2::new(translation.x, translation.y);
            self.properties.get_mut(id)?.z += translation.z;
        }
        self.invalidate();
        Ok(())
    }

    // Properties
    // ===========================================================================

    pub fn properties_of(&self, id: usize) -> Result<&HelixProperties, ErrEngine> {
        self.properties.get(id)
    }

    pub fn origin_of(&self, id: usize) -> Result<&HelixOrigin, ErrEngine> {
        self.origins.get(id)
    }

    /// Bulk accessor for the serialization layer.
    pub fn helix_properties_and_origins(
        &self,
    ) -> Vec<(usize, &HelixProperties, &HelixOrigin)> {
        self.ids
            .live_ids()
            .filter_map(|id| {
                let properties = self.properties.get(id).ok()?;
                let origin = self.origins.get(id).ok()?;
                Some((id, properties, origin))
            })
            .collect()
    }

    pub fn set_helix_name(&mut self, id: usize, name: String) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.name = name;
        self.version += 1;
        Ok(())
    }

    pub fn set_helix_color(&mut self, id: usize, color: u32) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.color = color;
        self.version += 1;
        Ok(())
    }

    pub fn set_helix_visibility(&mut self, id: usize, visible: bool) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.visible = visible;
        self.version += 1;
        Ok(())
    }

    /// Set the phase of the forward strand at base 0, in degrees.
    pub fn set_helix_phase(
        &mut self,
        id: usize,
        euler_z: f32,
        batch: BatchMode,
    ) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.euler_z = euler_z;
        self.after_geometry_change(id, batch)
    }

    pub fn set_helix_twist(
        &mut self,
        id: usize,
        bases_per_repeat: f32,
        turns_per_repeat: f32,
        batch: BatchMode,
    ) -> Result<(), ErrEngine> {
        let properties = self.properties.get_mut(id)?;
        properties.bases_per_repeat = bases_per_repeat;
        properties.turns_per_repeat = turns_per_repeat;
        self.after_geometry_change(id, batch)
    }

    pub fn set_minor_groove_angle(
        &mut self,
        id: usize,
        angle: f32,
        batch: BatchMode,
    ) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.minor_groove_angle = angle;
        self.after_geometry_change(id, batch)
    }

    pub fn set_helix_z(&mut self, id: usize, z: f32, batch: BatchMode) -> Result<(), ErrEngine> {
        self.properties.get_mut(id)?.z = z;
        self.after_geometry_change(id, batch)
    }

    fn after_geometry_change(&mut self, id: usize, batch: BatchMode) -> Result<(), ErrEngine> {
        match batch {
            BatchMode::Immediate => self.recompute_helix(id)?,
            BatchMode::Deferred => {
                if !self.deferred.contains(&id) {
                    self.deferred.push(id);
                }
            }
        }
        self.invalidate();
        Ok(())
    }

    /// Recompute the geometry of every helix touched in `BatchMode::Deferred`.
    pub fn flush_deferred(&mut self) -> Result<(), ErrEngine> {
        let pending = std::mem::take(&mut self.deferred);
        if pending.is_empty() {
            return Ok(());
        }
        log::debug!("recomputing {} deferred helices", pending.len());
        for id in pending {
            // the helix may have been removed since the write
            if self.ids.is_live(id) {
                self.recompute_helix(id)?;
            }
        }
        self.invalidate();
        Ok(())
    }

    fn recompute_helix(&mut self, id: usize) -> Result<(), ErrEngine> {
        let properties = self.properties.get(id)?.clone();
        let entry = *self.origins.get(id)?;
        let twist = HelixTwist::of(&properties);
        let (axis, forward, reverse) = points_from_params(
            entry.space_origin(properties.z),
            entry.direction,
            &twist,
            &self.parameters,
            0,
            properties.length,
        );
        self.store.overwrite(id, &axis, &forward, &reverse)
    }

    // Queries
    // ===========================================================================

    /// Read-only views of the axis, forward and reverse strand points of a
    /// helix. The views must not be held accross a mutating call; callers
    /// that need longer-lived data must copy it.
    pub fn coordinates_of(&self, id: usize) -> Result<(&[Vec3], &[Vec3], &[Vec3]), ErrEngine> {
        self.store.coordinates_of(id)
    }

    /// Every packed slot within `radius` of `point`, memoized.
    pub fn query_points(&mut self, radius: f32, point: Vec3) -> PointQueryResult {
        self.cache.query_points(&self.store, radius, point)
    }

    /// Every helix whose origin lies within `radius` of `point`, sorted by
    /// ascending distance, memoized.
    pub fn query_origins(&mut self, radius: f32, point: Vec2) -> Vec<usize> {
        self.cache.query_origins(&self.origins, radius, point)
    }

    /// The helices whose origin lies within `radius` of the origin of `id`,
    /// excluding `id` itself. This is the coarse pre-filter used before
    /// per-base crossover analysis.
    pub fn neighbors_within_radius(
        &mut self,
        id: usize,
        radius: f32,
    ) -> Result<Vec<usize>, ErrEngine> {
        let me = *self.origins.get(id)?;
        let hits = self.cache.query_origins(&self.origins, radius, me.origin);
        Ok(hits.into_iter().filter(|other| *other != id).collect())
    }

    /// Candidate crossover bases of every neighbour, by angular criterion.
    /// `angular_window` is in radians and `index_range` selects bases of
    /// `id`.
    pub fn crossover_candidates(
        &self,
        id: usize,
        neighbor_ids: &[usize],
        angular_window: f32,
        index_range: Range<usize>,
    ) -> Result<BTreeMap<usize, StrandHits>, ErrEngine> {
        neighbors::crossover_candidates(
            &self.store,
            &self.origins,
            &self.properties,
            &self.parameters,
            id,
            neighbor_ids,
            angular_window,
            index_range,
        )
    }

    /// Candidate crossover pairs of every neighbour, by distance criterion.
    pub fn bonded_neighbor_pairs(
        &self,
        id: usize,
        neighbor_ids: &[usize],
        index_range: Range<usize>,
    ) -> Result<BTreeMap<usize, BondedHits>, ErrEngine> {
        neighbors::bonded_neighbor_pairs(
            &self.store,
            &self.origins,
            &self.properties,
            &self.parameters,
            id,
            neighbor_ids,
            index_range,
        )
    }

    /// Partition the strands of a helix into atomically drawn segments.
    pub fn refresh_segments(
        &self,
        forward_strands: &[StrandEndpoints],
        reverse_strands: &[StrandEndpoints],
    ) -> (Vec<Vec<Segment>>, Vec<Vec<Segment>>) {
        segments::refresh_segments(forward_strands, reverse_strands)
    }

    /// The helix owning the most extreme axis Z coordinate.
    pub fn extreme_helix_z(&self, max: bool) -> Option<(usize, f32)> {
        self.store.extreme_axis_z(max)
    }

    /// The offset/size range of a helix inside the packed buffers.
    pub fn range_of(&self, id: usize) -> Result<OffsetSize, ErrEngine> {
        self.store.range_of(id)
    }

    /// Direct access to the packed buffers, for invariant checks and bulk
    /// readers.
    pub fn packed_store(&self) -> &PackedCoordinateStore {
        &self.store
    }
}
