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
//! Contiguous storage of every base position of every helix.
//!
//! Five parallel buffers hold the axis, forward strand and reverse strand
//! points together with the owning helix and the index of the base inside
//! its helix. Live helices map to disjoint ranges through an offset/size
//! table; the union of the ranges is `[0, total_points)` with no gap, and
//! growth or shrinkage of a helix only ever happens at one of the two ends
//! of its range.

use crate::errors::ErrEngine;
use ultraviolet::Vec3;

/// Sentinel stored in the owner and intra buffers for unused capacity.
pub const NO_OWNER: i32 = -1;

/// Sentinel stored in the point buffers for unused capacity. Non finite, so
/// that whole-buffer scans can mask unused slots out.
pub fn sentinel_point() -> Vec3 {
    Vec3::broadcast(f32::INFINITY)
}

/// The contiguous range `[offset, offset + size)` of one helix inside the
/// packed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSize {
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PackedCoordinateStore {
    axis: Vec<Vec3>,
    forward: Vec<Vec3>,
    reverse: Vec<Vec3>,
    owner: Vec<i32>,
    intra: Vec<i32>,
    offset_size: Vec<Option<OffsetSize>>,
    total_points: usize,
}

impl PackedCoordinateStore {
    /// Create an empty range entry for `id` at the tail of the store.
    pub fn register(&mut self, id: usize) -> Result<(), ErrEngine> {
        if id >= self.offset_size.len() {
            self.offset_size.resize(id + 1, None);
        }
        if self.offset_size[id].is_some() {
            return Err(ErrEngine::InvalidId(id));
        }
        self.offset_size[id] = Some(OffsetSize {
            offset: self.total_points,
            size: 0,
        });
        Ok(())
    }

    /// Drop the range entry of `id`. The range must have been emptied first.
    pub fn unregister(&mut self, id: usize) -> Result<(), ErrEngine> {
        let entry = self.entry(id)?;
        debug_assert_eq!(entry.size, 0, "unregistering a non empty helix");
        self.offset_size[id] = None;
        Ok(())
    }

    fn entry(&self, id: usize) -> Result<OffsetSize, ErrEngine> {
        self.offset_size
            .get(id)
            .copied()
            .flatten()
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn range_of(&self, id: usize) -> Result<OffsetSize, ErrEngine> {
        self.entry(id)
    }

    pub fn total_points(&self) -> usize {
        self.total_points
    }

    pub fn capacity(&self) -> usize {
        self.axis.len()
    }

    /// Grow the five buffers so that at least `needed` slots exist, doubling
    /// the allocation when the current capacity is exceeded.
    fn grow_to(&mut self, needed: usize) {
        if needed <= self.axis.len() {
            return;
        }
        let new_len = (self.axis.len() * 2).max(needed).max(16);
        self.axis.resize(new_len, sentinel_point());
        self.forward.resize(new_len, sentinel_point());
        self.reverse.resize(new_len, sentinel_point());
        self.owner.resize(new_len, NO_OWNER);
        self.intra.resize(new_len, NO_OWNER);
    }

    /// Stamp the owner and intra-helix indices of the whole range of `id`.
    fn restamp(&mut self, id: usize) {
        let entry = self.offset_size[id].unwrap_or(OffsetSize { offset: 0, size: 0 });
        for (i, slot) in (entry.offset..entry.offset + entry.size).enumerate() {
            self.owner[slot] = id as i32;
            self.intra[slot] = i as i32;
        }
    }

    /// Insert `n` new points at one end of the range of `id`, shifting every
    /// later range up by `n`.
    pub fn insert(
        &mut self,
        id: usize,
        axis: &[Vec3],
        forward: &[Vec3],
        reverse: &[Vec3],
        at_high_end: bool,
    ) -> Result<(), ErrEngine> {
        let entry = self.entry(id)?;
        debug_assert_eq!(axis.len(), forward.len());
        debug_assert_eq!(axis.len(), reverse.len());
        let n = axis.len();
        if n == 0 {
            return Ok(());
        }
        self.grow_to(self.total_points + n);
        let insertion = if at_high_end {
            entry.offset + entry.size
        } else {
            entry.offset
        };

        self.axis
            .copy_within(insertion..self.total_points, insertion + n);
        self.forward
            .copy_within(insertion..self.total_points, insertion + n);
        self.reverse
            .copy_within(insertion..self.total_points, insertion + n);
        self.owner
            .copy_within(insertion..self.total_points, insertion + n);
        self.intra
            .copy_within(insertion..self.total_points, insertion + n);

        self.axis[insertion..insertion + n].copy_from_slice(axis);
        self.forward[insertion..insertion + n].copy_from_slice(forward);
        self.reverse[insertion..insertion + n].copy_from_slice(reverse);

        for (other_id, other) in self.offset_size.iter_mut().enumerate() {
            if other_id == id {
                continue;
            }
            if let Some(other) = other.as_mut() {
                if other.offset >= insertion {
                    other.offset += n;
                }
            }
        }
        if let Some(entry) = self.offset_size[id].as_mut() {
            entry.size += n;
        }
        self.total_points += n;
        self.restamp(id);
        Ok(())
    }

    /// Remove `n` points from one end of the range of `id`, shifting every
    /// later range down by `n` and refilling the vacated tail with
    /// sentinels.
    pub fn remove(&mut self, id: usize, n: usize, at_high_end: bool) -> Result<(), ErrEngine> {
        let entry = self.entry(id)?;
        if n > entry.size {
            return Err(ErrEngine::RangeTooLarge {
                asked: n,
                size: entry.size,
            });
        }
        if n == 0 {
            return Ok(());
        }
        let removal = if at_high_end {
            entry.offset + entry.size - n
        } else {
            entry.offset
        };

        self.axis.copy_within(removal + n..self.total_points, removal);
        self.forward
            .copy_within(removal + n..self.total_points, removal);
        self.reverse
            .copy_within(removal + n..self.total_points, removal);
        self.owner
            .copy_within(removal + n..self.total_points, removal);
        self.intra
            .copy_within(removal + n..self.total_points, removal);

        for slot in self.total_points - n..self.total_points {
            self.axis[slot] = sentinel_point();
            self.forward[slot] = sentinel_point();
            self.reverse[slot] = sentinel_point();
            self.owner[slot] = NO_OWNER;
            self.intra[slot] = NO_OWNER;
        }

        for (other_id, other) in self.offset_size.iter_mut().enumerate() {
            if other_id == id {
                continue;
            }
            if let Some(other) = other.as_mut() {
                if other.offset >= removal + n {
                    other.offset -= n;
                }
            }
        }
        if let Some(entry) = self.offset_size[id].as_mut() {
            entry.size -= n;
        }
        self.total_points -= n;
        self.restamp(id);
        Ok(())
    }

    /// Overwrite the points of `id` in place. The slices must cover the
    /// whole current range.
    pub fn overwrite(
        &mut self,
        id: usize,
        axis: &[Vec3],
        forward: &[Vec3],
        reverse: &[Vec3],
    ) -> Result<(), ErrEngine> {
        let entry = self.entry(id)?;
        debug_assert_eq!(axis.len(), entry.size);
        let range = entry.offset..entry.offset + entry.size;
        self.axis[range.clone()].copy_from_slice(axis);
        self.forward[range.clone()].copy_from_slice(forward);
        self.reverse[range].copy_from_slice(reverse);
        Ok(())
    }

    /// Translate every point of `id` by `translation`.
    pub fn translate(&mut self, id: usize, translation: Vec3) -> Result<(), ErrEngine> {
        let entry = self.entry(id)?;
        for slot in entry.offset..entry.offset + entry.size {
            self.axis[slot] += translation;
            self.forward[slot] += translation;
            self.reverse[slot] += translation;
        }
        Ok(())
    }

    /// Read-only views of the axis, forward and reverse points of `id`.
    ///
    /// The views borrow the buffers and must not be held accross a mutating
    /// call.
    pub fn coordinates_of(&self, id: usize) -> Result<(&[Vec3], &[Vec3], &[Vec3]), ErrEngine> {
        let entry = self.entry(id)?;
        let range = entry.offset..entry.offset + entry.size;
        Ok((
            &self.axis[range.clone()],
            &self.forward[range.clone()],
            &self.reverse[range],
        ))
    }

    /// The owning helix and intra-helix index of a packed slot, or `None`
    /// for unused capacity.
    pub fn slot(&self, slot: usize) -> Option<(usize, usize)> {
        let owner = *self.owner.get(slot)?;
        if owner == NO_OWNER {
            None
        } else {
            Some((owner as usize, self.intra[slot] as usize))
        }
    }

    pub fn axis_points(&self) -> &[Vec3] {
        &self.axis[..self.total_points]
    }

    pub fn forward_points(&self) -> &[Vec3] {
        &self.forward[..self.total_points]
    }

    pub fn reverse_points(&self) -> &[Vec3] {
        &self.reverse[..self.total_points]
    }

    pub fn owners(&self) -> &[i32] {
        &self.owner[..self.total_points]
    }

    pub fn intra_indices(&self) -> &[i32] {
        &self.intra[..self.total_points]
    }

    /// The helix owning the most extreme axis Z coordinate, scanning the
    /// whole buffer and masking unused slots out.
    pub fn extreme_axis_z(&self, max: bool) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (slot, point) in self.axis.iter().enumerate() {
            if self.owner.get(slot).copied().unwrap_or(NO_OWNER) == NO_OWNER {
                continue;
            }
            if !point.z.is_finite() {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, z)) => {
                    if max {
                        point.z > z
                    } else {
                        point.z < z
                    }
                }
            };
            if better {
                best = Some((self.owner[slot] as usize, point.z));
            }
        }
        best
    }
}
