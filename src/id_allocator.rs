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
//! Allocation and recycling of virtual helix identifiers.

use crate::errors::ErrEngine;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

/// Assigns and recycles the small non negative integers identifying virtual
/// helices.
///
/// Identifiers of removed helices go back into a min-heap and are handed out
/// again before the high-water mark is raised, so that the set of live
/// identifiers stays dense.
#[derive(Debug, Clone, Default)]
pub struct IdentityAllocator {
    /// Identifiers freed by `recycle`, smallest first.
    recycled: BinaryHeap<Reverse<usize>>,
    live: BTreeSet<usize>,
    highest_used: Option<usize>,
}

impl IdentityAllocator {
    /// The identifier that the next `reserve` is expected to take: the
    /// smallest recycled identifier if any, the successor of the high-water
    /// mark otherwise.
    ///
    /// This does not mutate the allocator. Calling it twice without a
    /// `reserve` in between returns the same value both times.
    pub fn new_id(&self) -> usize {
        self.recycled
            .peek()
            .map(|Reverse(id)| *id)
            .unwrap_or_else(|| self.highest_used.map(|h| h + 1).unwrap_or(0))
    }

    /// Mark `id` as live.
    pub fn reserve(&mut self, id: usize) -> Result<(), ErrEngine> {
        if self.live.contains(&id) {
            return Err(ErrEngine::InvalidId(id));
        }
        let kept: BinaryHeap<Reverse<usize>> = self
            .recycled
            .drain()
            .filter(|Reverse(recycled)| *recycled != id)
            .collect();
        self.recycled = kept;
        self.live.insert(id);
        self.highest_used = Some(self.highest_used.map(|h| h.max(id)).unwrap_or(id));
        Ok(())
    }

    /// Give `id` back to the allocator.
    ///
    /// The caller guarantees that no other structure still references `id`.
    pub fn recycle(&mut self, id: usize) -> Result<(), ErrEngine> {
        if !self.live.remove(&id) {
            return Err(ErrEngine::DoubleFree(id));
        }
        self.recycled.push(Reverse(id));
        Ok(())
    }

    pub fn is_live(&self, id: usize) -> bool {
        self.live.contains(&id)
    }

    /// Live identifiers in ascending order.
    pub fn live_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.live.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
