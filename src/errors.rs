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
//! Errors returned by engine operations that could not be applied.
//!
//! All of these are local, synchronous and recoverable. Every mutating
//! operation validates its arguments before touching any buffer, so a
//! rejected call leaves the engine's invariants intact.

/// An error that occured when trying to apply an operation on the helix
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrEngine {
    /// The operation referenced an helix identifier that is not live.
    UnknownId(usize),
    /// The identifier is malformed, for example reserving an identifier
    /// that is already live.
    InvalidId(usize),
    /// `recycle` was called on an identifier that is not live.
    DoubleFree(usize),
    /// A removal asked for more points than the helix currently holds.
    RangeTooLarge { asked: usize, size: usize },
    /// A resize would shrink an helix below zero length.
    IllegalResize { current: usize, delta: isize },
}
