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
//! Partition of strands into atomically drawn segments.
//!
//! Whenever the strand topology of a helix changes, the renderer needs the
//! maximal sub-ranges of base indices that can be treated as one unit. The
//! boundaries are the high endpoint of every strand, plus a "virtual"
//! boundary one below every strand's low endpoint so that a gap between two
//! strands stays representable.

/// Inclusive `(low, high)` endpoints of one strand.
pub type StrandEndpoints = (isize, isize);

/// An inclusive sub-range of base indices of one strand.
pub type Segment = (isize, isize);

/// Compute the segment lists of the forward and reverse strand-sets of a
/// helix. Each returned list is ordered and matches the corresponding input
/// strand.
pub fn refresh_segments(
    forward_strands: &[StrandEndpoints],
    reverse_strands: &[StrandEndpoints],
) -> (Vec<Vec<Segment>>, Vec<Vec<Segment>>) {
    (
        partition_strand_set(forward_strands),
        partition_strand_set(reverse_strands),
    )
}

fn partition_strand_set(strands: &[StrandEndpoints]) -> Vec<Vec<Segment>> {
    let mut boundaries: Vec<isize> = strands
        .iter()
        .flat_map(|(low, high)| vec![*high, low - 1])
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    strands
        .iter()
        .map(|(low, high)| {
            let mut segments = Vec::new();
            let mut position = *low;
            while position <= *high {
                // nearest boundary at or after the cursor; the strand's own
                // high endpoint guarantees one exists
                let next = boundaries.partition_point(|boundary| *boundary < position);
                let boundary = boundaries[next];
                segments.push((position, boundary));
                position = boundary + 1;
            }
            segments
        })
        .collect()
}
