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
//! Candidate crossovers between a helix and its neighbours.
//!
//! A crossover is only plausible where a base of one helix faces a base of
//! the other. Two criteria are available: an angular one, which looks at
//! the twist angle of the neighbour's strands around its own axis, and a
//! distance-only one, which compares strand point distances against the
//! ideal antiparallel and parallel crossover geometries.

use crate::errors::ErrEngine;
use crate::geometry::{
    normalized_angle, rotation_from_to, signed_angle_difference, HelixTwist,
};
use crate::origins::OriginTable;
use crate::packed_store::PackedCoordinateStore;
use crate::parameters::Parameters;
use crate::properties::PropertyTable;
use std::collections::BTreeMap;
use std::ops::Range;
use ultraviolet::Vec3;

/// Axial displacement gate of a parallel crossover, as a fraction of the
/// squared base-pair rise. An antiparallel crossover requires the
/// displacement to stay below the lower bound.
const PARALLEL_Z_MIN: f32 = 0.3;
const PARALLEL_Z_MAX: f32 = 1.1;

/// Candidate bases per neighbour strand, as `(base of the queried helix,
/// base of the neighbour)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrandHits {
    pub forward: Vec<(isize, isize)>,
    pub reverse: Vec<(isize, isize)>,
}

/// Two consecutive candidate bases merged into one crossover pair, the 5'
/// member first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondedPair {
    pub prime5: (isize, isize),
    pub prime3: (isize, isize),
}

/// Merged crossover pairs per neighbour strand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondedHits {
    pub forward: Vec<BondedPair>,
    pub reverse: Vec<BondedPair>,
}

/// For every base of `id` in `index_range`, find the neighbour bases whose
/// strand angle falls within `angular_window` (radians) of the direction
/// from the neighbour's axis to that base.
///
/// The signed angular offset is measured around the neighbour's axis,
/// counter-clockwise when looking down the axis direction, from the
/// neighbour's angle-0 reference; only the bases adjacent to the nearest
/// axial slot of the neighbour are examined.
pub fn crossover_candidates(
    store: &PackedCoordinateStore,
    origins: &OriginTable,
    properties: &PropertyTable,
    parameters: &Parameters,
    id: usize,
    neighbor_ids: &[usize],
    angular_window: f32,
    index_range: Range<usize>,
) -> Result<BTreeMap<usize, StrandHits>, ErrEngine> {
    let (my_axis, _, _) = store.coordinates_of(id)?;
    let mut ret = BTreeMap::new();
    for &neighbor in neighbor_ids {
        if neighbor == id {
            continue;
        }
        let nb_origin = *origins.get(neighbor)?;
        let nb_properties = properties.get(neighbor)?;
        let nb_twist = HelixTwist::of(nb_properties);
        let (nb_axis, _, _) = store.coordinates_of(neighbor)?;
        let nb_base0 = nb_origin.space_origin(nb_properties.z);
        let direction = nb_origin.direction;
        let reference = rotation_from_to(Vec3::unit_z(), direction) * Vec3::unit_x();

        let mut hits = StrandHits::default();
        for i in index_range.clone() {
            let my_point = match my_axis.get(i) {
                Some(point) => *point,
                None => break,
            };
            let nearest = ((my_point - nb_base0).dot(direction) / parameters.z_step).round() as isize;
            for j in nearest - 1..=nearest + 1 {
                if j < 0 || j as usize >= nb_axis.len() {
                    continue;
                }
                let towards_me = my_point - nb_axis[j as usize];
                let in_plane = towards_me - towards_me.dot(direction) * direction;
                if in_plane.mag_sq() < 1e-9 {
                    continue;
                }
                let offset = normalized_angle(
                    direction
                        .dot(reference.cross(in_plane))
                        .atan2(reference.dot(in_plane)),
                );
                let forward_angle = normalized_angle(nb_twist.forward_angle(j));
                let reverse_angle = normalized_angle(nb_twist.reverse_angle(j));
                if signed_angle_difference(forward_angle, offset).abs() <= angular_window {
                    hits.forward.push((i as isize, j));
                }
                if signed_angle_difference(reverse_angle, offset).abs() <= angular_window {
                    hits.reverse.push((i as isize, j));
                }
            }
        }
        ret.insert(neighbor, hits);
    }
    Ok(ret)
}

/// Whether the base at `a` sits further along `direction` than the base at
/// `b`.
fn is_higher_z(a: Vec3, b: Vec3, direction: Vec3) -> bool {
    a.dot(direction) > b.dot(direction)
}

/// Distance-only crossover candidates, classified by the ideal crossover
/// geometries.
///
/// An antiparallel crossover connects strands running in opposite
/// directions: the two bonded points face each other at the same axial
/// position, separated by the inter-helix gap only (tangential plus radial
/// offset). A parallel crossover additionally displaces the bonded point by
/// one base-pair rise along the axis; its squared axial displacement must
/// fall in `[0.3, 1.1] × rise²`, while antiparallel candidates require a
/// near-zero axial displacement. Consecutive candidate bases are merged
/// into 5'/3' pairs.
pub fn bonded_neighbor_pairs(
    store: &PackedCoordinateStore,
    origins: &OriginTable,
    properties: &PropertyTable,
    parameters: &Parameters,
    id: usize,
    neighbor_ids: &[usize],
    index_range: Range<usize>,
) -> Result<BTreeMap<usize, BondedHits>, ErrEngine> {
    let (my_axis, my_forward, my_reverse) = store.coordinates_of(id)?;
    let my_direction = origins.get(id)?.direction;

    let rise_sq = parameters.z_step * parameters.z_step;
    // at an ideal crossover both strand points face each other accross the
    // inter-helix gap; each phase may be off by up to half a base twist, so
    // the in-plane band covers the corresponding radial and tangential
    // excursions
    let slack = std::f32::consts::PI / parameters.bases_per_turn;
    let radial = parameters.inter_helix_gap + 2. * parameters.helix_radius * (1. - slack.cos());
    let tangential = 2. * parameters.helix_radius * slack.sin();
    let in_plane_sq = radial * radial + tangential * tangential;
    let antiparallel_dist_sq = in_plane_sq + PARALLEL_Z_MIN * rise_sq;
    let parallel_dist_sq = in_plane_sq + PARALLEL_Z_MAX * rise_sq;

    let mut ret = BTreeMap::new();
    for &neighbor in neighbor_ids {
        if neighbor == id {
            continue;
        }
        let nb_origin = *origins.get(neighbor)?;
        let nb_properties = properties.get(neighbor)?;
        let (_, nb_forward, nb_reverse) = store.coordinates_of(neighbor)?;
        let nb_base0 = nb_origin.space_origin(nb_properties.z);
        let direction = nb_origin.direction;

        // candidates collected per (strand of id, strand of the neighbour)
        let mut fwd_to_fwd = Vec::new();
        let mut fwd_to_rev = Vec::new();
        let mut rev_to_fwd = Vec::new();
        let mut rev_to_rev = Vec::new();

        for i in index_range.clone() {
            let my_point_axis = match my_axis.get(i) {
                Some(point) => *point,
                None => break,
            };
            let nearest =
                ((my_point_axis - nb_base0).dot(direction) / parameters.z_step).round() as isize;
            for j in nearest - 2..=nearest + 2 {
                if j < 0 || j as usize >= nb_forward.len() {
                    continue;
                }
                let probe = |mine: Vec3, theirs: Vec3, antiparallel: bool| -> bool {
                    let bond = theirs - mine;
                    let axial_sq = {
                        let axial = bond.dot(direction);
                        axial * axial
                    };
                    if antiparallel {
                        bond.mag_sq() <= antiparallel_dist_sq && axial_sq < PARALLEL_Z_MIN * rise_sq
                    } else {
                        bond.mag_sq() <= parallel_dist_sq
                            && axial_sq >= PARALLEL_Z_MIN * rise_sq
                            && axial_sq <= PARALLEL_Z_MAX * rise_sq
                    }
                };
                let pair = (i as isize, j);
                // same-strand bonds are parallel, opposite-strand bonds are
                // antiparallel
                if probe(my_forward[i], nb_forward[j as usize], false) {
                    fwd_to_fwd.push(pair);
                }
                if probe(my_forward[i], nb_reverse[j as usize], true) {
                    fwd_to_rev.push(pair);
                }
                if probe(my_reverse[i], nb_forward[j as usize], true) {
                    rev_to_fwd.push(pair);
                }
                if probe(my_reverse[i], nb_reverse[j as usize], false) {
                    rev_to_rev.push(pair);
                }
            }
        }

        let mut hits = BondedHits::default();
        // hits are filed under the neighbour strand they land on
        hits.forward
            .extend(merge_pairs(&fwd_to_fwd, my_axis, my_direction, true));
        hits.forward
            .extend(merge_pairs(&rev_to_fwd, my_axis, my_direction, false));
        hits.reverse
            .extend(merge_pairs(&fwd_to_rev, my_axis, my_direction, true));
        hits.reverse
            .extend(merge_pairs(&rev_to_rev, my_axis, my_direction, false));
        hits.forward.sort_by_key(|pair| pair.prime5);
        hits.reverse.sort_by_key(|pair| pair.prime5);
        hits.forward.dedup();
        hits.reverse.dedup();
        ret.insert(neighbor, hits);
    }
    Ok(ret)
}

/// Merge consecutive candidate bases into crossover pairs. `my_forward`
/// tells which strand of the queried helix the candidates came from, so
/// that the 5' member can be picked by axial position: the 5' end of a
/// forward strand is the lower base, the 5' end of a reverse strand the
/// higher one.
fn merge_pairs(
    hits: &[(isize, isize)],
    my_axis: &[Vec3],
    my_direction: Vec3,
    my_forward: bool,
) -> Vec<BondedPair> {
    let mut pairs = Vec::new();
    let mut k = 0;
    while k + 1 < hits.len() {
        let first = hits[k];
        let second = hits[k + 1];
        if second.0 == first.0 + 1 && (second.1 - first.1).abs() <= 1 {
            let first_point = my_axis[first.0 as usize];
            let second_point = my_axis[second.0 as usize];
            let first_is_higher = is_higher_z(first_point, second_point, my_direction);
            let (prime5, prime3) = if first_is_higher == my_forward {
                (second, first)
            } else {
                (first, second)
            };
            pairs.push(BondedPair { prime5, prime3 });
            k += 2;
        } else {
            k += 1;
        }
    }
    pairs
}
