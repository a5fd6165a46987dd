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

use super::*;
use ultraviolet::{Vec2, Vec3};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Check that the ranges of the live helices tile `[0, total_points)` with
/// no overlap and no gap, that every slot is stamped with its owner and its
/// intra-helix index, and that the unused capacity keeps its sentinels.
fn assert_packing_invariant(group: &HelixGroup) {
    let store = group.packed_store();
    let total = store.total_points();
    let mut covered = vec![false; total];
    for (id, properties, _) in group.helix_properties_and_origins() {
        let range = group.range_of(id).unwrap();
        assert_eq!(properties.length, range.size);
        for (k, slot) in (range.offset..range.offset + range.size).enumerate() {
            assert!(!covered[slot], "overlapping ranges at slot {}", slot);
            covered[slot] = true;
            assert_eq!(store.owners()[slot], id as i32);
            assert_eq!(store.intra_indices()[slot] as usize, k);
        }
    }
    assert!(covered.iter().all(|c| *c), "gap in the packed buffers");
    for slot in total..store.capacity() {
        assert!(store.slot(slot).is_none());
    }
}

fn snapshot(group: &HelixGroup, id: usize) -> (Vec<Vec3>, Vec<Vec3>, Vec<Vec3>) {
    let (axis, forward, reverse) = group.coordinates_of(id).unwrap();
    (axis.to_vec(), forward.to_vec(), reverse.to_vec())
}

#[test]
fn packing_invariant_survives_a_lifecycle_gauntlet() {
    init_logging();
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    assert_packing_invariant(&group);
    let id1 = group
        .create_helix(Vec2::new(2.65, 0.), Vec3::unit_z(), 32, Default::default())
        .unwrap();
    let id2 = group
        .create_helix(Vec2::new(0., -2.65), Vec3::unit_z(), 7, Default::default())
        .unwrap();
    assert_packing_invariant(&group);

    group.resize_helix(id0, 11, true).unwrap();
    assert_packing_invariant(&group);
    group.resize_helix(id1, 5, false).unwrap();
    assert_packing_invariant(&group);
    group.resize_helix(id2, -7, true).unwrap();
    assert_packing_invariant(&group);
    assert_eq!(group.range_of(id2).unwrap().size, 0);

    group.remove_helix(id1).unwrap();
    assert_packing_invariant(&group);
    let id3 = group
        .create_helix(Vec2::new(5.3, 0.), Vec3::unit_z(), 12, Default::default())
        .unwrap();
    assert_eq!(id3, id1, "the recycled identifier must be reused");
    assert_packing_invariant(&group);

    group.translate_helices(&[id0, id3], Vec3::new(1., -2., 0.5)).unwrap();
    assert_packing_invariant(&group);
}

#[test]
fn high_end_resize_round_trip_is_bit_identical() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(2.65, 0.), Vec3::unit_z(), 13, Default::default())
        .unwrap();
    let before0 = snapshot(&group, id0);
    let before1 = snapshot(&group, id1);
    let range0 = group.range_of(id0).unwrap();
    let range1 = group.range_of(id1).unwrap();

    group.resize_helix(id0, 5, true).unwrap();
    group.resize_helix(id0, -5, true).unwrap();

    assert_eq!(snapshot(&group, id0), before0);
    assert_eq!(snapshot(&group, id1), before1);
    assert_eq!(group.range_of(id0).unwrap(), range0);
    assert_eq!(group.range_of(id1).unwrap(), range1);
}

#[test]
fn low_end_resize_round_trip_is_bit_identical() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(2.65, 0.), Vec3::unit_z(), 13, Default::default())
        .unwrap();
    let before0 = snapshot(&group, id0);
    let before1 = snapshot(&group, id1);

    group.resize_helix(id0, 4, false).unwrap();
    group.resize_helix(id0, -4, false).unwrap();

    assert_eq!(snapshot(&group, id0), before0);
    assert_eq!(snapshot(&group, id1), before1);
}

#[test]
fn removing_and_reappending_bases_reproduces_the_same_points() {
    // create a 21 bases helix: the axis climbs by exactly one rise per base
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    let rise = group.parameters().z_step;
    {
        let (axis, _, _) = group.coordinates_of(id).unwrap();
        assert_eq!(axis.len(), 21);
        for (i, point) in axis.iter().enumerate() {
            assert_eq!(point.z, i as f32 * rise);
            assert_eq!((point.x, point.y), (0., 0.));
        }
    }
    let before = snapshot(&group, id);

    group.resize_helix(id, -5, true).unwrap();
    assert_eq!(group.coordinates_of(id).unwrap().0.len(), 16);
    group.resize_helix(id, 5, true).unwrap();

    // same deterministic formula, hence bit-for-bit identical points
    assert_eq!(snapshot(&group, id), before);
}

#[test]
fn ids_are_recycled_smallest_first() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(
            group
                .create_helix(
                    Vec2::new(i as f32 * 3., 0.),
                    Vec3::unit_z(),
                    5,
                    Default::default(),
                )
                .unwrap(),
        );
    }
    assert_eq!(ids, vec![0, 1, 2, 3]);
    group.remove_helix(2).unwrap();
    group.remove_helix(1).unwrap();
    assert_eq!(
        group
            .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
            .unwrap(),
        1
    );
    assert_eq!(
        group
            .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
            .unwrap(),
        2
    );
    assert_eq!(
        group
            .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
            .unwrap(),
        4
    );
}

#[test]
fn point_queries_never_return_removed_helices() {
    init_logging();
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 10, Default::default())
        .unwrap();
    let hits = group.query_points(1.5, Vec3::zero());
    assert_eq!(hits.ids, vec![id; 5]);
    assert_eq!(hits.intra_indices, vec![0, 1, 2, 3, 4]);
    // the second identical query is served by the cache
    assert_eq!(group.query_points(1.5, Vec3::zero()), hits);

    group.remove_helix(id).unwrap();
    assert!(group.query_points(1.5, Vec3::zero()).ids.is_empty());
}

#[test]
fn origin_queries_never_return_relocated_helices() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(1., 0.), Vec3::unit_z(), 5, Default::default())
        .unwrap();
    assert_eq!(group.query_origins(1.5, Vec2::zero()), vec![id0, id1]);

    group
        .translate_helices(&[id1], Vec3::new(100., 0., 0.))
        .unwrap();
    assert_eq!(group.query_origins(1.5, Vec2::zero()), vec![id0]);
}

#[test]
fn honeycomb_neighbors_scenario() {
    // two adjacent positions of a honeycomb lattice of radius 1.125
    let parameters = Parameters {
        helix_radius: 1.125,
        inter_helix_gap: 0.,
        ..Parameters::DEFAULT
    };
    let mut group = HelixGroup::new(parameters);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(2.25, 0.), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    assert_eq!(group.neighbors_within_radius(id0, 2.3).unwrap(), vec![id1]);
    assert!(group.neighbors_within_radius(id0, 2.0).unwrap().is_empty());
}

#[test]
fn crossover_candidates_where_strands_face_each_other() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let span = group.parameters().crossover_span();
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    // the neighbour's forward strand points back at id0 on base 0
    let neighbor_properties = HelixProperties {
        euler_z: 180.,
        ..Default::default()
    };
    let id1 = group
        .create_helix(Vec2::new(span, 0.), Vec3::unit_z(), 21, neighbor_properties)
        .unwrap();

    let candidates = group
        .crossover_candidates(id0, &[id1], 0.3, 0..21)
        .unwrap();
    let hits = &candidates[&id1];
    assert!(hits.forward.contains(&(0, 0)));
    assert!(hits.forward.contains(&(1, 0)));
    assert!(!hits.forward.contains(&(5, 5)));
    // the reverse strand faces id0 roughly half a turn further
    assert!(hits.reverse.contains(&(7, 7)));
}

#[test]
fn antiparallel_bonded_pairs_are_merged_with_the_prime5_end_first() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let span = group.parameters().crossover_span();
    let twist: f32 = 360. * 2. / 21.;
    let groove: f32 = 360. * 12. / 34.;
    // both phases straddle the facing direction by half a base, so bases 0
    // and 1 of both helices are candidates
    let my_properties = HelixProperties {
        euler_z: -twist / 2.,
        ..Default::default()
    };
    let neighbor_properties = HelixProperties {
        // reverse strand at 180° - twist/2 on base 0
        euler_z: 180. - twist / 2. - groove,
        ..Default::default()
    };
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, my_properties)
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(span, 0.), Vec3::unit_z(), 21, neighbor_properties)
        .unwrap();

    let bonded = group.bonded_neighbor_pairs(id0, &[id1], 0..21).unwrap();
    let hits = &bonded[&id1];
    assert!(hits.reverse.contains(&BondedPair {
        prime5: (0, 0),
        prime3: (1, 1),
    }));
    // nothing bonds the two forward strands at zero axial offset
    assert!(hits
        .forward
        .iter()
        .all(|pair| pair.prime5.0 > 1 || pair.prime3.0 > 1));
}

#[test]
fn parallel_bonded_pairs_need_one_rise_of_axial_offset() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let span = group.parameters().crossover_span();
    let twist: f32 = 360. * 2. / 21.;
    let my_properties = HelixProperties {
        euler_z: -twist / 2.,
        ..Default::default()
    };
    // the neighbour's forward strand straddles the facing direction one
    // base later, which puts the bond one rise up the axis
    let neighbor_properties = HelixProperties {
        euler_z: 180. - twist / 2. - twist,
        ..Default::default()
    };
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, my_properties)
        .unwrap();
    let id1 = group
        .create_helix(Vec2::new(span, 0.), Vec3::unit_z(), 21, neighbor_properties)
        .unwrap();

    let bonded = group.bonded_neighbor_pairs(id0, &[id1], 0..21).unwrap();
    let hits = &bonded[&id1];
    assert!(hits.forward.contains(&BondedPair {
        prime5: (0, 1),
        prime3: (1, 2),
    }));
}

#[test]
fn segments_cover_both_strand_sets() {
    let group = HelixGroup::new(Parameters::DEFAULT);
    let (forward, reverse) =
        group.refresh_segments(&[(0, 10), (5, 20)], &[(2, 8)]);
    assert_eq!(forward[0], vec![(0, 4), (5, 10)]);
    assert_eq!(forward[1], vec![(5, 10), (11, 20)]);
    assert_eq!(reverse[0], vec![(2, 8)]);
}

#[test]
fn deferred_property_writes_recompute_on_flush() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 10, Default::default())
        .unwrap();
    let before = snapshot(&group, id);

    group
        .set_helix_phase(id, 90., BatchMode::Deferred)
        .unwrap();
    // the write is recorded but the geometry is still the old one
    assert_eq!(snapshot(&group, id), before);

    group.flush_deferred().unwrap();
    let after = snapshot(&group, id);
    assert_ne!(after, before);
    assert_eq!(after.0, before.0, "the axis does not depend on the phase");

    // an immediate write does not wait for a flush
    group
        .set_helix_phase(id, 0., BatchMode::Immediate)
        .unwrap();
    assert_eq!(snapshot(&group, id), before);
}

#[test]
fn version_counter_tracks_mutations() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let v0 = group.version();
    let id = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
        .unwrap();
    assert!(group.version() > v0);
    let v1 = group.version();
    group.set_helix_color(id, 0xff0000).unwrap();
    assert!(group.version() > v1);
}

#[test]
fn extreme_z_ignores_unused_capacity() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id0 = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 21, Default::default())
        .unwrap();
    let raised = HelixProperties {
        z: 10.,
        ..Default::default()
    };
    let id1 = group
        .create_helix(Vec2::new(3., 0.), Vec3::unit_z(), 2, raised)
        .unwrap();
    // shrinking id0 leaves sentinel slots behind in the buffers
    group.resize_helix(id0, -15, true).unwrap();
    assert_eq!(group.extreme_helix_z(true).map(|(id, _)| id), Some(id1));
    assert_eq!(group.extreme_helix_z(false).map(|(id, _)| id), Some(id0));
}

#[test]
fn rejected_calls_leave_the_engine_intact() {
    let mut group = HelixGroup::new(Parameters::DEFAULT);
    let id = group
        .create_helix(Vec2::zero(), Vec3::unit_z(), 5, Default::default())
        .unwrap();
    let before = snapshot(&group, id);

    assert_eq!(
        group.resize_helix(id, -6, true),
        Err(ErrEngine::IllegalResize {
            current: 5,
            delta: -6
        })
    );
    assert!(matches!(
        group.remove_helix(77),
        Err(ErrEngine::UnknownId(77))
    ));
    assert!(matches!(
        group.translate_helices(&[id, 77], Vec3::unit_x()),
        Err(ErrEngine::UnknownId(77))
    ));

    assert_eq!(snapshot(&group, id), before);
    assert_packing_invariant(&group);
}

#[test]
fn properties_round_trip_through_json() {
    let properties = HelixProperties {
        name: String::from("Helix 3"),
        euler_z: 52.9,
        z: -1.5,
        length: 42,
        ..Default::default()
    };
    let json = serde_json::to_string(&properties).expect("serialization failed");
    let back: HelixProperties = serde_json::from_str(&json).expect("deserialization failed");
    assert_eq!(back, properties);
    assert_eq!(PROPERTY_SCHEMA_VERSION, 1);
}
