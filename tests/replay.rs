//! Step-by-step edit replay vs the target snapshot.
//!
//! "Replay" = apply each edit from `diff(a, b)` to a live copy of `a`, one at
//! a time, the way a list view would animate them. "Target" = `b` itself.
//!
//! Any index that is off by one, any edit emitted in the wrong order, any
//! missing update shows up as a mismatch between the two.

use std::collections::BTreeSet;

use proptest::prelude::*;
use zengrid::*;

type Tile = Item<u8, u8>;

/// Items with unique ids (first occurrence wins) and a small payload range so
/// that retained ids sometimes change payload.
fn unique_items() -> impl Strategy<Value = Vec<Tile>> {
    prop::collection::vec((0u8..24, 0u8..3), 0..16).prop_map(|pairs| {
        let mut seen = BTreeSet::new();
        pairs
            .into_iter()
            .filter(|(id, _)| seen.insert(*id))
            .map(|(id, v)| Item::new(id, v))
            .collect()
    })
}

fn ids(items: &[Tile]) -> BTreeSet<u8> {
    items.iter().map(|t| t.id).collect()
}

/// Length of the longest strictly increasing subsequence, O(n²).
fn lis_len(seq: &[usize]) -> usize {
    let mut best = vec![1usize; seq.len()];
    for i in 0..seq.len() {
        for j in 0..i {
            if seq[j] < seq[i] {
                best[i] = best[i].max(best[j] + 1);
            }
        }
    }
    best.into_iter().max().unwrap_or(0)
}

/// Minimum number of single-item moves that sorts the retained items.
fn min_moves(a: &[Tile], b: &[Tile]) -> usize {
    let keep = ids(b);
    let target: Vec<u8> = b.iter().map(|t| t.id).filter(|id| ids(a).contains(id)).collect();
    let seq: Vec<usize> = a
        .iter()
        .filter(|t| keep.contains(&t.id))
        .map(|t| target.iter().position(|id| *id == t.id).unwrap())
        .collect();
    seq.len() - lis_len(&seq)
}

fn single(items: Vec<Tile>) -> Snapshot<u8, Tile> {
    Snapshot::new().with_group(0, items)
}

fn replay_one_by_one(start: &Snapshot<u8, Tile>, edits: &[Edit<u8, Tile>]) -> Snapshot<u8, Tile> {
    let mut live = start.clone();
    for edit in edits {
        live.apply(std::slice::from_ref(edit))
            .unwrap_or_else(|e| panic!("edit {edit:?} failed: {e}"));
    }
    live
}

// ---- Fixed scenarios ----

#[test]
fn scenario_remove_move_insert() {
    let item = |id| Item::new(id, 0u8);
    let a = single(vec![item(1), item(2), item(3)]);
    let b = single(vec![item(3), item(1), item(4)]);
    let edits = diff(&a, &b).unwrap();
    assert_eq!(
        edits,
        vec![
            Edit::Remove { group: 0, index: 1 },
            Edit::Move {
                group: 0,
                from: 1,
                to: 0
            },
            Edit::Insert {
                group: 0,
                index: 2,
                item: item(4)
            },
        ]
    );
    assert_eq!(replay_one_by_one(&a, &edits), b);
}

#[test]
fn interleaved_changes() {
    let item = |id| Item::new(id, 0u8);
    let a = single((0..8).map(item).collect());
    let b = single([7, 9, 2, 0, 5, 10, 3, 1].into_iter().map(item).collect());
    let edits = diff(&a, &b).unwrap();
    assert_eq!(replay_one_by_one(&a, &edits), b);
    assert_eq!(edits.iter().filter(|e| matches!(e, Edit::Remove { .. })).count(), 2);
    assert_eq!(edits.iter().filter(|e| matches!(e, Edit::Insert { .. })).count(), 2);
}

#[test]
fn two_groups_replay_independently() {
    let item = |id| Item::new(id, 0u8);
    let a = Snapshot::new()
        .with_group(0u8, vec![item(1), item(2), item(3)])
        .with_group(1u8, vec![item(4), item(5)]);
    let b = Snapshot::new()
        .with_group(0u8, vec![item(3), item(1)])
        .with_group(1u8, vec![item(2), item(5), item(4)]);
    let edits = diff(&a, &b).unwrap();
    // Crossing groups is a remove plus an insert, never a move.
    assert!(edits.contains(&Edit::Remove { group: 0, index: 1 }));
    assert!(edits.contains(&Edit::Insert {
        group: 1,
        index: 0,
        item: item(2)
    }));
    assert_eq!(replay_one_by_one(&a, &edits), b);
}

#[test]
fn new_group_appears_on_insert() {
    let item = |id| Item::new(id, 0u8);
    let a = Snapshot::new().with_group(0u8, vec![item(1)]);
    let b = Snapshot::new()
        .with_group(0u8, vec![item(1)])
        .with_group(1u8, vec![item(2), item(3)]);
    let edits = diff(&a, &b).unwrap();
    assert_eq!(replay_one_by_one(&a, &edits), b);
}

// ---- Properties ----

proptest! {
    #[test]
    fn replay_reaches_target(a in unique_items(), b in unique_items()) {
        let (sa, sb) = (single(a), single(b));
        let edits = diff(&sa, &sb).unwrap();
        prop_assert_eq!(replay_one_by_one(&sa, &edits), sb);
    }

    #[test]
    fn replay_reaches_target_across_groups(
        a0 in unique_items(), a1 in unique_items(),
        b0 in unique_items(), b1 in unique_items(),
    ) {
        let sa = Snapshot::new().with_group(0u8, a0).with_group(1u8, a1);
        let sb = Snapshot::new().with_group(0u8, b0).with_group(1u8, b1);
        let edits = diff(&sa, &sb).unwrap();
        prop_assert_eq!(replay_one_by_one(&sa, &edits), sb);
    }

    #[test]
    fn inserts_and_removes_match_set_difference(a in unique_items(), b in unique_items()) {
        let edits = diff(&single(a.clone()), &single(b.clone())).unwrap();
        let (ia, ib) = (ids(&a), ids(&b));
        let inserts = edits.iter().filter(|e| matches!(e, Edit::Insert { .. })).count();
        let removes = edits.iter().filter(|e| matches!(e, Edit::Remove { .. })).count();
        prop_assert_eq!(inserts, ib.difference(&ia).count());
        prop_assert_eq!(removes, ia.difference(&ib).count());
    }

    #[test]
    fn move_count_is_minimal(a in unique_items(), b in unique_items()) {
        let edits = diff(&single(a.clone()), &single(b.clone())).unwrap();
        let moves = edits.iter().filter(|e| e.is_move()).count();
        prop_assert_eq!(moves, min_moves(&a, &b));
    }

    #[test]
    fn edits_are_grouped_by_kind(a in unique_items(), b in unique_items()) {
        let edits = diff(&single(a), &single(b)).unwrap();
        let rank = |e: &Edit<u8, Tile>| match e {
            Edit::Remove { .. } => 0,
            Edit::Move { .. } => 1,
            Edit::Insert { .. } => 2,
            Edit::Update { .. } => 3,
        };
        prop_assert!(edits.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));
    }

    #[test]
    fn reorder_is_moves_only(
        (current, target) in unique_items()
            .prop_flat_map(|a| (Just(a.clone()), Just(a).prop_shuffle()))
    ) {
        let txn = apply_reorder(0u8, &current, &target).unwrap();
        prop_assert!(txn.edits.iter().all(Edit::is_move));
        prop_assert_eq!(txn.edits.len(), min_moves(&current, &target));
        prop_assert_eq!(txn.moved.len(), txn.edits.len());
        let mut replay = current.clone();
        apply_edits(&mut replay, &txn.edits).unwrap();
        prop_assert_eq!(&replay, &target);
        prop_assert_eq!(txn.final_order, target);
    }
}
