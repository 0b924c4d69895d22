//! Ordered-collection reconciliation: keyed diffing, edit replay, and reorder
//! transactions.
//!
//! A [`Snapshot`] is an ordered list of groups, each holding an ordered list of
//! items with identities that are unique within the group. [`diff`] turns two
//! snapshots into a list of [`Edit`]s that, replayed in order against the
//! first snapshot, reproduce the second.
//!
//! Within a group, edits are emitted in replay order:
//!
//! 1. `Remove` for identities that disappeared, highest index first.
//! 2. `Move` for retained identities outside the longest run that is already
//!    in target order, lowest target position first.
//! 3. `Insert` for new identities, lowest target index first.
//! 4. `Update` for retained identities whose payload changed, at their final
//!    index.
//!
//! Every index refers to the live sequence at the moment the edit is applied.
//! Moving an item between groups is a `Remove` in one group and an `Insert`
//! in the other.
//!
//! # Example
//!
//! ```
//! use zengrid::{Edit, Item, Snapshot, diff};
//!
//! let item = |id: &'static str| Item::new(id, ());
//! let before = Snapshot::new().with_group(0u8, vec![item("p1"), item("p2"), item("p3")]);
//! let after = Snapshot::new().with_group(0u8, vec![item("p3"), item("p1"), item("p4")]);
//!
//! let edits = diff(&before, &after).unwrap();
//! assert_eq!(
//!     edits,
//!     vec![
//!         Edit::Remove { group: 0, index: 1 },
//!         Edit::Move { group: 0, from: 1, to: 0 },
//!         Edit::Insert { group: 0, index: 2, item: item("p4") },
//!     ]
//! );
//!
//! let mut replay = before.clone();
//! replay.apply(&edits).unwrap();
//! assert_eq!(replay, after);
//! ```

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use core::fmt::Debug;

/// An item with a stable identity.
///
/// Identity must be unique within a group. Value equality (`PartialEq`) of
/// the whole item decides whether a retained identity needs an `Update`.
pub trait Keyed {
    type Key: Ord + Clone + Debug;

    fn key(&self) -> &Self::Key;
}

/// Generic item: identity plus payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item<K, P> {
    pub id: K,
    pub payload: P,
}

impl<K, P> Item<K, P> {
    pub const fn new(id: K, payload: P) -> Self {
        Self { id, payload }
    }
}

impl<K: Ord + Clone + Debug, P> Keyed for Item<K, P> {
    type Key = K;

    fn key(&self) -> &K {
        &self.id
    }
}

/// One structural change to a group's sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edit<G, T> {
    /// Insert `item` so that it ends up at `index`.
    Insert { group: G, index: usize, item: T },
    /// Remove the item at `index`.
    Remove { group: G, index: usize },
    /// Take the item at `from` out, then reinsert it at `to`.
    Move { group: G, from: usize, to: usize },
    /// Replace the item at `index` (same identity, new payload).
    Update { group: G, index: usize, item: T },
}

impl<G, T> Edit<G, T> {
    /// Group the edit applies to.
    pub fn group(&self) -> &G {
        match self {
            Self::Insert { group, .. }
            | Self::Remove { group, .. }
            | Self::Move { group, .. }
            | Self::Update { group, .. } => group,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. })
    }
}

/// Reconciliation error.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError<G> {
    /// Two items in one group share an identity.
    #[error("duplicate identity in group {group:?} at index {index}")]
    DuplicateIdentity { group: G, index: usize },
    /// A reorder changed which identities the group holds.
    #[error("reorder of group {group:?} does not preserve its identity set")]
    IdentitySetMismatch { group: G },
    /// An edit or move referenced an index past the end of the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown group {group:?}")]
    UnknownGroup { group: G },
    /// A reorder moved an item that may not be reordered.
    #[error("item at index {index} of group {group:?} cannot be reordered")]
    ItemLocked { group: G, index: usize },
}

/// Ordered groups of ordered items.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<G, T> {
    groups: Vec<(G, Vec<T>)>,
}

impl<G, T> Default for Snapshot<G, T> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<G: Eq, T> Snapshot<G, T> {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty group. Existing groups keep their items and position.
    pub fn append_group(&mut self, group: G) {
        if self.position(&group).is_none() {
            self.groups.push((group, Vec::new()));
        }
    }

    /// Append items to the end of `group`, appending the group if needed.
    pub fn append_items(&mut self, group: G, items: impl IntoIterator<Item = T>) {
        match self.position(&group) {
            Some(i) => self.groups[i].1.extend(items),
            None => self.groups.push((group, items.into_iter().collect())),
        }
    }

    /// Builder form of [`append_items`](Self::append_items).
    pub fn with_group(mut self, group: G, items: Vec<T>) -> Self {
        self.append_items(group, items);
        self
    }

    /// Group identifiers in order.
    pub fn groups(&self) -> impl Iterator<Item = &G> {
        self.groups.iter().map(|(g, _)| g)
    }

    pub fn contains_group(&self, group: &G) -> bool {
        self.position(group).is_some()
    }

    /// Items of `group`; empty when the group is absent.
    pub fn items(&self, group: &G) -> &[T] {
        self.position(group)
            .map_or(&[][..], |i| self.groups[i].1.as_slice())
    }

    /// Replace the items of `group`, appending the group if needed.
    pub fn set_items(&mut self, group: G, items: Vec<T>) {
        match self.position(&group) {
            Some(i) => self.groups[i].1 = items,
            None => self.groups.push((group, items)),
        }
    }

    /// Total number of items across groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    fn position(&self, group: &G) -> Option<usize> {
        self.groups.iter().position(|(g, _)| g == group)
    }
}

impl<G: Eq + Clone, T: Clone> Snapshot<G, T> {
    /// Replay `edits` in order. On error the snapshot is left unchanged.
    ///
    /// An `Insert` into a missing group appends the group.
    pub fn apply(&mut self, edits: &[Edit<G, T>]) -> Result<(), ReconcileError<G>> {
        let mut staged = self.clone();
        for edit in edits {
            let i = match staged.position(edit.group()) {
                Some(i) => i,
                None => {
                    staged.groups.push((edit.group().clone(), Vec::new()));
                    staged.groups.len() - 1
                }
            };
            apply_edit(&mut staged.groups[i].1, edit)?;
        }
        *self = staged;
        Ok(())
    }
}

/// Replay `edits` against a single sequence, ignoring their group.
///
/// On error `items` is left unchanged.
pub fn apply_edits<G, T: Clone>(
    items: &mut Vec<T>,
    edits: &[Edit<G, T>],
) -> Result<(), ReconcileError<G>> {
    let mut staged = items.clone();
    for edit in edits {
        apply_edit(&mut staged, edit)?;
    }
    *items = staged;
    Ok(())
}

fn apply_edit<G, T: Clone>(items: &mut Vec<T>, edit: &Edit<G, T>) -> Result<(), ReconcileError<G>> {
    let len = items.len();
    let check = |index: usize, limit: usize| -> Result<(), ReconcileError<G>> {
        if index < limit {
            Ok(())
        } else {
            Err(ReconcileError::IndexOutOfRange { index, len })
        }
    };
    match edit {
        Edit::Insert { index, item, .. } => {
            check(*index, len + 1)?;
            items.insert(*index, item.clone());
        }
        Edit::Remove { index, .. } => {
            check(*index, len)?;
            items.remove(*index);
        }
        Edit::Move { from, to, .. } => {
            check(*from, len)?;
            check(*to, len)?;
            let item = items.remove(*from);
            items.insert(*to, item);
        }
        Edit::Update { index, item, .. } => {
            check(*index, len)?;
            items[*index] = item.clone();
        }
    }
    Ok(())
}

/// Compute the edits that turn `previous` into `next`.
///
/// Groups are visited in `next`'s order, then groups only `previous` holds.
/// Fails with [`ReconcileError::DuplicateIdentity`] if any group of either
/// snapshot repeats an identity.
pub fn diff<G, T>(
    previous: &Snapshot<G, T>,
    next: &Snapshot<G, T>,
) -> Result<Vec<Edit<G, T>>, ReconcileError<G>>
where
    G: Eq + Clone,
    T: Keyed + PartialEq + Clone,
{
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "diff",
        previous = previous.item_count(),
        next = next.item_count()
    )
    .entered();

    let mut edits = Vec::new();
    for group in next.groups() {
        diff_group(group, previous.items(group), next.items(group), &mut edits)?;
    }
    for group in previous.groups().filter(|g| !next.contains_group(g)) {
        diff_group(group, previous.items(group), &[], &mut edits)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(edits = edits.len(), "diff computed");

    Ok(edits)
}

/// Diff one group's sequences, appending edits to `out`.
pub(crate) fn diff_group<G, T>(
    group: &G,
    old: &[T],
    new: &[T],
    out: &mut Vec<Edit<G, T>>,
) -> Result<(), ReconcileError<G>>
where
    G: Clone,
    T: Keyed + PartialEq + Clone,
{
    let old_index = index_of(group, old)?;
    let new_index = index_of(group, new)?;

    for (i, item) in old.iter().enumerate().rev() {
        if !new_index.contains_key(item.key()) {
            out.push(Edit::Remove {
                group: group.clone(),
                index: i,
            });
        }
    }

    let live: Vec<&T::Key> = old
        .iter()
        .map(Keyed::key)
        .filter(|k| new_index.contains_key(*k))
        .collect();
    let target: Vec<&T::Key> = new
        .iter()
        .map(Keyed::key)
        .filter(|k| old_index.contains_key(*k))
        .collect();
    plan_moves(group, &live, &target, out);

    for (i, item) in new.iter().enumerate() {
        if !old_index.contains_key(item.key()) {
            out.push(Edit::Insert {
                group: group.clone(),
                index: i,
                item: item.clone(),
            });
        }
    }

    for (i, item) in new.iter().enumerate() {
        if let Some(&j) = old_index.get(item.key())
            && old[j] != *item
        {
            out.push(Edit::Update {
                group: group.clone(),
                index: i,
                item: item.clone(),
            });
        }
    }
    Ok(())
}

fn index_of<'a, G: Clone, T: Keyed>(
    group: &G,
    items: &'a [T],
) -> Result<BTreeMap<&'a T::Key, usize>, ReconcileError<G>> {
    let mut index = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        if index.insert(item.key(), i).is_some() {
            return Err(ReconcileError::DuplicateIdentity {
                group: group.clone(),
                index: i,
            });
        }
    }
    Ok(index)
}

/// Emit the moves that put `live` into `target` order. Both must hold the same
/// identities. Returns the target positions of the moved identities.
///
/// Items on the longest increasing run of target positions stay put. The rest
/// are visited in target order, and each is reinserted directly after its
/// target predecessor, which by then is already in its final relative place.
///
/// Live indices are counted rather than searched for. Every item has a sort
/// key for where it sits: `(i + 1, 0)` at its starting index `i`, and
/// `(a, 1 + rank)` once moved, where `a` is the first component of the key of
/// the nearest stable item preceding it in target order (`0` if there is
/// none). A moved item therefore lands behind that stable item and behind the
/// items moved there before it.
fn plan_moves<G: Clone, K: Ord, T>(
    group: &G,
    live: &[&K],
    target: &[&K],
    out: &mut Vec<Edit<G, T>>,
) -> Vec<usize> {
    let rank: BTreeMap<&K, usize> = target.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let positions: Vec<usize> = live.iter().map(|k| rank[k]).collect();
    let stable = longest_increasing(&positions);

    let mut start = vec![0; target.len()];
    for (i, &r) in positions.iter().enumerate() {
        start[r] = i;
    }

    let mut landings = Vec::new();
    let mut anchor = 0;
    for (r, &i) in start.iter().enumerate() {
        if stable[i] {
            anchor = i + 1;
        } else {
            landings.push((r, (anchor, 1 + r)));
        }
    }

    let mut keys: Vec<(usize, usize)> = (1..=live.len())
        .map(|i| (i, 0))
        .chain(landings.iter().map(|&(_, key)| key))
        .collect();
    keys.sort_unstable();
    let slot = |key: (usize, usize)| keys.binary_search(&key).unwrap_or_else(|i| i);

    let mut occupied = Occupancy::new(keys.len());
    for i in 1..=live.len() {
        occupied.insert(slot((i, 0)));
    }

    let mut moved = Vec::new();
    for (r, landing) in landings {
        let home = slot((start[r] + 1, 0));
        let from = occupied.before(home);
        occupied.remove(home);
        let dest = slot(landing);
        let to = occupied.before(dest);
        occupied.insert(dest);
        if from != to {
            out.push(Edit::Move {
                group: group.clone(),
                from,
                to,
            });
            moved.push(r);
        }
    }
    moved
}

/// Fenwick tree counting occupied slots.
struct Occupancy {
    tree: Vec<usize>,
}

impl Occupancy {
    fn new(slots: usize) -> Self {
        Self {
            tree: vec![0; slots + 1],
        }
    }

    fn insert(&mut self, slot: usize) {
        let mut i = slot + 1;
        while i < self.tree.len() {
            self.tree[i] += 1;
            i += i & i.wrapping_neg();
        }
    }

    fn remove(&mut self, slot: usize) {
        let mut i = slot + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Occupied slots strictly before `slot`.
    fn before(&self, slot: usize) -> usize {
        let mut i = slot;
        let mut count = 0;
        while i > 0 {
            count += self.tree[i];
            i &= i - 1;
        }
        count
    }
}

/// Mark one longest strictly increasing subsequence of `seq`.
///
/// The run is traced back from the element that first reached the maximum
/// length. Each step goes to the smallest-valued run end one shorter at the
/// time that element was visited, so with `[1, 0, 2]` the kept run is
/// `[0, 2]`, not `[1, 2]`.
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    let mut best: Option<usize> = None;
    let mut best_len = 0;

    for (i, &v) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < v);
        prev[i] = pos.checked_sub(1).map(|p| tails[p]);
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
        if pos + 1 > best_len {
            best_len = pos + 1;
            best = Some(i);
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cur = best;
    while let Some(i) = cur {
        keep[i] = true;
        cur = prev[i];
    }
    keep
}

/// A validated within-group reorder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderTransaction<G, T> {
    pub group: G,
    /// `Move` edits turning the current order into `final_order`.
    pub edits: Vec<Edit<G, T>>,
    /// Indices in `final_order` of the items the edits move. These come from
    /// the minimal plan and need not include the item a user dragged.
    pub moved: Vec<usize>,
    /// The accepted order, for the caller to store as canonical.
    pub final_order: Vec<T>,
}

/// Validate a user-produced permutation of one group and derive its moves.
///
/// Both orders must be duplicate-free and hold exactly the same identities;
/// otherwise the reorder is rejected with
/// [`ReconcileError::IdentitySetMismatch`]. Payload differences are not
/// reconciled: `final_order` is accepted as given.
pub fn apply_reorder<G, T>(
    group: G,
    current_order: &[T],
    final_order: &[T],
) -> Result<ReorderTransaction<G, T>, ReconcileError<G>>
where
    G: Clone,
    T: Keyed + Clone,
{
    let current = index_of(&group, current_order)?;
    let target = index_of(&group, final_order)?;
    if current.len() != target.len() || current.keys().any(|k| !target.contains_key(k)) {
        return Err(ReconcileError::IdentitySetMismatch { group });
    }

    let live: Vec<&T::Key> = current_order.iter().map(Keyed::key).collect();
    let order: Vec<&T::Key> = final_order.iter().map(Keyed::key).collect();
    let mut edits = Vec::new();
    let moved = plan_moves(&group, &live, &order, &mut edits);

    #[cfg(feature = "tracing")]
    tracing::debug!(moves = edits.len(), items = final_order.len(), "reorder planned");

    Ok(ReorderTransaction {
        group,
        edits,
        moved,
        final_order: final_order.to_vec(),
    })
}

/// The order produced by dragging the item at `from` to `to`.
pub fn moved<G, T: Clone>(
    order: &[T],
    from: usize,
    to: usize,
) -> Result<Vec<T>, ReconcileError<G>> {
    let len = order.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReconcileError::IndexOutOfRange { index, len });
        }
    }
    let mut out = order.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}
