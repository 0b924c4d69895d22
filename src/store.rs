//! Canonical per-group item storage.
//!
//! [`ItemStore`] owns the item sequences a screen displays. Replacing a group
//! returns the edits to animate; a reorder is validated, committed, and then
//! reported to the registered handler, which can persist the new order.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use core::fmt;

use crate::reconcile::{self, Edit, Keyed, ReconcileError, ReorderTransaction, Snapshot};

type ReorderFilter<T> = Box<dyn Fn(&T) -> bool>;
type ReorderHandler<G, T> = Box<dyn FnMut(&G, &[T])>;

/// Item sequences for a fixed, ordered set of groups.
pub struct ItemStore<G, T> {
    snapshot: Snapshot<G, T>,
    can_reorder: Option<ReorderFilter<T>>,
    on_reorder: Option<ReorderHandler<G, T>>,
}

impl<G, T> ItemStore<G, T>
where
    G: Eq + Clone,
    T: Keyed + PartialEq + Clone,
{
    /// Store with the given groups, all empty.
    pub fn new(groups: impl IntoIterator<Item = G>) -> Self {
        let mut snapshot = Snapshot::new();
        for group in groups {
            snapshot.append_group(group);
        }
        Self {
            snapshot,
            can_reorder: None,
            on_reorder: None,
        }
    }

    /// Current items of `group`; empty for unknown groups.
    pub fn items(&self, group: &G) -> &[T] {
        self.snapshot.items(group)
    }

    /// The whole store as a snapshot.
    pub fn snapshot(&self) -> &Snapshot<G, T> {
        &self.snapshot
    }

    /// Restrict which items may be moved by a reorder. All items may move
    /// until a predicate is set.
    pub fn set_can_reorder(&mut self, predicate: impl Fn(&T) -> bool + 'static) {
        self.can_reorder = Some(Box::new(predicate));
    }

    /// Called once per committed reorder with the group and its new order.
    pub fn set_reorder_handler(&mut self, handler: impl FnMut(&G, &[T]) + 'static) {
        self.on_reorder = Some(Box::new(handler));
    }

    /// Replace the items of `group` and return the edits from the old to the
    /// new sequence. The store is unchanged on error.
    pub fn replace(
        &mut self,
        group: &G,
        items: Vec<T>,
    ) -> Result<Vec<Edit<G, T>>, ReconcileError<G>> {
        self.require(group)?;
        let mut edits = Vec::new();
        reconcile::diff_group(group, self.snapshot.items(group), &items, &mut edits)?;
        self.snapshot.set_items(group.clone(), items);
        Ok(edits)
    }

    /// Commit a user-produced order for `group`.
    ///
    /// Locked items (see [`set_can_reorder`](Self::set_can_reorder)) cannot be
    /// dragged, but unlocked items may be dragged past them. An order is
    /// therefore accepted only if the locked items keep their order relative
    /// to each other; otherwise it fails with [`ReconcileError::ItemLocked`]
    /// at the first locked item, in `final_order`, that is out of place.
    /// Orders that change the identity set are rejected too. Nothing changes
    /// on error.
    pub fn reorder(
        &mut self,
        group: &G,
        final_order: Vec<T>,
    ) -> Result<ReorderTransaction<G, T>, ReconcileError<G>> {
        self.require(group)?;
        let current = self.snapshot.items(group);
        let txn = reconcile::apply_reorder(group.clone(), current, &final_order)?;
        if let Some(index) = self.locked_out_of_order(current, &final_order) {
            return Err(ReconcileError::ItemLocked {
                group: group.clone(),
                index,
            });
        }
        Ok(self.commit(txn))
    }

    /// Drag the item at `from` to `to` within `group`.
    ///
    /// Fails with [`ReconcileError::ItemLocked`] at `from` when the dragged
    /// item is locked. Items it passes may be locked.
    pub fn move_item(
        &mut self,
        group: &G,
        from: usize,
        to: usize,
    ) -> Result<ReorderTransaction<G, T>, ReconcileError<G>> {
        self.require(group)?;
        let current = self.snapshot.items(group);
        let order = reconcile::moved::<G, T>(current, from, to)?;
        if self.can_reorder.as_ref().is_some_and(|can| !can(&current[from])) {
            return Err(ReconcileError::ItemLocked {
                group: group.clone(),
                index: from,
            });
        }
        let txn = reconcile::apply_reorder(group.clone(), current, &order)?;
        Ok(self.commit(txn))
    }

    /// Index in `final_order` of the first locked item that breaks the
    /// relative order the locked items have in `current`.
    fn locked_out_of_order(&self, current: &[T], final_order: &[T]) -> Option<usize> {
        let can_reorder = self.can_reorder.as_ref()?;
        let locked: BTreeSet<&T::Key> = current
            .iter()
            .filter(|item| !can_reorder(*item))
            .map(Keyed::key)
            .collect();
        let mut expected = current.iter().map(Keyed::key).filter(|k| locked.contains(k));
        final_order
            .iter()
            .position(|item| locked.contains(item.key()) && expected.next() != Some(item.key()))
    }

    fn commit(&mut self, txn: ReorderTransaction<G, T>) -> ReorderTransaction<G, T> {
        self.snapshot.set_items(txn.group.clone(), txn.final_order.clone());
        if let Some(handler) = &mut self.on_reorder {
            handler(&txn.group, self.snapshot.items(&txn.group));
        }
        txn
    }

    fn require(&self, group: &G) -> Result<(), ReconcileError<G>> {
        if self.snapshot.contains_group(group) {
            Ok(())
        } else {
            Err(ReconcileError::UnknownGroup {
                group: group.clone(),
            })
        }
    }
}

impl<G: fmt::Debug, T: fmt::Debug> fmt::Debug for ItemStore<G, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("snapshot", &self.snapshot)
            .field("can_reorder", &self.can_reorder.is_some())
            .field("on_reorder", &self.on_reorder.is_some())
            .finish()
    }
}
