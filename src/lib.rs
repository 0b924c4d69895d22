//! Compositional grid layout and ordered-collection reconciliation.
//!
//! Pure computation: no rendering, no I/O, `no_std` compatible (with `alloc`).
//!
//! # Modules
//!
//! - [`geometry`]: Sizes, rectangles, insets, axes
//! - [`compose`]: Layout grammar (fractional/absolute sizes, groups, repeats) and resolution
//! - [`reconcile`]: Keyed diffing of grouped sequences, edit replay, reorder transactions
//! - [`store`]: Canonical per-group item store with reorder handlers
//! - [`presets`]: The photo grid: carousel and mosaic sections
//! - `svg`: SVG wireframes of resolved geometry (feature `svg`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compose;
pub mod geometry;
pub mod presets;
pub mod reconcile;
pub mod store;
#[cfg(feature = "svg")]
pub mod svg;

// Re-exports: layout
pub use compose::{
    Dimension, Header, ItemPlacement, LayoutError, LayoutNode, LayoutSize, ResolvedKind,
    ResolvedNode, ScrollBehavior, Section, SectionGeometry, SpecViolation, compute_layout,
    content_height, hit_test, resolve,
};
pub use geometry::{Axis, Insets, Rect, Size};

// Re-exports: reconciliation
pub use reconcile::{
    Edit, Item, Keyed, ReconcileError, ReorderTransaction, Snapshot, apply_edits, apply_reorder,
    diff, moved,
};
pub use store::ItemStore;
