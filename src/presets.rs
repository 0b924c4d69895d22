//! The photo grid: a horizontally scrolling carousel above a mosaic.
//!
//! ```text
//!     Carousel (Continuous)          Mosaic, one pattern pair
//!     ┌────┬────┬────┬ ─ ─ ┐         ┌────┬────┬────────┐
//!     │ 0  │ 1  │ 2  │  3    …       │ 0  │ 1  │        │
//!     └────┴────┴────┴ ─ ─ ┘         ├────┼────┤   4    │  row A
//!                                    │ 2  │ 3  │        │
//!                                    ├────┴────┼────┬────┤
//!                                    │         │ 6  │ 7  │
//!                                    │    5    ├────┼────┤  row B
//!                                    │         │ 8  │ 9  │
//!                                    └─────────┴────┴────┘
//! ```
//!
//! # Example
//!
//! ```
//! use zengrid::presets::{PhotoGridConfig, PhotoSection};
//! use zengrid::{Size, compute_layout};
//!
//! let viewport = Size::new(390.0, 844.0);
//! let sections = PhotoGridConfig::default().sections(viewport, 30, 10);
//! let geometry = compute_layout(&sections, viewport).unwrap();
//!
//! assert_eq!(geometry[0].id, PhotoSection::Carousel);
//! assert_eq!(geometry[1].items.len(), 10);
//! ```

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::compose::{Dimension, LayoutNode, LayoutSize, ScrollBehavior, Section};
use crate::geometry::{Axis, Insets, Size};
use crate::reconcile::Keyed;

/// Sections of the photo grid, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhotoSection {
    /// Horizontally scrolling strip of uniform tiles.
    Carousel,
    /// Vertical mosaic of small blocks and feature tiles.
    Mosaic,
}

impl PhotoSection {
    pub const ALL: [Self; 2] = [Self::Carousel, Self::Mosaic];

    /// Header title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Carousel => "Horizontal Section",
            Self::Mosaic => "Vertical Section",
        }
    }
}

/// A remote photo: identity plus the URL to fetch it from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    pub id: String,
    pub url: String,
}

impl Photo {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

impl Keyed for Photo {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}

/// Slots in one mosaic pattern pair (two rows of 4 small tiles + 1 feature).
pub const MOSAIC_PAIR_CAPACITY: usize = 10;

/// Sizing of the photo grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoGridConfig {
    /// Carousel tiles per viewport width.
    pub carousel_columns: usize,
    pub carousel_height: f64,
    pub header_height: f64,
    /// Uniform inset around every tile; adjacent insets form the gutter.
    pub inset: f64,
    /// Overall mosaic height, independent of the item count.
    pub mosaic_height: f64,
    /// Row-pattern pairs stacked in the mosaic.
    pub mosaic_pattern_pairs: usize,
}

impl Default for PhotoGridConfig {
    fn default() -> Self {
        Self {
            carousel_columns: 3,
            carousel_height: 150.0,
            header_height: 80.0,
            inset: 1.0,
            mosaic_height: 800.0,
            mosaic_pattern_pairs: 1,
        }
    }
}

impl PhotoGridConfig {
    pub fn carousel_columns(mut self, columns: usize) -> Self {
        self.carousel_columns = columns;
        self
    }

    pub fn inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    pub fn mosaic(mut self, height: f64, pattern_pairs: usize) -> Self {
        self.mosaic_height = height;
        self.mosaic_pattern_pairs = pattern_pairs;
        self
    }

    /// Grow the mosaic so that `count` items fit, keeping the height of each
    /// pattern pair. Never shrinks.
    pub fn fit_mosaic(mut self, count: usize) -> Self {
        let pairs = count.div_ceil(MOSAIC_PAIR_CAPACITY).max(1);
        if pairs > self.mosaic_pattern_pairs && self.mosaic_pattern_pairs > 0 {
            let per_pair = self.mosaic_height / self.mosaic_pattern_pairs as f64;
            self.mosaic_height = per_pair * pairs as f64;
            self.mosaic_pattern_pairs = pairs;
        }
        self
    }

    /// Carousel tile width for a viewport.
    pub fn carousel_item_width(&self, viewport: Size) -> f64 {
        viewport.width / self.carousel_columns as f64
    }

    /// Both sections, with headers, in [`PhotoSection::ALL`] order.
    ///
    /// The carousel always has at least one slot, so an empty carousel still
    /// occupies its height.
    pub fn sections(
        &self,
        viewport: Size,
        carousel_count: usize,
        mosaic_count: usize,
    ) -> Vec<Section<PhotoSection>> {
        let carousel_root = carousel(
            self.carousel_item_width(viewport),
            self.carousel_height,
            carousel_count.max(1),
            self.inset,
        );
        let mosaic_root = mosaic(self.mosaic_height, self.mosaic_pattern_pairs, self.inset);
        vec![
            Section::new(PhotoSection::Carousel, carousel_root)
                .with_header(self.header_height)
                .scroll(ScrollBehavior::Continuous)
                .item_count(carousel_count),
            Section::new(PhotoSection::Mosaic, mosaic_root)
                .with_header(self.header_height)
                .item_count(mosaic_count),
        ]
    }
}

/// A row of `slots` tiles of `item_width`, as wide as all of them together.
pub fn carousel(item_width: f64, height: f64, slots: usize, inset: f64) -> LayoutNode {
    let tile = LayoutNode::item(LayoutSize::new(
        Dimension::Absolute(item_width),
        Dimension::Fraction(1.0),
    ))
    .insets(Insets::uniform(inset));
    LayoutNode::repeating(
        Axis::Horizontal,
        LayoutSize::new(
            Dimension::Absolute(item_width * slots as f64),
            Dimension::Absolute(height),
        ),
        tile,
        slots,
    )
}

/// `pattern_pairs` stacked pairs of mirrored rows, `height` tall in total.
pub fn mosaic(height: f64, pattern_pairs: usize, inset: f64) -> LayoutNode {
    let insets = Insets::uniform(inset);
    let small = LayoutNode::item(LayoutSize::new(
        Dimension::Fraction(0.5),
        Dimension::Fraction(1.0),
    ))
    .insets(insets);
    let small_pair = LayoutNode::repeating(
        Axis::Horizontal,
        LayoutSize::new(Dimension::Fraction(1.0), Dimension::Fraction(0.5)),
        small,
        2,
    );
    let block = LayoutNode::repeating(
        Axis::Vertical,
        LayoutSize::new(Dimension::Fraction(2.0 / 3.0), Dimension::Fraction(1.0)),
        small_pair,
        2,
    );
    let feature = LayoutNode::item(LayoutSize::new(
        Dimension::Fraction(1.0 / 3.0),
        Dimension::Fraction(1.0),
    ))
    .insets(insets);

    let row = LayoutSize::new(Dimension::Fraction(1.0), Dimension::Fraction(0.5));
    let block_then_feature = LayoutNode::horizontal(row, vec![block.clone(), feature.clone()]);
    let feature_then_block = LayoutNode::horizontal(row, vec![feature, block]);

    let pair = LayoutNode::vertical(
        LayoutSize::new(
            Dimension::Fraction(1.0),
            Dimension::Fraction(1.0 / pattern_pairs.max(1) as f64),
        ),
        vec![block_then_feature, feature_then_block],
    );
    LayoutNode::repeating(
        Axis::Vertical,
        LayoutSize::new(Dimension::Fraction(1.0), Dimension::Absolute(height)),
        pair,
        pattern_pairs,
    )
}
