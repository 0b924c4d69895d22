//! Declarative layout composition.
//!
//! A [`Section`] wraps a tree of [`LayoutNode`]s. Leaves are item slots; groups
//! lay their children out one after another along an axis, each child filling
//! the group on the cross axis. [`compute_layout`] resolves a list of sections
//! against a viewport in a single top-down pass and assigns items to slots in
//! depth-first order.
//!
//! Pure geometry: no item data is consulted, only counts and specs.
//!
//! # Example
//!
//! ```
//! use zengrid::{Dimension, LayoutNode, LayoutSize, Section, Size, compute_layout};
//!
//! // Two half-width tiles in a 100pt row.
//! let half = LayoutSize::new(Dimension::Fraction(0.5), Dimension::Fraction(1.0));
//! let tile = LayoutNode::item(half);
//! let row = LayoutNode::horizontal(
//!     LayoutSize::new(Dimension::Fraction(1.0), Dimension::Absolute(100.0)),
//!     vec![tile.clone(), tile],
//! );
//! let geometry = compute_layout(&[Section::new(0u8, row).item_count(2)], Size::new(400.0, 800.0))
//!     .unwrap();
//!
//! assert_eq!(geometry[0].items[1].frame.x, 200.0);
//! assert_eq!(geometry[0].items[1].frame.width, 200.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::Float;

use crate::geometry::{Axis, Insets, Rect, Size};

/// How a node's extent along one axis is derived from its container.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    /// Share of the immediate container's extent on the same axis, in `(0, 1]`.
    Fraction(f64),
    /// Fixed extent in points, independent of the container.
    Absolute(f64),
}

impl Dimension {
    /// Resolve against the container's extent on the same axis.
    pub fn resolve(self, container: f64) -> f64 {
        match self {
            Self::Fraction(p) => container * p,
            Self::Absolute(px) => px,
        }
    }

    fn validate(self) -> Result<(), SpecViolation> {
        match self {
            Self::Fraction(p) if !(p.is_finite() && p > 0.0 && p <= 1.0) => {
                Err(SpecViolation::FractionOutOfRange)
            }
            Self::Absolute(px) if !(px.is_finite() && px > 0.0) => {
                Err(SpecViolation::NonPositiveAbsolute)
            }
            _ => Ok(()),
        }
    }
}

/// Declared width and height of a node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutSize {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    /// `Fraction(1.0)` on both axes.
    pub const fn fill() -> Self {
        Self::new(Dimension::Fraction(1.0), Dimension::Fraction(1.0))
    }

    /// Declared dimension along `axis`.
    pub const fn along(&self, axis: Axis) -> Dimension {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// One node of a section's layout tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutNode {
    /// A slot for one item. Insets shrink the visible content, never the slot.
    Item { size: LayoutSize, insets: Insets },
    /// Children laid out sequentially along `axis`.
    ///
    /// With `repeat: Some(n)`, `children` must hold exactly one node, which is
    /// resolved once and tiled `n` times.
    Group {
        axis: Axis,
        size: LayoutSize,
        children: Vec<LayoutNode>,
        repeat: Option<usize>,
    },
}

impl LayoutNode {
    /// Item slot without insets.
    pub fn item(size: LayoutSize) -> Self {
        Self::Item {
            size,
            insets: Insets::ZERO,
        }
    }

    /// Horizontal group of distinct children.
    pub fn horizontal(size: LayoutSize, children: Vec<LayoutNode>) -> Self {
        Self::Group {
            axis: Axis::Horizontal,
            size,
            children,
            repeat: None,
        }
    }

    /// Vertical group of distinct children.
    pub fn vertical(size: LayoutSize, children: Vec<LayoutNode>) -> Self {
        Self::Group {
            axis: Axis::Vertical,
            size,
            children,
            repeat: None,
        }
    }

    /// Group tiling `child` `count` times along `axis`.
    pub fn repeating(axis: Axis, size: LayoutSize, child: LayoutNode, count: usize) -> Self {
        Self::Group {
            axis,
            size,
            children: vec![child],
            repeat: Some(count),
        }
    }

    /// Set content insets. Has no effect on groups.
    pub fn insets(mut self, value: Insets) -> Self {
        if let Self::Item { insets, .. } = &mut self {
            *insets = value;
        }
        self
    }

    /// Declared size.
    pub fn size(&self) -> LayoutSize {
        match self {
            Self::Item { size, .. } | Self::Group { size, .. } => *size,
        }
    }

    /// Number of item slots this node produces.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Item { .. } => 1,
            Self::Group {
                children, repeat, ..
            } => {
                let per_pass = children
                    .iter()
                    .fold(0usize, |acc, c| acc.saturating_add(c.capacity()));
                per_pass.saturating_mul(repeat.unwrap_or(1))
            }
        }
    }

    /// Check the grammar without resolving anything.
    pub fn validate(&self) -> Result<(), SpecViolation> {
        let size = self.size();
        size.width.validate()?;
        size.height.validate()?;
        match self {
            Self::Item { insets, .. } => {
                if !insets.is_valid() {
                    return Err(SpecViolation::NegativeInset);
                }
                Ok(())
            }
            Self::Group {
                children, repeat, ..
            } => {
                if children.is_empty() {
                    return Err(SpecViolation::EmptyGroup);
                }
                match repeat {
                    Some(0) => return Err(SpecViolation::ZeroRepeat),
                    Some(_) if children.len() != 1 => {
                        return Err(SpecViolation::RepeatNeedsSingleChild);
                    }
                    _ => {}
                }
                children.iter().try_for_each(LayoutNode::validate)
            }
        }
    }
}

/// Scrolling behavior of a section's content along the horizontal axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    /// Content scrolls with the outer vertical axis only.
    #[default]
    None,
    /// Free horizontal scrolling.
    Continuous,
    /// Horizontal scrolling that rests on page boundaries (one viewport width).
    Paged,
}

impl ScrollBehavior {
    /// Whether the section scrolls on its own, across the outer axis.
    pub const fn is_orthogonal(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Boundary header above a section's content.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Absolute height in points.
    pub height: f64,
}

/// A layout section: root node, scroll behavior, optional header, and the
/// number of items currently backing it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section<G> {
    pub id: G,
    pub root: LayoutNode,
    pub scroll: ScrollBehavior,
    pub header: Option<Header>,
    pub item_count: usize,
}

impl<G> Section<G> {
    /// Section without header, without orthogonal scrolling, and with no items.
    pub fn new(id: G, root: LayoutNode) -> Self {
        Self {
            id,
            root,
            scroll: ScrollBehavior::None,
            header: None,
            item_count: 0,
        }
    }

    /// Reserve a header strip of `height` points above the content.
    pub fn with_header(mut self, height: f64) -> Self {
        self.header = Some(Header { height });
        self
    }

    /// Set the scroll behavior.
    pub fn scroll(mut self, scroll: ScrollBehavior) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set the number of backing items.
    pub fn item_count(mut self, count: usize) -> Self {
        self.item_count = count;
        self
    }

    fn validate(&self) -> Result<(), SpecViolation> {
        if let Some(header) = &self.header
            && !(header.height.is_finite() && header.height > 0.0)
        {
            return Err(SpecViolation::NonPositiveHeader);
        }
        self.root.validate()
    }
}

/// A layout tree resolved to concrete frames.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedNode {
    /// Logical frame allocated to the node.
    pub frame: Rect,
    pub kind: ResolvedKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedKind {
    /// Item slot; `content` is the frame shrunk by the item's insets.
    Slot { content: Rect },
    /// Group; children in layout order, repeats expanded.
    Group {
        axis: Axis,
        children: Vec<ResolvedNode>,
    },
}

impl ResolvedNode {
    fn translated(&self, axis: Axis, delta: f64) -> Self {
        let kind = match &self.kind {
            ResolvedKind::Slot { content } => ResolvedKind::Slot {
                content: content.translate_along(axis, delta),
            },
            ResolvedKind::Group {
                axis: inner,
                children,
            } => ResolvedKind::Group {
                axis: *inner,
                children: children.iter().map(|c| c.translated(axis, delta)).collect(),
            },
        };
        Self {
            frame: self.frame.translate_along(axis, delta),
            kind,
        }
    }

    /// Slots in depth-first order.
    pub fn slots(&self) -> Vec<(Rect, Rect)> {
        let mut out = Vec::new();
        self.collect_slots(&mut out);
        out
    }

    fn collect_slots(&self, out: &mut Vec<(Rect, Rect)>) {
        match &self.kind {
            ResolvedKind::Slot { content } => out.push((self.frame, *content)),
            ResolvedKind::Group { children, .. } => {
                for child in children {
                    child.collect_slots(out);
                }
            }
        }
    }
}

/// Resolve `node` with its top-left corner at `(x, y)`, sizing it against
/// `container`. The tree is validated first.
pub fn resolve(
    node: &LayoutNode,
    x: f64,
    y: f64,
    container: Size,
) -> Result<ResolvedNode, SpecViolation> {
    node.validate()?;
    let size = node.size();
    let frame = Rect::new(
        x,
        y,
        size.width.resolve(container.width),
        size.height.resolve(container.height),
    );
    Ok(place(node, frame))
}

/// Lay out an already-validated node into the frame its parent allocated.
fn place(node: &LayoutNode, frame: Rect) -> ResolvedNode {
    match node {
        LayoutNode::Item { insets, .. } => ResolvedNode {
            frame,
            kind: ResolvedKind::Slot {
                content: frame.inset(insets),
            },
        },
        LayoutNode::Group {
            axis,
            children,
            repeat,
            ..
        } => {
            let axis = *axis;
            let main = frame.extent(axis);
            let cross = frame.extent(axis.cross());
            let child_frame = |child: &LayoutNode, offset: f64| {
                let extent = child.size().along(axis).resolve(main);
                let size = Size::from_axes(axis, extent, cross);
                Rect::from_origin_size(frame.x, frame.y, size).translate_along(axis, offset)
            };

            let resolved = match repeat {
                Some(count) => {
                    let tile = place(&children[0], child_frame(&children[0], 0.0));
                    let step = tile.frame.extent(axis);
                    (0..*count)
                        .map(|i| tile.translated(axis, step * i as f64))
                        .collect()
                }
                None => {
                    let mut offset = 0.0;
                    children
                        .iter()
                        .map(|child| {
                            let r = place(child, child_frame(child, offset));
                            offset += r.frame.extent(axis);
                            r
                        })
                        .collect()
                }
            };

            ResolvedNode {
                frame,
                kind: ResolvedKind::Group {
                    axis,
                    children: resolved,
                },
            }
        }
    }
}

/// Placement of one item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPlacement<G> {
    /// Section the item belongs to.
    pub group: G,
    /// Index of the item within its section.
    pub index: usize,
    /// Logical slot.
    pub frame: Rect,
    /// Visually occupied area (slot minus insets).
    pub content: Rect,
}

/// Resolved geometry of one section.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionGeometry<G> {
    pub id: G,
    /// Header strip, if the section declares one.
    pub header: Option<Rect>,
    /// Header plus the full content, including parts beyond the fold.
    pub bounds: Rect,
    /// Part of `bounds` shown on screen at horizontal offset 0.
    pub visible: Rect,
    pub scroll: ScrollBehavior,
    /// One placement per item that got a slot, in item order.
    pub items: Vec<ItemPlacement<G>>,
    /// Number of slots the layout tree provides.
    pub capacity: usize,
    /// Items that did not fit into `capacity`.
    pub truncated: usize,
}

impl<G> SectionGeometry<G> {
    /// Placement of item `index`, if it got a slot.
    pub fn item(&self, index: usize) -> Option<&ItemPlacement<G>> {
        self.items.get(index)
    }

    /// Largest horizontal offset that still keeps the visible frame on content.
    pub fn max_offset(&self) -> f64 {
        if !self.scroll.is_orthogonal() {
            return 0.0;
        }
        (self.bounds.width - self.visible.width).max(0.0)
    }

    /// Items on screen when the section's content is scrolled by `offset`
    /// along x. Sections without orthogonal scrolling ignore the offset.
    pub fn visible_items(&self, offset: f64) -> impl Iterator<Item = &ItemPlacement<G>> {
        let offset = if self.scroll.is_orthogonal() {
            offset
        } else {
            0.0
        };
        let visible = self.visible;
        self.items
            .iter()
            .filter(move |p| p.frame.translate(-offset, 0.0).intersects(&visible))
    }

    /// Where scrolling comes to rest for a proposed offset.
    pub fn snap_offset(&self, offset: f64) -> f64 {
        let max = self.max_offset();
        match self.scroll {
            ScrollBehavior::None => 0.0,
            ScrollBehavior::Continuous => offset.clamp(0.0, max),
            ScrollBehavior::Paged => {
                let page = self.visible.width;
                if page <= 0.0 {
                    return 0.0;
                }
                ((offset / page).round() * page).clamp(0.0, max)
            }
        }
    }
}

/// Which item slot contains the point `(x, y)` in content coordinates.
pub fn hit_test<G: Copy>(geometry: &[SectionGeometry<G>], x: f64, y: f64) -> Option<(G, usize)> {
    geometry
        .iter()
        .filter(|s| s.bounds.contains(x, y))
        .flat_map(|s| s.items.iter())
        .find(|p| p.frame.contains(x, y))
        .map(|p| (p.group, p.index))
}

/// Total height of all sections.
pub fn content_height<G>(geometry: &[SectionGeometry<G>]) -> f64 {
    geometry.last().map_or(0.0, |s| s.bounds.bottom())
}

/// Malformed layout grammar.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SpecViolation {
    /// A `Fraction` outside `(0, 1]` or not finite.
    #[error("fractional dimension must be in (0, 1]")]
    FractionOutOfRange,
    /// An `Absolute` dimension that is zero, negative, or not finite.
    #[error("absolute dimension must be positive")]
    NonPositiveAbsolute,
    #[error("insets must be non-negative")]
    NegativeInset,
    #[error("group has no children")]
    EmptyGroup,
    #[error("repeat count is zero")]
    ZeroRepeat,
    /// `repeat` set on a group without exactly one child.
    #[error("repeating group must have exactly one child")]
    RepeatNeedsSingleChild,
    #[error("header height must be positive")]
    NonPositiveHeader,
}

/// Layout computation error.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Viewport width or height is zero, negative, or not finite.
    #[error("viewport must have a finite, positive size")]
    InvalidViewport,
    /// A section's layout tree is malformed.
    #[error("invalid layout in section {section}: {violation}")]
    InvalidSpec {
        /// Position of the section in the input.
        section: usize,
        violation: SpecViolation,
    },
}

/// Resolve every section against the viewport.
///
/// Sections are stacked top to bottom in input order. All sections are
/// validated before any geometry is produced.
pub fn compute_layout<G: Copy>(
    sections: &[Section<G>],
    viewport: Size,
) -> Result<Vec<SectionGeometry<G>>, LayoutError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "compute_layout",
        sections = sections.len(),
        width = viewport.width,
        height = viewport.height
    )
    .entered();

    if !viewport.is_positive() {
        return Err(LayoutError::InvalidViewport);
    }
    for (i, section) in sections.iter().enumerate() {
        section
            .validate()
            .map_err(|violation| LayoutError::InvalidSpec {
                section: i,
                violation,
            })?;
    }

    let mut top = 0.0;
    let mut out = Vec::with_capacity(sections.len());
    for (i, section) in sections.iter().enumerate() {
        let geometry = layout_section(section, top, viewport).map_err(|violation| {
            LayoutError::InvalidSpec {
                section: i,
                violation,
            }
        })?;
        top = geometry.bounds.bottom();
        out.push(geometry);
    }
    Ok(out)
}

fn layout_section<G: Copy>(
    section: &Section<G>,
    top: f64,
    viewport: Size,
) -> Result<SectionGeometry<G>, SpecViolation> {
    let header = section
        .header
        .map(|h| Rect::new(0.0, top, viewport.width, h.height));
    let content_top = header.map_or(top, |h| h.bottom());

    let root = resolve(&section.root, 0.0, content_top, viewport)?;
    let slots = root.slots();
    let capacity = slots.len();
    let truncated = section.item_count.saturating_sub(capacity);

    let items = slots
        .into_iter()
        .take(section.item_count)
        .enumerate()
        .map(|(index, (frame, content))| ItemPlacement {
            group: section.id,
            index,
            frame,
            content,
        })
        .collect();

    let width = header.map_or(root.frame.width, |h| h.width.max(root.frame.width));
    let bounds = Rect::new(0.0, top, width, root.frame.bottom() - top);
    let visible = if section.scroll.is_orthogonal() {
        bounds.clip_width(0.0, viewport.width)
    } else {
        bounds
    };

    #[cfg(feature = "tracing")]
    {
        tracing::trace!(
            top,
            height = bounds.height,
            capacity,
            items = section.item_count,
            "section resolved"
        );
        if truncated > 0 {
            tracing::warn!(
                capacity,
                items = section.item_count,
                truncated,
                "items exceed layout capacity"
            );
        }
    }

    Ok(SectionGeometry {
        id: section.id,
        header,
        bounds,
        visible,
        scroll: section.scroll,
        items,
        capacity,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::approx_eq;

    fn frac(p: f64) -> Dimension {
        Dimension::Fraction(p)
    }

    fn abs(px: f64) -> Dimension {
        Dimension::Absolute(px)
    }

    fn viewport() -> Size {
        Size::new(300.0, 600.0)
    }

    // ── resolution ──────────────────────────────────────────────────────

    #[test]
    fn item_fraction_of_container() {
        let node = LayoutNode::item(LayoutSize::new(frac(0.5), abs(40.0)));
        let r = resolve(&node, 0.0, 0.0, viewport()).unwrap();
        assert_eq!(r.frame, Rect::new(0.0, 0.0, 150.0, 40.0));
    }

    #[test]
    fn insets_shrink_content_not_slot() {
        let node =
            LayoutNode::item(LayoutSize::new(frac(1.0), abs(50.0))).insets(Insets::uniform(1.0));
        let r = resolve(&node, 0.0, 10.0, viewport()).unwrap();
        assert_eq!(r.frame, Rect::new(0.0, 10.0, 300.0, 50.0));
        match r.kind {
            ResolvedKind::Slot { content } => {
                assert_eq!(content, Rect::new(1.0, 11.0, 298.0, 48.0))
            }
            _ => panic!("expected slot"),
        }
    }

    #[test]
    fn horizontal_group_places_children_sequentially() {
        let node = LayoutNode::horizontal(
            LayoutSize::new(frac(1.0), abs(100.0)),
            vec![
                LayoutNode::item(LayoutSize::new(frac(0.25), frac(1.0))),
                LayoutNode::item(LayoutSize::new(frac(0.75), frac(0.5))),
            ],
        );
        let slots = resolve(&node, 0.0, 0.0, viewport()).unwrap().slots();
        assert_eq!(slots[0].0, Rect::new(0.0, 0.0, 75.0, 100.0));
        // Cross axis always fills the group, whatever the child declares.
        assert_eq!(slots[1].0, Rect::new(75.0, 0.0, 225.0, 100.0));
    }

    #[test]
    fn vertical_group_uses_absolute_child_extent() {
        let node = LayoutNode::vertical(
            LayoutSize::new(frac(1.0), abs(100.0)),
            vec![
                LayoutNode::item(LayoutSize::new(frac(1.0), abs(30.0))),
                LayoutNode::item(LayoutSize::new(frac(1.0), abs(70.0))),
            ],
        );
        let slots = resolve(&node, 5.0, 5.0, viewport()).unwrap().slots();
        assert_eq!(slots[0].0, Rect::new(5.0, 5.0, 300.0, 30.0));
        assert_eq!(slots[1].0, Rect::new(5.0, 35.0, 300.0, 70.0));
    }

    #[test]
    fn repeat_translates_one_resolved_child() {
        let node = LayoutNode::repeating(
            Axis::Horizontal,
            LayoutSize::new(abs(400.0), abs(50.0)),
            LayoutNode::item(LayoutSize::new(abs(100.0), frac(1.0))),
            4,
        );
        let slots = resolve(&node, 0.0, 0.0, viewport()).unwrap().slots();
        assert_eq!(slots.len(), 4);
        for (i, (frame, _)) in slots.iter().enumerate() {
            assert_eq!(*frame, Rect::new(100.0 * i as f64, 0.0, 100.0, 50.0));
        }
    }

    #[test]
    fn nested_repeat_builds_two_by_two_block() {
        let pair = LayoutNode::repeating(
            Axis::Horizontal,
            LayoutSize::new(frac(1.0), frac(0.5)),
            LayoutNode::item(LayoutSize::new(frac(0.5), frac(1.0))),
            2,
        );
        let block =
            LayoutNode::repeating(Axis::Vertical, LayoutSize::new(abs(200.0), abs(200.0)), pair, 2);
        let slots = resolve(&block, 0.0, 0.0, viewport()).unwrap().slots();
        let frames: Vec<Rect> = slots.iter().map(|s| s.0).collect();
        assert_eq!(
            frames,
            vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 0.0, 100.0, 100.0),
                Rect::new(0.0, 100.0, 100.0, 100.0),
                Rect::new(100.0, 100.0, 100.0, 100.0),
            ]
        );
    }

    #[test]
    fn children_partition_group_extent() {
        let node = LayoutNode::horizontal(
            LayoutSize::new(frac(1.0), abs(90.0)),
            vec![
                LayoutNode::item(LayoutSize::new(frac(1.0 / 3.0), frac(1.0))),
                LayoutNode::item(LayoutSize::new(frac(1.0 / 3.0), frac(1.0))),
                LayoutNode::item(LayoutSize::new(frac(1.0 / 3.0), frac(1.0))),
            ],
        );
        let r = resolve(&node, 0.0, 0.0, Size::new(100.0, 100.0)).unwrap();
        let ResolvedKind::Group { children, .. } = &r.kind else {
            panic!("expected group");
        };
        let sum: f64 = children.iter().map(|c| c.frame.width).sum();
        assert!(approx_eq(sum, r.frame.width));
        assert!(approx_eq(children[2].frame.right(), 100.0));
    }

    #[test]
    fn capacity_counts_expanded_slots() {
        let pair = LayoutNode::repeating(
            Axis::Horizontal,
            LayoutSize::fill(),
            LayoutNode::item(LayoutSize::fill()),
            2,
        );
        let node = LayoutNode::vertical(
            LayoutSize::fill(),
            vec![pair.clone(), LayoutNode::item(LayoutSize::fill()), pair],
        );
        assert_eq!(node.capacity(), 5);
    }

    // ── validation ──────────────────────────────────────────────────────

    #[test]
    fn rejects_zero_repeat() {
        let node = LayoutNode::repeating(
            Axis::Horizontal,
            LayoutSize::fill(),
            LayoutNode::item(LayoutSize::fill()),
            0,
        );
        assert_eq!(node.validate(), Err(SpecViolation::ZeroRepeat));
    }

    #[test]
    fn rejects_repeat_with_many_children() {
        let node = LayoutNode::Group {
            axis: Axis::Vertical,
            size: LayoutSize::fill(),
            children: vec![
                LayoutNode::item(LayoutSize::fill()),
                LayoutNode::item(LayoutSize::fill()),
            ],
            repeat: Some(2),
        };
        assert_eq!(node.validate(), Err(SpecViolation::RepeatNeedsSingleChild));
    }

    #[test]
    fn rejects_bad_dimensions() {
        let zero = LayoutNode::item(LayoutSize::new(frac(0.0), frac(1.0)));
        assert_eq!(zero.validate(), Err(SpecViolation::FractionOutOfRange));
        let over = LayoutNode::item(LayoutSize::new(frac(1.5), frac(1.0)));
        assert_eq!(over.validate(), Err(SpecViolation::FractionOutOfRange));
        let neg = LayoutNode::item(LayoutSize::new(frac(1.0), abs(-3.0)));
        assert_eq!(neg.validate(), Err(SpecViolation::NonPositiveAbsolute));
        let nan = LayoutNode::item(LayoutSize::new(abs(f64::NAN), frac(1.0)));
        assert_eq!(nan.validate(), Err(SpecViolation::NonPositiveAbsolute));
    }

    #[test]
    fn rejects_empty_group_and_negative_insets() {
        let empty = LayoutNode::vertical(LayoutSize::fill(), vec![]);
        assert_eq!(empty.validate(), Err(SpecViolation::EmptyGroup));
        let inset = LayoutNode::item(LayoutSize::fill()).insets(Insets::new(0.0, -1.0, 0.0, 0.0));
        assert_eq!(inset.validate(), Err(SpecViolation::NegativeInset));
    }

    #[test]
    fn invalid_section_fails_whole_layout() {
        let good = Section::new(0u8, LayoutNode::item(LayoutSize::new(frac(1.0), abs(10.0))));
        let bad = Section::new(1u8, LayoutNode::vertical(LayoutSize::fill(), vec![]));
        let err = compute_layout(&[good, bad], viewport()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidSpec {
                section: 1,
                violation: SpecViolation::EmptyGroup
            }
        );
    }

    #[test]
    fn rejects_bad_viewport_and_header() {
        let s = Section::new(0u8, LayoutNode::item(LayoutSize::fill()));
        assert_eq!(
            compute_layout(&[s.clone()], Size::new(0.0, 100.0)),
            Err(LayoutError::InvalidViewport)
        );
        let err = compute_layout(&[s.with_header(0.0)], viewport()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidSpec {
                violation: SpecViolation::NonPositiveHeader,
                ..
            }
        ));
    }

    // ── sections ────────────────────────────────────────────────────────

    fn strip(count: usize) -> Section<u8> {
        let root = LayoutNode::repeating(
            Axis::Horizontal,
            LayoutSize::new(abs(100.0 * count as f64), abs(150.0)),
            LayoutNode::item(LayoutSize::new(abs(100.0), frac(1.0))),
            count,
        );
        Section::new(0u8, root)
            .with_header(80.0)
            .scroll(ScrollBehavior::Continuous)
            .item_count(count)
    }

    #[test]
    fn header_reserved_above_content() {
        let g = compute_layout(&[strip(3)], viewport()).unwrap();
        assert_eq!(g[0].header, Some(Rect::new(0.0, 0.0, 300.0, 80.0)));
        assert_eq!(g[0].items[0].frame.y, 80.0);
        assert_eq!(g[0].bounds.height, 230.0);
    }

    #[test]
    fn sections_stack_vertically() {
        let row = LayoutNode::item(LayoutSize::new(frac(1.0), abs(40.0)));
        let second = Section::new(1u8, row).item_count(1);
        let g = compute_layout(&[strip(2), second], viewport()).unwrap();
        assert_eq!(g[1].bounds.y, 230.0);
        assert_eq!(g[1].items[0].frame, Rect::new(0.0, 230.0, 300.0, 40.0));
        assert_eq!(content_height(&g), 270.0);
    }

    #[test]
    fn orthogonal_section_is_clipped_to_viewport() {
        let g = compute_layout(&[strip(10)], viewport()).unwrap();
        let s = &g[0];
        assert_eq!(s.bounds.width, 1000.0);
        assert_eq!(s.visible.width, 300.0);
        // Items beyond the fold keep their positions.
        assert_eq!(s.items[9].frame.x, 900.0);
        assert_eq!(s.visible_items(0.0).count(), 3);
        let shifted: Vec<usize> = s.visible_items(450.0).map(|p| p.index).collect();
        assert_eq!(shifted, vec![4, 5, 6, 7]);
    }

    #[test]
    fn snap_offsets() {
        let g = compute_layout(&[strip(10)], viewport()).unwrap();
        let mut s = g[0].clone();
        assert_eq!(s.snap_offset(-20.0), 0.0);
        assert_eq!(s.snap_offset(2000.0), 700.0);
        assert_eq!(s.snap_offset(123.0), 123.0);
        s.scroll = ScrollBehavior::Paged;
        assert_eq!(s.snap_offset(140.0), 0.0);
        assert_eq!(s.snap_offset(160.0), 300.0);
        assert_eq!(s.snap_offset(680.0), 600.0);
        s.scroll = ScrollBehavior::None;
        assert_eq!(s.snap_offset(160.0), 0.0);
    }

    #[test]
    fn excess_items_truncated() {
        let mut s = strip(3);
        s.item_count = 5;
        let g = compute_layout(&[s], viewport()).unwrap();
        assert_eq!(g[0].capacity, 3);
        assert_eq!(g[0].items.len(), 3);
        assert_eq!(g[0].truncated, 2);
    }

    #[test]
    fn unused_slots_not_emitted() {
        let mut s = strip(5);
        s.item_count = 2;
        let g = compute_layout(&[s], viewport()).unwrap();
        assert_eq!(g[0].items.len(), 2);
        assert_eq!(g[0].capacity, 5);
        assert_eq!(g[0].truncated, 0);
        assert!(g[0].item(2).is_none());
    }

    #[test]
    fn hit_test_finds_slot() {
        let g = compute_layout(&[strip(3)], viewport()).unwrap();
        assert_eq!(hit_test(&g, 150.0, 100.0), Some((0u8, 1)));
        assert_eq!(hit_test(&g, 150.0, 40.0), None); // header
        assert_eq!(hit_test(&g, 150.0, 1000.0), None);
    }

    #[test]
    fn layout_is_deterministic() {
        let sections = [strip(7)];
        let a = compute_layout(&sections, viewport()).unwrap();
        let b = compute_layout(&sections, viewport()).unwrap();
        assert_eq!(a, b);
    }
}
