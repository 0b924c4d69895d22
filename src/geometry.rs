//! Plane geometry shared by the layout engine: sizes, rectangles, insets, axes.
//!
//! Coordinates are `f64` points with the origin at the top-left corner of the
//! scrollable content and y growing downward. Fractional layouts (thirds,
//! halves) are kept exact to the precision of `f64`; nothing is rounded to
//! whole pixels here.
//!
//! Equality and hashing compare bit patterns, so two geometries are equal
//! exactly when a renderer would receive byte-identical values.

#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::Float;

/// Layout direction of a group, and scroll direction of a section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Width × height in points.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    pub const fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a size from a main-axis and a cross-axis extent.
    pub const fn from_axes(axis: Axis, main: f64, cross: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// Both extents finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        self.width.to_bits() == other.width.to_bits()
            && self.height.to_bits() == other.height.to_bits()
    }
}

impl Eq for Size {}

impl core::hash::Hash for Size {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.height.to_bits().hash(state);
    }
}

/// Edge insets (CSS-like, but leading/trailing instead of left/right).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Same inset on every edge.
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            leading: v,
            bottom: v,
            trailing: v,
        }
    }

    /// Create insets from individual edges.
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// All edges finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.top, self.leading, self.bottom, self.trailing]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl PartialEq for Insets {
    fn eq(&self, other: &Self) -> bool {
        self.top.to_bits() == other.top.to_bits()
            && self.leading.to_bits() == other.leading.to_bits()
            && self.bottom.to_bits() == other.bottom.to_bits()
            && self.trailing.to_bits() == other.trailing.to_bits()
    }
}

impl Eq for Insets {}

/// Axis-aligned rectangle in content coordinates.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect at `(x, y)` with the given size.
    pub const fn from_origin_size(x: f64, y: f64, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Leading coordinate along `axis`.
    pub const fn origin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent along `axis`.
    pub const fn extent(&self, axis: Axis) -> f64 {
        self.size().extent(axis)
    }

    /// Same size, moved by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Same size, moved by `delta` along `axis`.
    pub fn translate_along(self, axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::Horizontal => self.translate(delta, 0.0),
            Axis::Vertical => self.translate(0.0, delta),
        }
    }

    /// Shrink by `insets` on all four edges. Width and height are clamped to 0
    /// when the insets exceed the rect; the origin stays inside the rect.
    pub fn inset(self, insets: &Insets) -> Self {
        let width = (self.width - insets.leading - insets.trailing).max(0.0);
        let height = (self.height - insets.top - insets.bottom).max(0.0);
        Self {
            x: self.x + insets.leading.min(self.width),
            y: self.y + insets.top.min(self.height),
            width,
            height,
        }
    }

    /// Whether the point lies inside. Leading edges are inclusive, trailing
    /// edges exclusive, so adjacent slots never both claim a point.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two rects share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether this rect lies entirely within `outer`, up to `tolerance`.
    pub fn within(&self, outer: &Rect, tolerance: f64) -> bool {
        self.x >= outer.x - tolerance
            && self.y >= outer.y - tolerance
            && self.right() <= outer.right() + tolerance
            && self.bottom() <= outer.bottom() + tolerance
    }

    /// Clip to the horizontal band `[x, x + width)`, keeping vertical extent.
    pub fn clip_width(self, x: f64, width: f64) -> Self {
        let left = self.x.max(x);
        let right = self.right().min(x + width);
        Self {
            x: left,
            width: (right - left).max(0.0),
            ..self
        }
    }
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.width.to_bits() == other.width.to_bits()
            && self.height.to_bits() == other.height.to_bits()
    }
}

impl Eq for Rect {}

impl core::hash::Hash for Rect {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.width.to_bits().hash(state);
        self.height.to_bits().hash(state);
    }
}

/// Approximate equality for geometry assertions.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
