//! Geometric primitives used by the plotting pipeline.
//!
//! All `f64` coordinates are in data space; the only pixel-space type is
//! [`ScreenSize`], the window extent reported by the canvas backend.

/// Axis selector for per-axis computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal data axis.
    X,
    /// Vertical data axis.
    Y,
}

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether a value lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Axis-aligned rectangle in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Extent along the X axis.
    pub x: Range,
    /// Extent along the Y axis.
    pub y: Range,
}

impl Rect {
    /// Create a rectangle from per-axis ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Create a rectangle from corner coordinates.
    pub fn from_corners(x_low: f64, y_low: f64, x_high: f64, y_high: f64) -> Self {
        Self {
            x: Range::new(x_low, x_high),
            y: Range::new(y_low, y_high),
        }
    }

    /// Extent along the given axis.
    pub fn axis(&self, axis: Axis) -> Range {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Check whether a point lies inside the rectangle (inclusive).
    pub fn contains(&self, point: Point) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }
}

/// Window size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenSize {
    /// Create a new screen size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
