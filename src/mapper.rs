//! Zoom state and data-to-world coordinate mapping.

use crate::geom::{Range, Rect, ScreenSize};

/// Extra data-space padding reserved for labels, per side.
///
/// Left and bottom components are at most zero (they extend the world
/// rectangle below the plot origin), right and top at least zero. The margin
/// persists across redraws and only changes when label layout changes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    /// Extension past the left edge (<= 0).
    pub left: f64,
    /// Extension past the bottom edge (<= 0).
    pub bottom: f64,
    /// Extension past the right edge (>= 0).
    pub right: f64,
    /// Extension past the top edge (>= 0).
    pub top: f64,
}

/// Maintains the zoom rectangle, margin insets, and scale factor, and
/// derives the world rectangle handed to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapper {
    plot_area: Rect,
    min_size: (f64, f64),
    zoom_area: Rect,
    margin: Margin,
    scale: f64,
}

impl Mapper {
    /// Create a mapper over the given plot area with per-axis minimum zoom
    /// sizes.
    pub fn new(plot_area: Rect, min_width: f64, min_height: f64) -> Self {
        Self {
            plot_area,
            min_size: (min_width, min_height),
            zoom_area: plot_area,
            margin: Margin::default(),
            scale: 1.0,
        }
    }

    /// The fixed full-extent plot area.
    pub fn plot_area(&self) -> Rect {
        self.plot_area
    }

    /// The currently visible sub-rectangle of the plot area.
    pub fn zoom_area(&self) -> Rect {
        self.zoom_area
    }

    /// The current margin insets.
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// The current scale factor (zoom size over plot-area size).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn set_margin(&mut self, margin: Margin) {
        self.margin = margin;
    }

    /// Zoom in or out around a per-axis anchor.
    ///
    /// `level: None` resets the zoom rectangle to the full plot area and the
    /// scale to one. Otherwise each axis size becomes `size / level`,
    /// clamped to the axis minimum and the plot-area size, anchored by
    /// `direction` (-1 keeps the low edge, +1 the high edge, 0 centers).
    /// The scale is the minimum of both axes' size ratios, so margin
    /// padding is never under-reserved on the tighter axis.
    pub fn zoom(&mut self, level: Option<f64>, direction: (f64, f64)) {
        match level {
            None => {
                self.zoom_area = self.plot_area;
                self.scale = 1.0;
            }
            Some(level) => {
                let (x, x_ratio) = zoom_axis(
                    self.zoom_area.x,
                    self.plot_area.x,
                    self.min_size.0,
                    level,
                    direction.0,
                );
                let (y, y_ratio) = zoom_axis(
                    self.zoom_area.y,
                    self.plot_area.y,
                    self.min_size.1,
                    level,
                    direction.1,
                );
                self.zoom_area = Rect::new(x, y);
                self.scale = x_ratio.min(y_ratio);
            }
        }
    }

    /// The world rectangle: the zoom rectangle expanded by the margin
    /// scaled into current zoom units.
    pub fn world_rect(&self) -> Rect {
        Rect::new(
            Range::new(
                self.zoom_area.x.min + self.margin.left * self.scale,
                self.zoom_area.x.max + self.margin.right * self.scale,
            ),
            Range::new(
                self.zoom_area.y.min + self.margin.bottom * self.scale,
                self.zoom_area.y.max + self.margin.top * self.scale,
            ),
        )
    }

    /// Pixels per data unit on each axis for the given window size.
    ///
    /// Derived from the zoom rectangle alone, without the margin insets, so
    /// pixel-to-data conversions do not feed back into the margins they are
    /// used to compute: identical label sets then always produce identical
    /// margins.
    pub fn screen_scale(&self, window: ScreenSize) -> (f64, f64) {
        (
            window.width as f64 / self.zoom_area.x.span(),
            window.height as f64 / self.zoom_area.y.span(),
        )
    }
}

impl Default for Mapper {
    /// Mapper over the gamma plot area `[0, 1023] x [0, 1023]` with
    /// minimum zoom sizes of 2 (x) and 8 (y).
    fn default() -> Self {
        Self::new(Rect::from_corners(0.0, 0.0, 1023.0, 1023.0), 2.0, 8.0)
    }
}

fn zoom_axis(
    current: Range,
    bounds: Range,
    min_size: f64,
    level: f64,
    direction: f64,
) -> (Range, f64) {
    let anchor = direction / 2.0 + 0.5;
    let max_size = bounds.span();
    let size = current.span();
    let mut new_size = size / level;
    if !new_size.is_finite() {
        new_size = max_size;
    }
    let new_size = new_size.clamp(min_size, max_size);
    let mut low = bounds.min.max(current.min + (size - new_size) * anchor);
    let mut high = low + new_size;
    if high > bounds.max {
        high = bounds.max;
        low = high - new_size;
    }
    (Range::new(low, high), new_size / max_size)
}
