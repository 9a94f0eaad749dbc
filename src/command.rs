//! The command set accepted by the renderer.
//!
//! Producers never touch render state directly; every mutation travels the
//! channel as one of these tagged variants and is executed exactly once by
//! the consumer.

use crate::canvas::Color;
use crate::geom::Axis;

/// One curve: y-samples indexed by x position.
pub type Curve = Vec<f64>;

/// A horizontal or vertical reference line, optionally labeled.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    /// Position on the line's own axis (X for vertical lines, Y for
    /// horizontal ones).
    pub pos: f64,
    /// Whether the line runs horizontally.
    pub horizontal: bool,
    /// Optional label text; may contain newlines.
    pub label: Option<String>,
    /// Line color.
    pub color: Color,
    /// Label and tick color.
    pub label_color: Color,
    /// Collision priority; when two labels overlap the higher value keeps
    /// its label.
    pub priority: i32,
}

impl GridLine {
    /// Create an unlabeled vertical line at the given X position.
    pub fn vertical(pos: f64) -> Self {
        Self {
            pos,
            horizontal: false,
            label: None,
            color: Color::GRID,
            label_color: Color::LABEL,
            priority: 0,
        }
    }

    /// Create an unlabeled horizontal line at the given Y position.
    pub fn horizontal(pos: f64) -> Self {
        Self {
            horizontal: true,
            ..Self::vertical(pos)
        }
    }

    /// Set the label text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the line color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the label and tick color.
    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    /// Set the collision priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The axis the line's `pos` is measured on.
    pub fn axis(&self) -> Axis {
        if self.horizontal { Axis::Y } else { Axis::X }
    }
}

/// Options for a plot command.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Curve colors. Applied per index when the count matches the curve
    /// count, shared when a single color is given, otherwise ignored.
    pub colors: Vec<Color>,
    /// Number of points batched between intermediate flushes.
    pub draw_speed: usize,
    /// Multiplier applied to the implicit x index of each sample.
    pub scale_x: f64,
}

impl PlotOptions {
    /// Replace the curve colors.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    /// Set the flush batch size.
    pub fn with_draw_speed(mut self, draw_speed: usize) -> Self {
        self.draw_speed = draw_speed;
        self
    }

    /// Set the x-index multiplier.
    pub fn with_scale_x(mut self, scale_x: f64) -> Self {
        self.scale_x = scale_x;
        self
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            colors: vec![Color::RED, Color::GREEN, Color::BLUE],
            draw_speed: 16,
            scale_x: 1.0,
        }
    }
}

/// A deferred operation executed by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Clear the canvas and draw the given gridlines.
    Clear(Vec<GridLine>),
    /// Zoom in or out; `level: None` resets to the full plot area.
    Zoom {
        /// Zoom factor applied to the current zoom rectangle size.
        level: Option<f64>,
        /// Per-axis anchor bias in `[-1, 1]`; -1 anchors the low edge,
        /// +1 the high edge, 0 centers.
        direction: (f64, f64),
    },
    /// Plot one or more curves.
    Plot {
        /// Curves to draw, each a sequence of y-samples.
        curves: Vec<Curve>,
        /// Drawing options.
        options: PlotOptions,
    },
    /// Shut the renderer down.
    Close,
}

impl Command {
    /// Check whether this is the close command.
    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }
}
