//! Canvas and font-metric capabilities consumed by the renderer.
//!
//! Rendering backends implement [`Canvas`] and [`TextMeasurer`]. The crate
//! ships [`RecordingCanvas`], a headless backend that records every drawing
//! operation; it backs the test suite and offline rendering.

use crate::geom::{Point, Rect, ScreenSize};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque gray of the given level.
    pub const fn gray(level: f32) -> Self {
        Self::new(level, level, level, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque red, the default first-curve color.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green, the default second-curve color.
    pub const GREEN: Self = Self::new(0.0, 0.5, 0.0, 1.0);
    /// Opaque blue, the default third-curve color.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Light gray used for gridlines.
    pub const GRID: Self = Self::gray(0.90);
    /// Mid gray used for the plot-area border.
    pub const BORDER: Self = Self::gray(0.75);
    /// Dark gray used for gridline labels and ticks.
    pub const LABEL: Self = Self::gray(0.35);
}

/// Horizontal alignment of a text block relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor at the horizontal center of the text.
    Center,
    /// Anchor at the right edge of the text.
    Right,
}

/// Errors raised by canvas backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The window was terminated externally (user closed it, toolkit shut
    /// down). Treated as a graceful shutdown request by the renderer.
    Terminated,
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminated => write!(f, "canvas terminated"),
            Self::Backend(message) => write!(f, "canvas backend error: {message}"),
        }
    }
}

impl std::error::Error for CanvasError {}

/// Measured extent of a single line of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Rendered width of the line.
    pub width: f32,
    /// Height of one text line.
    pub line_height: f32,
}

/// Font-metrics capability.
pub trait TextMeasurer {
    /// Measure a single line of text in the backend's label font.
    fn measure(&self, text: &str) -> TextMetrics;

    /// Measure a multi-line text block: maximum line width and summed
    /// line heights, in pixels.
    fn measure_block(&self, text: &str) -> (f32, f32) {
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for line in text.split('\n') {
            let metrics = self.measure(line);
            width = width.max(metrics.width);
            height += metrics.line_height;
        }
        (width, height)
    }
}

/// Drawing capability consumed by the renderer.
///
/// Positions handed to the canvas are world coordinates as configured by the
/// last [`set_world`](Canvas::set_world) call. A text block written through
/// [`write_text`](Canvas::write_text) sits with its bottom edge at the anchor
/// Y and is aligned horizontally per [`TextAlign`].
pub trait Canvas {
    /// Set the world-coordinate rectangle mapped onto the window.
    fn set_world(&mut self, world: Rect) -> Result<(), CanvasError>;

    /// Erase all drawn content.
    fn clear(&mut self) -> Result<(), CanvasError>;

    /// Draw a straight line segment.
    fn draw_segment(&mut self, from: Point, to: Point, color: Color) -> Result<(), CanvasError>;

    /// Write a text block at the given anchor.
    fn write_text(
        &mut self,
        position: Point,
        text: &str,
        align: TextAlign,
        color: Color,
    ) -> Result<(), CanvasError>;

    /// Show or hide the drawing cursor glyph.
    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), CanvasError>;

    /// Current window size in pixels.
    fn window_size(&self) -> Result<ScreenSize, CanvasError>;

    /// Flush batched drawing operations to the screen.
    fn flush(&mut self) -> Result<(), CanvasError>;

    /// Close the window.
    fn close(&mut self) -> Result<(), CanvasError>;
}

/// A recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    /// World-coordinate rectangle update.
    SetWorld(Rect),
    /// Canvas erase.
    Clear,
    /// Line segment.
    Segment {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Stroke color.
        color: Color,
    },
    /// Text block.
    Text {
        /// Anchor position.
        position: Point,
        /// Text content.
        text: String,
        /// Horizontal alignment.
        align: TextAlign,
        /// Text color.
        color: Color,
    },
    /// Cursor glyph visibility change.
    Cursor(bool),
    /// Batched-update flush.
    Flush,
    /// Window close.
    Close,
}

/// Headless canvas that records operations instead of drawing.
///
/// Text metrics are synthetic: a fixed advance per character and a fixed
/// line height, so label sizes are deterministic in tests.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    window: ScreenSize,
    char_width: f32,
    line_height: f32,
    ops: Vec<CanvasOp>,
    terminated: bool,
}

impl RecordingCanvas {
    /// Create a recording canvas with a 640x640 window.
    pub fn new() -> Self {
        Self::with_window_size(ScreenSize::new(640, 640))
    }

    /// Create a recording canvas with the given window size.
    pub fn with_window_size(window: ScreenSize) -> Self {
        Self {
            window,
            char_width: 6.0,
            line_height: 12.0,
            ops: Vec::new(),
            terminated: false,
        }
    }

    /// Access all recorded operations in order.
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Change the reported window size, simulating a resize.
    pub fn set_window_size(&mut self, window: ScreenSize) {
        self.window = window;
    }

    /// Simulate an external window termination: every subsequent canvas
    /// call fails with [`CanvasError::Terminated`].
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    fn record(&mut self, op: CanvasOp) -> Result<(), CanvasError> {
        if self.terminated {
            return Err(CanvasError::Terminated);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn set_world(&mut self, world: Rect) -> Result<(), CanvasError> {
        self.record(CanvasOp::SetWorld(world))
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        self.record(CanvasOp::Clear)
    }

    fn draw_segment(&mut self, from: Point, to: Point, color: Color) -> Result<(), CanvasError> {
        self.record(CanvasOp::Segment { from, to, color })
    }

    fn write_text(
        &mut self,
        position: Point,
        text: &str,
        align: TextAlign,
        color: Color,
    ) -> Result<(), CanvasError> {
        self.record(CanvasOp::Text {
            position,
            text: text.to_string(),
            align,
            color,
        })
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), CanvasError> {
        self.record(CanvasOp::Cursor(visible))
    }

    fn window_size(&self) -> Result<ScreenSize, CanvasError> {
        if self.terminated {
            return Err(CanvasError::Terminated);
        }
        Ok(self.window)
    }

    fn flush(&mut self) -> Result<(), CanvasError> {
        self.record(CanvasOp::Flush)
    }

    fn close(&mut self) -> Result<(), CanvasError> {
        self.record(CanvasOp::Close)
    }
}

impl TextMeasurer for RecordingCanvas {
    fn measure(&self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * self.char_width,
            line_height: self.line_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_block_takes_max_width_and_sums_heights() {
        let canvas = RecordingCanvas::new();
        let (width, height) = canvas.measure_block("ab\nlonger\nc");
        assert_eq!(width, 6.0 * 6.0);
        assert_eq!(height, 12.0 * 3.0);
    }

    #[test]
    fn terminated_canvas_rejects_operations() {
        let mut canvas = RecordingCanvas::new();
        canvas.clear().expect("live canvas accepts ops");
        canvas.terminate();
        assert_eq!(canvas.clear(), Err(CanvasError::Terminated));
        assert_eq!(canvas.window_size(), Err(CanvasError::Terminated));
        assert_eq!(canvas.ops().len(), 1);
    }
}
