//! gammaplot renders gamma curves on an interactive, zoomable 2D canvas.
//! Producers enqueue commands on a bounded channel; a single renderer loop
//! consumes them, laying out axis labels around the current zoom.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod channel;
pub mod command;
mod curve;
pub mod geom;
mod layout;
pub mod mapper;
pub mod renderer;

pub use canvas::{
    Canvas, CanvasError, CanvasOp, Color, RecordingCanvas, TextAlign, TextMeasurer, TextMetrics,
};
pub use channel::{ChannelClosed, CommandReceiver, CommandSender};
pub use command::{Command, Curve, GridLine, PlotOptions};
pub use geom::{Axis, Point, Range, Rect, ScreenSize};
pub use mapper::{Mapper, Margin};
pub use renderer::{PlotHandle, Renderer, RendererState};
