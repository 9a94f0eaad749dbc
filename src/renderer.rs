//! Renderer loop and the producer-facing plot handle.
//!
//! The renderer is the single consumer of the command channel and the only
//! owner of render state (zoom, margins, gridlines, curve history). It runs
//! a cooperative polling loop: the only suspension points are the timer
//! sleeps and the blocking wait for the first command.

use std::thread;
use std::time::Duration;

use log::debug;

use crate::canvas::{Canvas, CanvasError, TextMeasurer};
use crate::channel::{self, ChannelClosed, CommandReceiver, CommandSender};
use crate::command::{Command, Curve, GridLine, PlotOptions};
use crate::curve;
use crate::geom::ScreenSize;
use crate::layout;
use crate::mapper::Mapper;

const FIRST_COMMAND_WAIT: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Batch size used when replaying history, large enough to avoid
/// intermediate flushes.
const REPLAY_DRAW_SPEED: usize = 1024;

/// Renderer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// Blocked on the first command; no window opened yet.
    WaitingForFirstCommand,
    /// Executing commands on the open canvas.
    Running,
    /// Shut down; all sends fail with [`ChannelClosed`].
    Closed,
}

/// Cloneable producer handle that enqueues renderer commands.
///
/// Every method blocks while the single-slot queue is occupied, pacing
/// producers to the renderer.
#[derive(Debug, Clone)]
pub struct PlotHandle {
    sender: CommandSender,
}

impl PlotHandle {
    /// Clear the plot and draw the given gridlines.
    pub fn clear(&self, lines: Vec<GridLine>) -> Result<(), ChannelClosed> {
        self.sender.send(Command::Clear(lines))
    }

    /// Zoom in or out; `level: None` resets to the full plot area.
    pub fn zoom(&self, level: Option<f64>, direction: (f64, f64)) -> Result<(), ChannelClosed> {
        self.sender.send(Command::Zoom { level, direction })
    }

    /// Plot one or more curves.
    pub fn plot(&self, curves: Vec<Curve>, options: PlotOptions) -> Result<(), ChannelClosed> {
        self.sender.send(Command::Plot { curves, options })
    }

    /// Ask the renderer to shut down.
    ///
    /// Closing an already-closed plot is a no-op.
    pub fn close(&self) {
        let _ = self.sender.send(Command::Close);
    }

    /// Enqueue a raw command.
    pub fn send(&self, command: Command) -> Result<(), ChannelClosed> {
        self.sender.send(command)
    }

    /// Check whether the renderer has shut down.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Single-threaded consumer that executes commands against a canvas.
#[derive(Debug)]
pub struct Renderer<C> {
    canvas: C,
    receiver: CommandReceiver,
    mapper: Mapper,
    lines: Vec<GridLine>,
    history: Vec<(Vec<Curve>, PlotOptions)>,
    window: Option<ScreenSize>,
    state: RendererState,
    opened: bool,
    poll_interval: Duration,
}

impl<C> Renderer<C>
where
    C: Canvas + TextMeasurer,
{
    /// Create a renderer over the given canvas together with its producer
    /// handle.
    pub fn new(canvas: C) -> (Self, PlotHandle) {
        let (sender, receiver) = channel::channel();
        let renderer = Self {
            canvas,
            receiver,
            mapper: Mapper::default(),
            lines: Vec::new(),
            history: Vec::new(),
            window: None,
            state: RendererState::WaitingForFirstCommand,
            opened: false,
            poll_interval: POLL_INTERVAL,
        };
        (renderer, PlotHandle { sender })
    }

    /// Override the poll tick; the resize backoff stays at twice the tick.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Access the canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Consume the renderer and return its canvas.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Access the coordinate mapper.
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Process commands until the plot is closed.
    ///
    /// Returns `Ok(())` on a clean shutdown, including an external window
    /// termination; other canvas errors propagate. On the way out the
    /// channel is marked closed so pending sends fail fast, and the window
    /// is closed if one was opened.
    pub fn run(&mut self) -> Result<(), CanvasError> {
        if self.state == RendererState::Closed {
            return Ok(());
        }
        let result = self.run_inner();
        self.receiver.mark_closed();
        self.state = RendererState::Closed;
        if self.opened {
            let _ = self.canvas.close();
        }
        debug!("renderer closed");
        match result {
            Err(CanvasError::Terminated) => Ok(()),
            other => other,
        }
    }

    fn run_inner(&mut self) -> Result<(), CanvasError> {
        let first = loop {
            if let Some(command) = self.receiver.recv_timeout(FIRST_COMMAND_WAIT) {
                break command;
            }
        };
        if first.is_close() {
            return Ok(());
        }
        self.opened = true;
        self.state = RendererState::Running;
        debug!("renderer running");
        self.apply_zoom(None, (0.0, 0.0))?;
        self.apply_clear(Vec::new())?;
        self.execute(first)?;

        let mut tick = self.poll_interval;
        loop {
            thread::sleep(tick);
            tick = self.poll_interval;
            loop {
                let window = self.canvas.window_size()?;
                if self.window != Some(window) {
                    self.redraw()?;
                    // Poll more slowly while the window is being resized.
                    tick = self.poll_interval * 2;
                    break;
                }
                match self.receiver.try_recv() {
                    Some(Command::Close) => return Ok(()),
                    Some(command) => self.execute(command)?,
                    None => break,
                }
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), CanvasError> {
        match command {
            Command::Clear(lines) => self.apply_clear(lines),
            Command::Zoom { level, direction } => self.apply_zoom(level, direction),
            Command::Plot { curves, options } => self.apply_plot(curves, options),
            Command::Close => Ok(()),
        }
    }

    fn apply_world(&mut self) -> Result<(), CanvasError> {
        self.window = Some(self.canvas.window_size()?);
        self.canvas.set_world(self.mapper.world_rect())
    }

    fn apply_zoom(&mut self, level: Option<f64>, direction: (f64, f64)) -> Result<(), CanvasError> {
        self.mapper.zoom(level, direction);
        self.apply_world()
    }

    /// Clear the canvas, lay out the new gridlines, replay the retained
    /// curves onto the new grid, then reset the history.
    fn apply_clear(&mut self, lines: Vec<GridLine>) -> Result<(), CanvasError> {
        self.canvas.clear()?;
        self.lines = lines;
        layout::draw_grid(&mut self.canvas, &mut self.mapper, &self.lines)?;
        self.replay_history()?;
        self.history.clear();
        Ok(())
    }

    fn apply_plot(&mut self, curves: Vec<Curve>, options: PlotOptions) -> Result<(), CanvasError> {
        curve::draw_curves(&mut self.canvas, &options, &curves)?;
        self.history.push((curves, options));
        Ok(())
    }

    fn replay_history(&mut self) -> Result<(), CanvasError> {
        for (curves, options) in &self.history {
            let options = options.clone().with_draw_speed(REPLAY_DRAW_SPEED);
            curve::draw_curves(&mut self.canvas, &options, curves)?;
        }
        Ok(())
    }

    /// Full redraw after a window resize: grid plus history replay against
    /// the current transform.
    fn redraw(&mut self) -> Result<(), CanvasError> {
        self.canvas.clear()?;
        self.apply_world()?;
        layout::draw_grid(&mut self.canvas, &mut self.mapper, &self.lines)?;
        self.replay_history()
    }
}
