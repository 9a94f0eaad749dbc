//! Bounded command channel between producers and the renderer.
//!
//! Capacity is one: a producer that outpaces the renderer blocks on its next
//! send instead of buffering, which is the backpressure mechanism of the
//! whole pipeline. Sends wait in bounded slices so a stalled consumer stays
//! observable in the log and so the closed flag is rechecked between
//! attempts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::warn;

use crate::command::Command;

const SEND_WAIT: Duration = Duration::from_secs(1);
const RETRY_LOG_EVERY: u32 = 10;

/// Error returned when a command is sent after the renderer shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

impl std::fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "command channel closed")
    }
}

impl std::error::Error for ChannelClosed {}

/// Create a connected sender/receiver pair with a single command of
/// capacity.
pub fn channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let closed = Arc::new(AtomicBool::new(false));
    (
        CommandSender {
            tx,
            closed: Arc::clone(&closed),
        },
        CommandReceiver { rx, closed },
    )
}

/// Producer side of the command channel.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
    closed: Arc<AtomicBool>,
}

impl CommandSender {
    /// Send a command, blocking until the renderer makes room.
    ///
    /// Fails with [`ChannelClosed`] once the renderer has shut down; a send
    /// already blocked at that point observes the flag on its next retry.
    pub fn send(&self, command: Command) -> Result<(), ChannelClosed> {
        let mut command = command;
        let mut retries: u32 = 0;
        loop {
            if self.closed.load(Ordering::Relaxed) {
                return Err(ChannelClosed);
            }
            match self.tx.send_timeout(command, SEND_WAIT) {
                Ok(()) => return Ok(()),
                Err(crossbeam_channel::SendTimeoutError::Timeout(returned)) => {
                    command = returned;
                    retries += 1;
                    if retries % RETRY_LOG_EVERY == 0 {
                        warn!("command queue full, still waiting after {retries} attempts");
                    }
                }
                Err(crossbeam_channel::SendTimeoutError::Disconnected(_)) => {
                    return Err(ChannelClosed);
                }
            }
        }
    }

    /// Check whether the renderer has shut down.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

/// Consumer side of the command channel.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: Receiver<Command>,
    closed: Arc<AtomicBool>,
}

impl CommandReceiver {
    /// Wait up to `timeout` for the next command.
    ///
    /// Returns `None` on timeout. A fully disconnected channel (every
    /// sender dropped without an explicit close) reads as a close request.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Command> {
        match self.rx.recv_timeout(timeout) {
            Ok(command) => Some(command),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => None,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => Some(Command::Close),
        }
    }

    /// Take the next command without blocking.
    pub fn try_recv(&self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Command::Close),
        }
    }

    /// Mark the channel closed so pending and future sends fail fast.
    ///
    /// Idempotent; called by the renderer on its way out.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}
