mod builder;
mod state;

use std::error::Error;
use std::fmt;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::frame::Frame;
use crate::model::{Message, TransportEvent};
pub use builder::TranscriptViewBuilder;
use state::Command;

/// A mounted transcript view.
///
/// The view runs as its own task and owns all view-local state: the copy
/// of the transcript, progress timers of pending calls, and row selections.
/// Everything reaches it as a command through this handle and is handled
/// one at a time, in the order it was sent.
///
/// Dropping the handle, or calling [`TranscriptView::unmount`], tears the
/// view down and cancels every timer it armed.
pub struct TranscriptView {
    cmd_tx: mpsc::UnboundedSender<Command>,
    kill_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TranscriptView {
    /// Applies an event from the chat transport.
    #[inline]
    pub fn deliver(&self, event: TransportEvent) -> Result<(), ViewClosedError> {
        self.send(Command::Transport(event))
    }

    /// Delivers a new or updated message.
    #[inline]
    pub fn upsert(&self, message: Message) -> Result<(), ViewClosedError> {
        self.deliver(TransportEvent::Upsert(message))
    }

    /// Sets whether the transport is waiting for the assistant.
    #[inline]
    pub fn set_loading(&self, loading: bool) -> Result<(), ViewClosedError> {
        self.deliver(TransportEvent::Loading(loading))
    }

    /// Clears the transcript.
    #[inline]
    pub fn clear(&self) -> Result<(), ViewClosedError> {
        self.deliver(TransportEvent::Clear)
    }

    /// Toggles the histogram of course row `row` in the result of
    /// `tool_call_id`.
    #[inline]
    pub fn toggle_course<S: Into<String>>(
        &self,
        tool_call_id: S,
        row: usize,
    ) -> Result<(), ViewClosedError> {
        self.send(Command::ToggleCourse {
            tool_call_id: tool_call_id.into(),
            row,
        })
    }

    /// Renders the current state, after every command sent before this one
    /// has been handled.
    pub async fn frame(&self) -> Result<Frame, ViewClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| ViewClosedError)
    }

    /// Tears the view down and waits until it has stopped.
    ///
    /// No render callback runs after this returns.
    pub async fn unmount(mut self) {
        self.kill_tx.send(true).ok();
        if let Some(task) = self.task.take() {
            task.await.ok();
        }
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), ViewClosedError> {
        self.cmd_tx.send(cmd).map_err(|_| ViewClosedError)
    }
}

impl Drop for TranscriptView {
    #[inline]
    fn drop(&mut self) {
        self.kill_tx.send(true).ok();
    }
}

/// Returned when talking to a view that has stopped.
pub struct ViewClosedError;

impl fmt::Debug for ViewClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewClosedError").finish()
    }
}

impl fmt::Display for ViewClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the transcript view has been unmounted".fmt(f)
    }
}

impl Error for ViewClosedError {}
