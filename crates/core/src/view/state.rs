use std::collections::HashMap;

use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use tokio::sync::{oneshot, watch};

use crate::config::ViewConfig;
use crate::frame::Frame;
use crate::model::{Message, TransportEvent};
use crate::progress::{ProgressTimers, StagedProgress};
use crate::render::{CourseSelection, Registry, RenderContext};
use crate::transcript::{ToolTransition, Transcript};

#[derive(Debug)]
pub(crate) enum Command {
    Transport(TransportEvent),
    ToggleCourse {
        tool_call_id: String,
        row: usize,
    },
    StepElapsed {
        tool_call_id: String,
        generation: u64,
        step: usize,
    },
    Snapshot(oneshot::Sender<Frame>),
}

struct PendingCall {
    generation: u64,
    progress: StagedProgress,
    _timers: ProgressTimers,
}

pub(crate) struct ViewState {
    transcript: Transcript,
    registry: Registry,
    config: ViewConfig,
    loading: bool,
    pending: HashMap<String, PendingCall>,
    selections: HashMap<String, CourseSelection>,
    next_generation: u64,
    on_render: Option<Box<dyn Fn(&Frame) + Send + Sync>>,
    cmd_tx: WeakUnboundedSender<Command>,
}

impl ViewState {
    pub(crate) fn new(
        config: ViewConfig,
        registry: Registry,
        on_render: Option<Box<dyn Fn(&Frame) + Send + Sync>>,
        cmd_tx: WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            transcript: Transcript::default(),
            registry,
            config,
            loading: false,
            pending: HashMap::new(),
            selections: HashMap::new(),
            next_generation: 0,
            on_render,
            cmd_tx,
        }
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Transport(TransportEvent::Upsert(message)) => self.upsert(message),
            Command::Transport(TransportEvent::Loading(loading)) => {
                if self.loading != loading {
                    self.loading = loading;
                    self.render();
                }
            }
            Command::Transport(TransportEvent::Clear) => self.clear(),
            Command::ToggleCourse { tool_call_id, row } => {
                self.toggle_course(tool_call_id, row)
            }
            Command::StepElapsed {
                tool_call_id,
                generation,
                step,
            } => self.step_elapsed(&tool_call_id, generation, step),
            Command::Snapshot(tx) => {
                tx.send(self.frame()).ok();
            }
        }
    }

    fn upsert(&mut self, message: Message) {
        for transition in self.transcript.apply(message) {
            match transition {
                ToolTransition::Pending { tool_call_id } => self.arm(tool_call_id),
                ToolTransition::Settled { tool_call_id } => {
                    if self.pending.remove(&tool_call_id).is_some() {
                        debug!("{tool_call_id} settled, timers cancelled");
                    }
                }
            }
        }
        self.render();
    }

    fn arm(&mut self, tool_call_id: String) {
        if self.pending.contains_key(&tool_call_id) {
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let schedule = self.config.schedule();
        let cmd_tx = self.cmd_tx.clone();
        let id = tool_call_id.clone();
        let timers = ProgressTimers::arm(schedule, move |step| {
            // The view is gone if the mailbox cannot be upgraded.
            let Some(cmd_tx) = cmd_tx.upgrade() else {
                return;
            };
            cmd_tx
                .send(Command::StepElapsed {
                    tool_call_id: id.clone(),
                    generation,
                    step,
                })
                .ok();
        });

        debug!("{tool_call_id} pending, armed {} timers", schedule.len());
        self.pending.insert(
            tool_call_id,
            PendingCall {
                generation,
                progress: StagedProgress::new(schedule.len()),
                _timers: timers,
            },
        );
    }

    fn step_elapsed(&mut self, tool_call_id: &str, generation: u64, step: usize) {
        let Some(call) = self.pending.get_mut(tool_call_id) else {
            trace!("dropping late step {step} of {tool_call_id}");
            return;
        };
        if call.generation != generation {
            trace!("dropping stale step {step} of {tool_call_id}");
            return;
        }
        if call.progress.mark(step) {
            self.render();
        }
    }

    fn toggle_course(&mut self, tool_call_id: String, row: usize) {
        let resolved = self
            .transcript
            .invocation(&tool_call_id)
            .is_some_and(|inv| inv.result().is_some());
        if !resolved {
            warn!("cannot toggle row {row} of {tool_call_id}: no result");
            return;
        }

        let selection = self.selections.entry(tool_call_id).or_default();
        selection.toggle(row);
        if selection.selected().is_none() {
            self.selections.retain(|_, sel| sel.selected().is_some());
        }
        self.render();
    }

    fn clear(&mut self) {
        self.transcript.clear();
        self.pending.clear();
        self.selections.clear();
        self.render();
    }

    fn frame(&self) -> Frame {
        Frame::build(
            &self.transcript,
            &self.registry,
            &self.config,
            self.loading,
            |tool_call_id| RenderContext {
                selection: self
                    .selections
                    .get(tool_call_id)
                    .copied()
                    .unwrap_or_default(),
                progress: self.pending.get(tool_call_id).map(|call| &call.progress),
            },
        )
    }

    fn render(&self) {
        if let Some(on_render) = &self.on_render {
            on_render(&self.frame());
        }
    }
}

pub(crate) async fn run_view(
    mut state: ViewState,
    mut cmd_rx: UnboundedReceiver<Command>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("mounted");
    loop {
        let cmd = tokio::select! {
            biased;
            _ = kill_rx.changed() => break,
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                cmd
            }
        };
        trace!("handling {cmd:?}");
        state.handle(cmd);
    }
    debug!("unmounted");
}
