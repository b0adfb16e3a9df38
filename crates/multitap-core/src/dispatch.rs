//! Single-threaded event dispatch.
//!
//! Hotkey sources, hosts and the commit timer all funnel into one channel;
//! the dispatch loop is the only code that touches the engine, so no engine
//! state is ever shared across threads.

use crate::engine::Engine;
use crate::modes::Direction;
use crate::scheduler::Generation;
use crate::sender::{Feedback, KeySender};
use crate::types::TriggerId;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A trigger key was pressed.
    Trigger(TriggerId),
    /// The commit timer expired for the given arm generation.
    CommitDue(Generation),
    /// Host-initiated mode switch (menu, UI button).
    SwitchMode(Direction),
    /// Host-initiated shift-mode switch.
    CycleShift,
    /// Commit anything pending and stop the loop.
    Shutdown,
}

pub fn channel() -> (Sender<DispatchEvent>, Receiver<DispatchEvent>) {
    unbounded()
}

pub struct Dispatcher<S, F> {
    engine: Engine<S, F>,
    events: Receiver<DispatchEvent>,
}

impl<S: KeySender, F: Feedback> Dispatcher<S, F> {
    pub fn new(engine: Engine<S, F>, events: Receiver<DispatchEvent>) -> Self {
        Self { engine, events }
    }

    /// Runs until `Shutdown` or until every sender is dropped, then flushes
    /// and hands the engine back so the host can snapshot it.
    pub fn run(mut self) -> Engine<S, F> {
        for event in self.events.iter() {
            debug!(?event, "dispatch");
            match event {
                DispatchEvent::Trigger(trigger) => self.engine.on_trigger(trigger),
                DispatchEvent::CommitDue(generation) => self.engine.on_commit_due(generation),
                DispatchEvent::SwitchMode(direction) => self.engine.switch_mode(direction),
                DispatchEvent::CycleShift => self.engine.cycle_shift_mode(),
                DispatchEvent::Shutdown => break,
            }
        }
        self.engine.flush();
        self.engine
    }
}
