//! The trigger disambiguation and commit engine.
//!
//! Consumes "trigger pressed" events, cycles the pending candidate on
//! repeated presses of the same trigger, and commits on inactivity timeout,
//! trigger switch, mode switch, or shutdown. All mutation happens on the
//! dispatch thread; scheduler fires arrive as generation-tagged events and
//! stale generations are ignored.

use crate::config::{SavedState, Settings};
use crate::modes::{self, Direction, ModeTable};
use crate::scheduler::{CommitScheduler, Generation};
use crate::sender::{Cue, Feedback, KeySender, SendError};
use crate::shift::{ShiftMode, ShiftState};
use crate::tables::SubstitutionTable;
use crate::types::{Action, Candidate, KeyToken, Modifiers, TriggerId};
use tracing::{debug, warn};

/// Transient selection state. `trigger` is `Some` iff `pending` is `Some`.
#[derive(Debug, Default)]
struct Selection {
    trigger: Option<TriggerId>,
    cycle_index: usize,
    pending: Option<Candidate>,
}

impl Selection {
    fn clear(&mut self) {
        *self = Selection::default();
    }
}

pub struct Engine<S, F> {
    modes: ModeTable,
    shift: ShiftState,
    substitutions: SubstitutionTable,
    settings: Settings,
    scheduler: CommitScheduler,
    selection: Selection,
    armed: Option<Generation>,
    sender: S,
    feedback: F,
}

impl<S: KeySender, F: Feedback> Engine<S, F> {
    pub fn new(scheduler: CommitScheduler, sender: S, feedback: F) -> Self {
        Self::with_state(SavedState::default(), scheduler, sender, feedback)
    }

    pub fn with_state(state: SavedState, scheduler: CommitScheduler, sender: S, feedback: F) -> Self {
        Self {
            modes: state.build_mode_table(),
            shift: ShiftState::new(state.shift_mode),
            substitutions: state.special_keys,
            settings: state.settings,
            scheduler,
            selection: Selection::default(),
            armed: None,
            sender,
            feedback,
        }
    }

    /// Persistable view of the current configuration.
    pub fn snapshot(&self) -> SavedState {
        SavedState::capture(
            &self.settings,
            self.shift.mode(),
            &self.modes,
            &self.substitutions,
        )
    }

    pub fn mode_table(&self) -> &ModeTable {
        &self.modes
    }

    pub fn mode_table_mut(&mut self) -> &mut ModeTable {
        &mut self.modes
    }

    pub fn shift_mode(&self) -> ShiftMode {
        self.shift.mode()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn pending_candidate(&self) -> Option<&Candidate> {
        self.selection.pending.as_ref()
    }

    /// Generation the next scheduler fire must carry to be acted on.
    pub fn armed_generation(&self) -> Option<Generation> {
        self.armed
    }

    /// One physical press of a trigger key.
    pub fn on_trigger(&mut self, trigger: TriggerId) {
        let controls = &self.settings.controls;
        if controls.mode_switch == Some(trigger) {
            self.switch_mode(Direction::Forward);
            return;
        }
        if controls.shift_switch == Some(trigger) {
            self.cycle_shift_mode();
            return;
        }
        if controls.commit_now == Some(trigger) {
            self.commit_pending_now();
            return;
        }
        if controls.erase == Some(trigger) && self.modes.active_name() == modes::MODE_MULTI_TAP {
            self.commit_pending_now();
            self.feedback.play(Cue::KeyPress);
            self.press(Modifiers::none(), &KeyToken::from("backspace"));
            return;
        }

        // Switching triggers ends the previous episode first.
        if let Some(active) = self.selection.trigger {
            if active != trigger {
                if self.settings.commit_on_trigger_switch {
                    self.commit_pending_now();
                } else {
                    self.abandon_selection();
                }
            }
        }

        let Some(list) = self.modes.active().candidates(trigger) else {
            debug!(trigger = trigger.0, "unbound trigger");
            self.feedback.play(Cue::Error);
            return;
        };
        let list = list.clone();

        // Advance on a repeat press; clamp to 0 if the list shrank under us.
        let index = match self.selection.trigger {
            Some(active) if active == trigger => {
                let next = self.selection.cycle_index + 1;
                if next >= list.len() {
                    0
                } else {
                    next
                }
            }
            _ => 0,
        };
        let candidate = list[index].clone();
        self.selection.trigger = Some(trigger);
        self.selection.cycle_index = index;
        self.selection.pending = Some(candidate.clone());
        self.feedback.speak(&candidate.name);

        if list.len() == 1 {
            // Pass-through binding: nothing to disambiguate, commit now.
            self.commit_pending_now();
        } else {
            self.armed = Some(self.scheduler.arm(self.settings.timeout()));
        }
    }

    /// Scheduler fire, marshaled back through the dispatch channel. Fires
    /// whose generation no longer matches the current arm are stale (the
    /// selection was already committed or superseded) and ignored.
    pub fn on_commit_due(&mut self, generation: Generation) {
        if self.armed != Some(generation) {
            debug!(generation, "stale commit fire ignored");
            return;
        }
        self.commit_pending_now();
    }

    /// Commits the pending candidate immediately. No-op when idle.
    pub fn commit_pending_now(&mut self) {
        if let Some(candidate) = self.selection.pending.take() {
            self.commit(candidate);
        }
    }

    /// Cyclic mode switch. Forces a commit of any pending candidate first.
    pub fn switch_mode(&mut self, direction: Direction) {
        self.commit_pending_now();
        let name = self.modes.switch(direction).name.clone();
        debug!(mode = %name, "mode switched");
        self.feedback.speak(&name);
    }

    /// Cyclic shift-mode switch. A pending selection stays alive and will
    /// commit under the new shift mode; the inactivity window restarts.
    pub fn cycle_shift_mode(&mut self) {
        let mode = self.shift.cycle_mode();
        debug!(mode = mode.label(), "shift mode switched");
        self.feedback.speak(mode.label());
        if self.selection.trigger.is_some() {
            self.armed = Some(self.scheduler.arm(self.settings.timeout()));
        }
    }

    /// Shutdown or window close: treated as an implicit trigger switch so a
    /// pending selection is not silently dropped.
    pub fn flush(&mut self) {
        self.commit_pending_now();
    }

    fn abandon_selection(&mut self) {
        self.selection.clear();
        self.scheduler.cancel();
        self.armed = None;
    }

    fn commit(&mut self, candidate: Candidate) {
        self.selection.clear();
        self.scheduler.cancel();
        self.armed = None;
        debug!(name = %candidate.name, "commit");
        match candidate.action {
            Action::Finish => {}
            Action::Key { token } => {
                let composed = self.shift.compose(
                    &token,
                    &self.substitutions,
                    &self.settings.autocapitalize_after,
                );
                self.feedback.play(if composed.capitalized {
                    Cue::Capslock
                } else {
                    Cue::KeyPress
                });
                self.press(composed.modifiers, &composed.token);
            }
            Action::Text { text } => {
                self.feedback.play(Cue::KeyPress);
                if let Err(e) = self.sender.inject_text(&text) {
                    warn!("text injection failed: {e}");
                }
            }
            Action::ToggleModifier { modifier } => {
                let on = self.shift.toggle_modifier(modifier);
                self.feedback.play(Cue::KeyPress);
                self.feedback
                    .speak(if on { "on" } else { "off" });
            }
        }
    }

    // A rejected token is reported and otherwise treated as a completed
    // commit, so the engine never gets stuck on an unmappable key.
    fn press(&mut self, modifiers: Modifiers, token: &KeyToken) {
        if let Err(SendError::UnknownToken(name)) = self.sender.press_combo(modifiers, token) {
            warn!(token = %name, "key sender rejected token");
            self.feedback.speak(&format!("unknown key {name}"));
        }
    }
}
