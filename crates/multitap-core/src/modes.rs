//! Named, switchable sets of per-trigger candidate lists.

use crate::tables;
use crate::types::{CandidateList, TriggerId};
use std::collections::HashMap;
use thiserror::Error;

pub const MODE_MULTI_TAP: &str = "SMS Typing";
pub const MODE_NUMBER_ENTRY: &str = "Number Entry";
pub const MODE_TEXT_EDITING: &str = "Text Editing";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("no such mode: {0}")]
    NotFound(String),
    #[error("cannot remove system mode: {0}")]
    SystemMode(String),
    #[error("mode already exists: {0}")]
    Duplicate(String),
}

#[derive(Debug, Clone)]
pub struct Mode {
    pub name: String,
    /// System modes are fixed at startup and never removable.
    pub system: bool,
    pub bindings: HashMap<TriggerId, CandidateList>,
}

impl Mode {
    pub fn user(name: impl Into<String>, bindings: HashMap<TriggerId, CandidateList>) -> Self {
        Self {
            name: name.into(),
            system: false,
            bindings,
        }
    }

    fn system(name: &str, bindings: HashMap<TriggerId, CandidateList>) -> Self {
        Self {
            name: name.to_string(),
            system: true,
            bindings,
        }
    }

    /// The candidate list for `trigger`, treating an empty list as unbound.
    pub fn candidates(&self, trigger: TriggerId) -> Option<&CandidateList> {
        self.bindings.get(&trigger).filter(|list| !list.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// All known modes, in switching order, with exactly one active.
#[derive(Debug, Clone)]
pub struct ModeTable {
    modes: Vec<Mode>,
    active: usize,
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::with_system_modes()
    }
}

impl ModeTable {
    /// A table holding only the three fixed system modes, with the standard
    /// multi-tap mode active.
    pub fn with_system_modes() -> Self {
        Self {
            modes: vec![
                Mode::system(MODE_MULTI_TAP, tables::multi_tap_bindings()),
                Mode::system(MODE_NUMBER_ENTRY, tables::number_entry_bindings()),
                Mode::system(MODE_TEXT_EDITING, tables::text_editing_bindings()),
            ],
            active: 0,
        }
    }

    pub fn active(&self) -> &Mode {
        &self.modes[self.active]
    }

    pub fn active_name(&self) -> &str {
        &self.modes[self.active].name
    }

    pub fn get(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), ModeError> {
        match self.modes.iter().position(|m| m.name == name) {
            Some(index) => {
                self.active = index;
                Ok(())
            }
            None => Err(ModeError::NotFound(name.to_string())),
        }
    }

    /// Cyclic next/previous mode selection. Returns the newly active mode.
    pub fn switch(&mut self, direction: Direction) -> &Mode {
        let len = self.modes.len();
        self.active = match direction {
            Direction::Forward => (self.active + 1) % len,
            Direction::Backward => (self.active + len - 1) % len,
        };
        &self.modes[self.active]
    }

    pub fn add(&mut self, mode: Mode) -> Result<(), ModeError> {
        if self.get(&mode.name).is_some() {
            return Err(ModeError::Duplicate(mode.name));
        }
        self.modes.push(mode);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), ModeError> {
        let index = self
            .modes
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| ModeError::NotFound(name.to_string()))?;
        if self.modes[index].system {
            return Err(ModeError::SystemMode(name.to_string()));
        }
        self.modes.remove(index);
        if self.active >= self.modes.len() || self.active == index {
            self.active = 0;
        } else if self.active > index {
            self.active -= 1;
        }
        Ok(())
    }

    pub fn user_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(|m| !m.system)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(|m| m.name.as_str())
    }
}
