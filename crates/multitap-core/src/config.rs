//! Settings and line-of-business persistence: one JSON state file holding
//! settings, user modes, the active mode and shift mode, and the
//! special-character table. Unknown keys are ignored on load, missing keys
//! default.

use crate::modes::{Mode, ModeTable};
use crate::shift::ShiftMode;
use crate::tables::{self, SubstitutionTable};
use crate::types::{self, CandidateList, TriggerId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed state file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Triggers reserved for commands instead of candidate cycling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlTriggers {
    pub mode_switch: Option<TriggerId>,
    pub shift_switch: Option<TriggerId>,
    pub commit_now: Option<TriggerId>,
    pub erase: Option<TriggerId>,
}

impl Default for ControlTriggers {
    fn default() -> Self {
        Self {
            mode_switch: Some(types::DIVIDE),
            shift_switch: Some(types::DECIMAL),
            commit_now: Some(types::MULTIPLY),
            erase: Some(types::ADD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inactivity window before the pending candidate commits.
    pub timeout_ms: u64,
    /// Punctuation that arms autocapitalization for the next letter.
    pub autocapitalize_after: String,
    /// Pressing a different trigger while selecting commits the pending
    /// candidate first; `false` drops it instead.
    pub commit_on_trigger_switch: bool,
    /// Start in the standard mode rather than the persisted one.
    pub reset_mode_on_start: bool,
    pub controls: ControlTriggers,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_ms: 500,
            autocapitalize_after: "./".to_string(),
            commit_on_trigger_switch: true,
            reset_mode_on_start: true,
            controls: ControlTriggers::default(),
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A user mode as persisted: ordered (trigger, candidate list) pairs so
/// cycling order survives the round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedMode {
    pub name: String,
    pub bindings: Vec<(TriggerId, CandidateList)>,
}

impl SavedMode {
    fn from_mode(mode: &Mode) -> Self {
        let mut bindings: Vec<(TriggerId, CandidateList)> = mode
            .bindings
            .iter()
            .map(|(trigger, list)| (*trigger, list.clone()))
            .collect();
        bindings.sort_by_key(|(trigger, _)| trigger.0);
        Self {
            name: mode.name.clone(),
            bindings,
        }
    }

    fn into_mode(self) -> Mode {
        Mode::user(self.name, self.bindings.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedState {
    pub settings: Settings,
    pub shift_mode: ShiftMode,
    pub active_mode: String,
    pub user_modes: Vec<SavedMode>,
    pub special_keys: SubstitutionTable,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            shift_mode: ShiftMode::Lower,
            active_mode: crate::modes::MODE_MULTI_TAP.to_string(),
            user_modes: Vec::new(),
            special_keys: tables::default_substitutions(),
        }
    }
}

impl SavedState {
    /// Rebuilds the mode table: system modes plus the persisted user modes,
    /// with the persisted active mode restored unless the reset flag is set
    /// or the name no longer exists.
    pub fn build_mode_table(&self) -> ModeTable {
        let mut table = ModeTable::with_system_modes();
        for saved in &self.user_modes {
            if let Err(e) = table.add(saved.clone().into_mode()) {
                warn!("skipping persisted mode: {e}");
            }
        }
        if !self.settings.reset_mode_on_start && table.set_active(&self.active_mode).is_err() {
            warn!("persisted active mode {:?} no longer exists", self.active_mode);
        }
        table
    }

    pub fn capture(
        settings: &Settings,
        shift_mode: ShiftMode,
        modes: &ModeTable,
        special_keys: &SubstitutionTable,
    ) -> Self {
        Self {
            settings: settings.clone(),
            shift_mode,
            active_mode: modes.active_name().to_string(),
            user_modes: modes.user_modes().map(SavedMode::from_mode).collect(),
            special_keys: special_keys.clone(),
        }
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<SavedState, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Loads the state file, falling back to defaults on any failure. The
/// failure is surfaced once as a warning and is never fatal.
pub fn load_or_default(path: impl AsRef<Path>) -> SavedState {
    let path = path.as_ref();
    if !path.exists() {
        return SavedState::default();
    }
    match load(path) {
        Ok(state) => state,
        Err(e) => {
            warn!("{}: {e}; continuing with defaults", path.display());
            SavedState::default()
        }
    }
}

pub fn save(path: impl AsRef<Path>, state: &SavedState) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(state)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::MODE_MULTI_TAP;
    use crate::types::{Candidate, NUMPAD_2, NUMPAD_5};

    fn state_with_user_mode() -> SavedState {
        let mut table = ModeTable::with_system_modes();
        let mut bindings = std::collections::HashMap::new();
        bindings.insert(
            NUMPAD_2,
            vec![
                Candidate::key("x", "x"),
                Candidate::key("y", "y"),
                Candidate::key("z", "z"),
            ],
        );
        bindings.insert(NUMPAD_5, vec![Candidate::text("sig", "-- nm")]);
        table.add(Mode::user("Custom", bindings)).unwrap();
        table.set_active("Custom").unwrap();
        let mut settings = Settings::default();
        settings.reset_mode_on_start = false;
        SavedState::capture(
            &settings,
            ShiftMode::Capslock,
            &table,
            &tables::default_substitutions(),
        )
    }

    #[test]
    fn round_trip_preserves_order_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = state_with_user_mode();
        save(&path, &state).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, state);

        let table = loaded.build_mode_table();
        assert_eq!(table.active_name(), "Custom");
        let names: Vec<&str> = table
            .get("Custom")
            .unwrap()
            .candidates(NUMPAD_2)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn reset_mode_on_start_ignores_persisted_active() {
        let mut state = state_with_user_mode();
        state.settings.reset_mode_on_start = true;
        let table = state.build_mode_table();
        assert_eq!(table.active_name(), MODE_MULTI_TAP);
    }

    #[test]
    fn unknown_keys_ignored_and_missing_keys_default() {
        let json = r#"{
            "settings": {"timeout_ms": 250, "window_flavor": "mint"},
            "future_section": [1, 2, 3]
        }"#;
        let state: SavedState = serde_json::from_str(json).unwrap();
        assert_eq!(state.settings.timeout_ms, 250);
        assert_eq!(state.settings.autocapitalize_after, "./");
        assert_eq!(state.shift_mode, ShiftMode::Lower);
        assert_eq!(state.active_mode, MODE_MULTI_TAP);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let state = load_or_default(&path);
        assert_eq!(state, SavedState::default());
    }

    #[test]
    fn missing_file_is_defaults_without_warning() {
        let state = load_or_default("/nonexistent/multitap/state.json");
        assert_eq!(state, SavedState::default());
    }
}
