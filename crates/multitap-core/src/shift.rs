//! Shift/modifier policy: latched modifiers, shift modes and
//! autocapitalization.

use crate::tables::SubstitutionTable;
use crate::types::{KeyToken, Modifier, Modifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftMode {
    #[default]
    Lower,
    Upper,
    Capslock,
    CtrlLatch,
    AltLatch,
}

impl ShiftMode {
    pub fn next(self) -> Self {
        match self {
            ShiftMode::Lower => ShiftMode::Upper,
            ShiftMode::Upper => ShiftMode::Capslock,
            ShiftMode::Capslock => ShiftMode::CtrlLatch,
            ShiftMode::CtrlLatch => ShiftMode::AltLatch,
            ShiftMode::AltLatch => ShiftMode::Lower,
        }
    }

    /// Spoken name of the mode.
    pub fn label(self) -> &'static str {
        match self {
            ShiftMode::Lower => "lower case",
            ShiftMode::Upper => "upper case",
            ShiftMode::Capslock => "capslock",
            ShiftMode::CtrlLatch => "control on",
            ShiftMode::AltLatch => "alt on",
        }
    }
}

/// The combo a key commit resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub modifiers: Modifiers,
    pub token: KeyToken,
    /// Shift was applied by Upper/Capslock/autocapitalization; the feedback
    /// cue for these is distinct from the normal key-press cue.
    pub capitalized: bool,
}

/// Output-side modifier state. Persists across commits; only the dedicated
/// shift-mode trigger and `ToggleModifier` commits change it.
#[derive(Debug, Clone, Default)]
pub struct ShiftState {
    mode: ShiftMode,
    latched: Modifiers,
    autocapitalize_next: bool,
}

impl ShiftState {
    pub fn new(mode: ShiftMode) -> Self {
        Self {
            mode,
            latched: Modifiers::none(),
            autocapitalize_next: false,
        }
    }

    pub fn mode(&self) -> ShiftMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ShiftMode) {
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> ShiftMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn autocapitalize_pending(&self) -> bool {
        self.autocapitalize_next
    }

    /// Toggles `m` in the latched set, returning the new membership.
    pub fn toggle_modifier(&mut self, m: Modifier) -> bool {
        self.latched.toggle(m)
    }

    /// Resolves the outgoing combo for one key commit and updates the
    /// trailing-output state (autocapitalization flag).
    ///
    /// `autocap_chars` is the configured sentence-ending punctuation set.
    pub fn compose(
        &mut self,
        token: &KeyToken,
        substitutions: &SubstitutionTable,
        autocap_chars: &str,
    ) -> Composed {
        let capitalize_next = self.autocapitalize_next;

        // Sentence-ending punctuation arms the flag, a letter clears it,
        // anything else (space, digits, navigation keys) leaves it alone.
        // Updated before the substitution lookup so a substituted glyph in
        // the punctuation set still arms it.
        match token.as_char() {
            Some(c) if autocap_chars.contains(c) => self.autocapitalize_next = true,
            Some(c) if c.is_ascii_alphabetic() => self.autocapitalize_next = false,
            _ => {}
        }

        // A substitution hit replaces the whole combo.
        if let Some(base) = substitutions.get(token.as_str()) {
            let mut modifiers = Modifiers::none();
            modifiers.insert(Modifier::Shift);
            return Composed {
                modifiers,
                token: base.clone(),
                capitalized: false,
            };
        }

        let mut modifiers = self.latched;
        let mut capitalized = false;
        match self.mode {
            ShiftMode::Upper | ShiftMode::Capslock => {
                modifiers.insert(Modifier::Shift);
                capitalized = true;
            }
            ShiftMode::CtrlLatch => modifiers.insert(Modifier::Ctrl),
            ShiftMode::AltLatch => modifiers.insert(Modifier::Alt),
            ShiftMode::Lower => {}
        }
        if capitalize_next && token.is_alphabetic() {
            modifiers.insert(Modifier::Shift);
            capitalized = true;
        }

        Composed {
            modifiers,
            token: token.clone(),
            capitalized,
        }
    }
}
