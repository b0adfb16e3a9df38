use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a physical trigger key.
///
/// Assigned by the hotkey source at registration time. The constants below
/// are the VK-style codes of the numeric keypad, so persisted bindings keep
/// meaning the same physical key across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u16);

pub const NUMPAD_0: TriggerId = TriggerId(0x60);
pub const NUMPAD_1: TriggerId = TriggerId(0x61);
pub const NUMPAD_2: TriggerId = TriggerId(0x62);
pub const NUMPAD_3: TriggerId = TriggerId(0x63);
pub const NUMPAD_4: TriggerId = TriggerId(0x64);
pub const NUMPAD_5: TriggerId = TriggerId(0x65);
pub const NUMPAD_6: TriggerId = TriggerId(0x66);
pub const NUMPAD_7: TriggerId = TriggerId(0x67);
pub const NUMPAD_8: TriggerId = TriggerId(0x68);
pub const NUMPAD_9: TriggerId = TriggerId(0x69);
pub const MULTIPLY: TriggerId = TriggerId(0x6A);
pub const ADD: TriggerId = TriggerId(0x6B);
pub const SUBTRACT: TriggerId = TriggerId(0x6D);
pub const DECIMAL: TriggerId = TriggerId(0x6E);
pub const DIVIDE: TriggerId = TriggerId(0x6F);

pub const NUMPAD_DIGITS: [TriggerId; 10] = [
    NUMPAD_0, NUMPAD_1, NUMPAD_2, NUMPAD_3, NUMPAD_4, NUMPAD_5, NUMPAD_6, NUMPAD_7, NUMPAD_8,
    NUMPAD_9,
];

/// Abstract key name understood by the key sender ("a", "enter",
/// "down_arrow", "spacebar", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(pub String);

impl KeyToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a single alphabetic character. Drives autocapitalization.
    pub fn is_alphabetic(&self) -> bool {
        let mut chars = self.0.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.is_ascii_alphabetic()
        )
    }

    /// The single character this token names, if it names one.
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl From<&str> for KeyToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<char> for KeyToken {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Auxiliary key state merged into the next key output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
}

impl Modifier {
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
        }
    }
}

/// Modifier keys applied to a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const fn none() -> Self {
        Self {
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub const fn is_empty(self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }

    pub const fn contains(self, m: Modifier) -> bool {
        match m {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
        }
    }

    pub fn insert(&mut self, m: Modifier) {
        match m {
            Modifier::Shift => self.shift = true,
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
        }
    }

    /// Flips membership of `m`, returning the new state.
    pub fn toggle(&mut self, m: Modifier) -> bool {
        let flag = match m {
            Modifier::Shift => &mut self.shift,
            Modifier::Ctrl => &mut self.ctrl,
            Modifier::Alt => &mut self.alt,
        };
        *flag = !*flag;
        *flag
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        Ok(())
    }
}

/// One possible output bound to a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Press-hold-release an abstract key, composed with active modifiers.
    Key { token: KeyToken },
    /// Inject literal text verbatim, bypassing modifier composition.
    Text { text: String },
    /// Toggle a modifier in the latched set. Produces no output itself.
    ToggleModifier { modifier: Modifier },
    /// Commit whatever was last selected, without adding new output.
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Human-readable name, announced via speech when selected.
    pub name: String,
    pub action: Action,
}

impl Candidate {
    pub fn key(name: impl Into<String>, token: impl Into<KeyToken>) -> Self {
        Self {
            name: name.into(),
            action: Action::Key {
                token: token.into(),
            },
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: Action::Text { text: text.into() },
        }
    }

    pub fn toggle(modifier: Modifier) -> Self {
        Self {
            name: modifier.name().to_string(),
            action: Action::ToggleModifier { modifier },
        }
    }

    pub fn finish() -> Self {
        Self {
            name: "finish".to_string(),
            action: Action::Finish,
        }
    }
}

/// Ordered cycling sequence for one trigger. Insertion order is significant
/// and never implicitly re-sorted; an empty list means "unbound".
pub type CandidateList = Vec<Candidate>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_alphabetic() {
        assert!(KeyToken::from("a").is_alphabetic());
        assert!(KeyToken::from("Z").is_alphabetic());
        assert!(!KeyToken::from(".").is_alphabetic());
        assert!(!KeyToken::from("enter").is_alphabetic());
        assert!(!KeyToken::from("").is_alphabetic());
    }

    #[test]
    fn modifiers_toggle() {
        let mut mods = Modifiers::none();
        assert!(mods.toggle(Modifier::Ctrl));
        assert!(mods.contains(Modifier::Ctrl));
        assert!(!mods.toggle(Modifier::Ctrl));
        assert!(mods.is_empty());
    }

    #[test]
    fn modifiers_display_order() {
        let mut mods = Modifiers::none();
        mods.insert(Modifier::Shift);
        mods.insert(Modifier::Ctrl);
        assert_eq!(mods.to_string(), "ctrl+shift+");
    }

    #[test]
    fn action_serde_tagged() {
        let c = Candidate::key("a", "a");
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"kind\":\"key\""));
        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
