//! Built-in candidate tables and the special-character substitution table.

use crate::types::{self, Candidate, CandidateList, KeyToken, TriggerId};
use std::collections::HashMap;

/// Glyph name -> unshifted base key. A hit fully replaces the outgoing
/// combo with shift + base key.
pub type SubstitutionTable = HashMap<String, KeyToken>;

/// Shifted glyphs of a US layout that the key sender cannot produce from a
/// bare token.
const SHIFTED_GLYPHS: &[(&str, &str)] = &[
    ("!", "1"),
    ("@", "2"),
    ("#", "3"),
    ("$", "4"),
    ("%", "5"),
    ("^", "6"),
    ("&", "7"),
    ("*", "8"),
    ("(", "9"),
    (")", "0"),
    ("_", "-"),
    ("+", "="),
    ("?", "/"),
    (":", ";"),
    ("\"", "'"),
    ("<", ","),
    (">", "."),
    ("~", "`"),
    ("{", "["),
    ("}", "]"),
    ("|", "\\"),
];

lazy_static::lazy_static! {
    static ref DEFAULT_SUBSTITUTIONS: SubstitutionTable = SHIFTED_GLYPHS
        .iter()
        .map(|(glyph, base)| (glyph.to_string(), KeyToken::from(*base)))
        .collect();
}

pub fn default_substitutions() -> SubstitutionTable {
    DEFAULT_SUBSTITUTIONS.clone()
}

/// Per-keypad-key character groups of the standard multi-tap layout.
const MULTI_TAP_GROUPS: &[(TriggerId, &str)] = &[
    (types::NUMPAD_1, ".,'/;-=\\`"),
    (types::NUMPAD_2, "abc"),
    (types::NUMPAD_3, "def"),
    (types::NUMPAD_4, "ghi"),
    (types::NUMPAD_5, "jkl"),
    (types::NUMPAD_6, "mno"),
    (types::NUMPAD_7, "pqrs"),
    (types::NUMPAD_8, "tuv"),
    (types::NUMPAD_9, "wxyz"),
    (types::NUMPAD_0, " 1234567890"),
];

fn char_candidate(c: char) -> Candidate {
    // A space cannot be sent as a bare token.
    if c == ' ' {
        Candidate::key("space", "spacebar")
    } else {
        Candidate::key(c.to_string(), c)
    }
}

/// Bindings of the standard multi-tap mode.
pub fn multi_tap_bindings() -> HashMap<TriggerId, CandidateList> {
    MULTI_TAP_GROUPS
        .iter()
        .map(|(trigger, chars)| (*trigger, chars.chars().map(char_candidate).collect()))
        .collect()
}

/// Bindings of the numeric pass-through mode: each keypad digit maps 1:1 to
/// that digit, no cycling.
pub fn number_entry_bindings() -> HashMap<TriggerId, CandidateList> {
    types::NUMPAD_DIGITS
        .iter()
        .enumerate()
        .map(|(digit, trigger)| {
            let c = char::from_digit(digit as u32, 10).unwrap();
            (*trigger, vec![char_candidate(c)])
        })
        .collect()
}

/// Bindings of the text-editing mode: single-candidate navigation keys.
pub fn text_editing_bindings() -> HashMap<TriggerId, CandidateList> {
    const NAV: &[(TriggerId, &str)] = &[
        (types::NUMPAD_1, "end"),
        (types::NUMPAD_2, "down_arrow"),
        (types::NUMPAD_3, "page_down"),
        (types::NUMPAD_4, "left_arrow"),
        (types::NUMPAD_5, "enter"),
        (types::NUMPAD_6, "right_arrow"),
        (types::NUMPAD_7, "home"),
        (types::NUMPAD_8, "up_arrow"),
        (types::NUMPAD_9, "page_up"),
        (types::NUMPAD_0, "esc"),
        (types::ADD, "alt"),
    ];
    NAV.iter()
        .map(|(trigger, key)| (*trigger, vec![Candidate::key(*key, *key)]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn multi_tap_cycle_order_matches_layout() {
        let bindings = multi_tap_bindings();
        let list = &bindings[&types::NUMPAD_2];
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn space_uses_spacebar_token() {
        let bindings = multi_tap_bindings();
        let list = &bindings[&types::NUMPAD_0];
        assert_eq!(list[0].name, "space");
        match &list[0].action {
            Action::Key { token } => assert_eq!(token.as_str(), "spacebar"),
            other => panic!("expected key action, got {:?}", other),
        }
    }

    #[test]
    fn number_entry_is_single_candidate() {
        let bindings = number_entry_bindings();
        for trigger in types::NUMPAD_DIGITS {
            assert_eq!(bindings[&trigger].len(), 1);
        }
    }

    #[test]
    fn substitutions_cover_shifted_glyphs() {
        let table = default_substitutions();
        assert_eq!(table["?"].as_str(), "/");
        assert_eq!(table["!"].as_str(), "1");
        assert_eq!(table["$"].as_str(), "4");
    }
}
