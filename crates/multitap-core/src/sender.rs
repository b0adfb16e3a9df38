//! Collaborator seams: key output and speech/sound feedback.

use crate::types::{KeyToken, Modifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The sender has no mapping for the given key name.
    #[error("unknown key token: {0}")]
    UnknownToken(String),
}

/// Performs key output at the OS level. Implementations own platform
/// key-injection; the engine only ever sees this trait.
pub trait KeySender {
    fn press_combo(&mut self, modifiers: Modifiers, token: &KeyToken) -> Result<(), SendError>;
    fn inject_text(&mut self, text: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    KeyPress,
    Capslock,
    Error,
}

/// Speech and sound output. Fire-and-forget; nothing the engine does depends
/// on a return value.
pub trait Feedback {
    fn speak(&mut self, text: &str);
    fn play(&mut self, cue: Cue);
}

/// Feedback sink that discards everything.
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn speak(&mut self, _text: &str) {}
    fn play(&mut self, _cue: Cue) {}
}

pub mod recording {
    //! Recording fakes for tests and headless hosts.

    use super::{Cue, Feedback, KeySender, SendError};
    use crate::types::{KeyToken, Modifiers};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Combo {
            modifiers: Modifiers,
            token: KeyToken,
        },
        Text(String),
    }

    #[derive(Clone, Default)]
    pub struct RecordingSender {
        sent: Arc<Mutex<Vec<Sent>>>,
        rejected_tokens: HashSet<String>,
    }

    impl RecordingSender {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes `press_combo` report the given token as unknown.
        pub fn reject_token(&mut self, token: &str) {
            self.rejected_tokens.insert(token.to_string());
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().clone()
        }

        pub fn combos(&self) -> Vec<(Modifiers, KeyToken)> {
            self.sent
                .lock()
                .iter()
                .filter_map(|s| match s {
                    Sent::Combo { modifiers, token } => Some((*modifiers, token.clone())),
                    Sent::Text(_) => None,
                })
                .collect()
        }
    }

    impl KeySender for RecordingSender {
        fn press_combo(
            &mut self,
            modifiers: Modifiers,
            token: &KeyToken,
        ) -> Result<(), SendError> {
            if self.rejected_tokens.contains(token.as_str()) {
                return Err(SendError::UnknownToken(token.as_str().to_string()));
            }
            self.sent.lock().push(Sent::Combo {
                modifiers,
                token: token.clone(),
            });
            Ok(())
        }

        fn inject_text(&mut self, text: &str) -> Result<(), SendError> {
            self.sent.lock().push(Sent::Text(text.to_string()));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingFeedback {
        spoken: Arc<Mutex<Vec<String>>>,
        cues: Arc<Mutex<Vec<Cue>>>,
    }

    impl RecordingFeedback {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn spoken(&self) -> Vec<String> {
            self.spoken.lock().clone()
        }

        pub fn cues(&self) -> Vec<Cue> {
            self.cues.lock().clone()
        }
    }

    impl Feedback for RecordingFeedback {
        fn speak(&mut self, text: &str) {
            self.spoken.lock().push(text.to_string());
        }

        fn play(&mut self, cue: Cue) {
            self.cues.lock().push(cue);
        }
    }
}
