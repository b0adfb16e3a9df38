pub mod config;
pub mod dispatch;
pub mod engine;
pub mod modes;
pub mod scheduler;
pub mod sender;
pub mod shift;
pub mod tables;
pub mod types;

pub use config::{SavedState, Settings};
pub use dispatch::{DispatchEvent, Dispatcher};
pub use engine::Engine;
pub use modes::{Direction, Mode, ModeTable};
pub use scheduler::CommitScheduler;
pub use sender::{Cue, Feedback, KeySender, SendError};
pub use shift::ShiftMode;
pub use types::{Action, Candidate, CandidateList, KeyToken, Modifier, Modifiers, TriggerId};
