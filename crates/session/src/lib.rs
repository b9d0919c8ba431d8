//! The interactive dictation loop.
//!
//! Composes the segment navigator, answer checker, key bindings, and the
//! playback bounder into one session state machine the host UI renders.

pub mod checker;
pub mod keys;
pub mod navigator;
pub mod session;

pub use checker::check;
pub use keys::{KeyBindings, KeyCode, KeyEvent, PlayPauseKey, ReplayKey};
pub use navigator::Navigator;
pub use session::{Phase, Session, SubmitOutcome};
