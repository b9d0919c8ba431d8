//! Key-binding configuration and key event matching.
//!
//! Bindings are an explicit value handed to the session at construction and
//! replaced on demand (e.g. when the host's settings editor closes); the
//! session never reads ambient global state.

use serde::{Deserialize, Serialize};

/// Modifier that replays the current segment when pressed alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayKey {
    Ctrl,
    Alt,
    Shift,
    Cmd,
}

/// Key that toggles play/pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayPauseKey {
    Backtick,
    Space,
    Tab,
}

/// Key-binding configuration injected into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub replay_key: ReplayKey,
    pub play_pause_key: PlayPauseKey,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            replay_key: ReplayKey::Ctrl,
            play_pause_key: PlayPauseKey::Backtick,
        }
    }
}

/// Key identity of a single press, as reported by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Space,
    Tab,
    Backtick,
    Ctrl,
    Alt,
    Shift,
    Meta,
    Other,
}

/// One key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// A press of `code` with no modifiers held.
    pub fn of(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }
}

impl KeyBindings {
    /// The configured replay modifier, pressed without the other modifiers.
    pub(crate) fn is_replay_chord(&self, event: &KeyEvent) -> bool {
        match self.replay_key {
            ReplayKey::Ctrl => event.ctrl && !event.shift && !event.alt,
            ReplayKey::Alt => event.alt && !event.ctrl && !event.shift,
            ReplayKey::Shift => event.shift && !event.ctrl && !event.alt,
            ReplayKey::Cmd => event.meta || event.code == KeyCode::Meta,
        }
    }

    pub(crate) fn is_play_pause(&self, event: &KeyEvent) -> bool {
        let wanted = match self.play_pause_key {
            PlayPauseKey::Backtick => KeyCode::Backtick,
            PlayPauseKey::Space => KeyCode::Space,
            PlayPauseKey::Tab => KeyCode::Tab,
        };
        event.code == wanted
    }
}
