//! Media backend abstraction.
//!
//! A file-audio element and an embedded video widget expose the same small
//! control surface; everything above this trait is written once.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::PlaybackError;

/// Capability interface implemented by every media player variant.
pub trait MediaBackend: Send + Sync {
    /// Seek to an absolute position in seconds.
    fn seek(&self, secs: f64) -> Result<(), PlaybackError>;
    /// Start playback from the current position.
    fn play(&self) -> Result<(), PlaybackError>;
    /// Pause playback. Pausing an already paused player is a no-op.
    fn pause(&self);
    fn is_playing(&self) -> bool;
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    /// Total media duration, if known yet.
    fn duration(&self) -> Option<f64>;
}

/// Shared handle to a media backend.
pub type MediaBackendRef = Arc<dyn MediaBackend>;

/// Media backend driven by a monotonic internal clock.
///
/// Stands in for a real player so the engine runs headless and under test:
/// the position advances in real time while playing and clamps at the media
/// duration, where playback stops on its own.
pub struct VirtualPlayer {
    inner: Mutex<PlayerState>,
}

struct PlayerState {
    loaded: bool,
    position: f64,
    playing: bool,
    started_at: Option<Instant>,
    duration: Option<f64>,
}

impl VirtualPlayer {
    /// A loaded player with a known duration, positioned at zero, paused.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            inner: Mutex::new(PlayerState {
                loaded: true,
                position: 0.0,
                playing: false,
                started_at: None,
                duration: Some(duration_secs),
            }),
        }
    }

    /// A player whose media failed to load. Every control call reports
    /// [`PlaybackError::NotLoaded`].
    pub fn unloaded() -> Self {
        Self {
            inner: Mutex::new(PlayerState {
                loaded: false,
                position: 0.0,
                playing: false,
                started_at: None,
                duration: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlayerState> {
        self.inner.lock().expect("player mutex poisoned")
    }
}

impl PlayerState {
    /// Position including time elapsed since play started, clamped to the
    /// media duration.
    fn position_now(&self) -> f64 {
        let mut position = self.position;
        if self.playing {
            if let Some(started_at) = self.started_at {
                position += started_at.elapsed().as_secs_f64();
            }
        }
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    /// Fold elapsed play time into the stored position and stop at the end
    /// of the media.
    fn settle(&mut self) {
        let now = self.position_now();
        self.position = now;
        if self.playing {
            self.started_at = Some(Instant::now());
            if self.duration.is_some_and(|d| now >= d) {
                self.playing = false;
                self.started_at = None;
            }
        }
    }
}

impl MediaBackend for VirtualPlayer {
    fn seek(&self, secs: f64) -> Result<(), PlaybackError> {
        let mut state = self.lock();
        if !state.loaded {
            return Err(PlaybackError::NotLoaded);
        }
        let duration = state.duration.unwrap_or(f64::MAX);
        state.position = secs.clamp(0.0, duration);
        if state.playing {
            state.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let mut state = self.lock();
        if !state.loaded {
            return Err(PlaybackError::NotLoaded);
        }
        state.settle();
        if !state.playing {
            state.playing = true;
            state.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.lock();
        state.settle();
        state.playing = false;
        state.started_at = None;
    }

    fn is_playing(&self) -> bool {
        let mut state = self.lock();
        state.settle();
        state.playing
    }

    fn current_time(&self) -> f64 {
        self.lock().position_now()
    }

    fn duration(&self) -> Option<f64> {
        self.lock().duration
    }
}
