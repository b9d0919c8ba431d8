//! Session state machine.

use diktat_captions::{CaptionProxy, CaptionSource, FetchError};
use diktat_playback::{Bounder, MediaBackendRef, PlaybackError};
use diktat_transcript::{Exercise, Lesson, MediaRef, Segment};

use crate::checker;
use crate::keys::{KeyBindings, KeyCode, KeyEvent};
use crate::navigator::Navigator;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No exercise loaded.
    Idle,
    /// Segments loaded, nothing typed yet.
    Ready,
    /// The user is typing an answer.
    Answering,
    /// An incorrect submit exposed the reference text.
    Revealed,
}

/// What a submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answer matched. `advanced` is false on the last segment, where the
    /// navigator step is a no-op.
    Correct { advanced: bool },
    /// Answer did not match; the reference is now revealed.
    Incorrect,
    /// Nothing to check against (no exercise, or an empty segment list).
    NoSegment,
}

/// Live state for one exercise being attempted by one user.
///
/// All mutation happens through the owning context; the only background
/// execution is the bounder's end-of-segment watch, which is cancelled
/// whenever the segment changes or the session unloads.
pub struct Session {
    bounder: Bounder,
    bindings: KeyBindings,
    exercise: Option<Exercise>,
    navigator: Navigator,
    phase: Phase,
    user_input: String,
    revealed: bool,
    show_translation: bool,
    playback_disabled: bool,
    last_playback_error: Option<PlaybackError>,
}

impl Session {
    pub fn new(backend: MediaBackendRef, bindings: KeyBindings) -> Self {
        Self::with_bounder(Bounder::new(backend), bindings)
    }

    pub fn with_bounder(bounder: Bounder, bindings: KeyBindings) -> Self {
        Self {
            bounder,
            bindings,
            exercise: None,
            navigator: Navigator::default(),
            phase: Phase::Idle,
            user_input: String::new(),
            revealed: false,
            show_translation: false,
            playback_disabled: false,
            last_playback_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    pub fn current_segment(&self) -> Option<&Segment> {
        self.navigator.current()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub fn segment_count(&self) -> usize {
        self.navigator.len()
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn show_translation(&self) -> bool {
        self.show_translation
    }

    /// True once the media failed to load; typing and reveal stay usable.
    pub fn playback_disabled(&self) -> bool {
        self.playback_disabled
    }

    /// Most recent recoverable playback error, for the host's banner.
    pub fn last_playback_error(&self) -> Option<&PlaybackError> {
        self.last_playback_error.as_ref()
    }

    pub fn bindings(&self) -> KeyBindings {
        self.bindings
    }

    /// Replace the key bindings, e.g. after the settings editor closes.
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Load an exercise and reset all per-exercise state.
    pub fn load_exercise(&mut self, exercise: Exercise) {
        self.bounder.cancel_watch();
        self.navigator = Navigator::new(exercise.segments.clone());
        tracing::info!(id = %exercise.id, segments = self.navigator.len(), "exercise loaded");
        self.exercise = Some(exercise);
        self.phase = Phase::Ready;
        self.user_input.clear();
        self.revealed = false;
        self.playback_disabled = false;
        self.last_playback_error = None;
    }

    /// Resolve a stored lesson into an exercise and load it, fetching
    /// captions through the proxy when the lesson carries none.
    ///
    /// On a fetch error the session keeps its previous phase so the host can
    /// show "captions unavailable" and offer a retry.
    pub async fn load_lesson<S: CaptionSource>(
        &mut self,
        lesson: &Lesson,
        proxy: &CaptionProxy<S>,
    ) -> Result<(), FetchError> {
        let segments = if lesson.subtitles.is_empty() {
            proxy.segments(&lesson.video_id, &lesson.language).await?
        } else {
            lesson.subtitles.clone()
        };

        self.load_exercise(Exercise {
            id: lesson.id.to_string(),
            title: lesson.title.clone(),
            level: lesson.level.clone(),
            media: MediaRef::Video {
                video_id: lesson.video_id.clone(),
                window_start: None,
                window_end: None,
            },
            segments,
        });
        Ok(())
    }

    /// Check the typed answer against the current segment. A correct answer
    /// auto-advances; an incorrect one reveals the reference.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(reference) = self.navigator.current().map(|s| s.text.clone()) else {
            return SubmitOutcome::NoSegment;
        };

        if checker::check(&self.user_input, &reference) {
            let advanced = self.step(Step::Forward);
            self.phase = Phase::Answering;
            self.revealed = false;
            SubmitOutcome::Correct { advanced }
        } else {
            self.phase = Phase::Revealed;
            self.revealed = true;
            SubmitOutcome::Incorrect
        }
    }

    /// Update the typed answer. Editing in `Revealed` dismisses the shown
    /// reference.
    pub fn input_changed(&mut self, text: impl Into<String>) {
        self.user_input = text.into();
        match self.phase {
            Phase::Revealed => {
                self.revealed = false;
                self.phase = Phase::Answering;
            }
            Phase::Ready => self.phase = Phase::Answering,
            _ => {}
        }
    }

    pub fn toggle_translation(&mut self) {
        self.show_translation = !self.show_translation;
    }

    /// Move to the next segment and play it. Returns false at the last
    /// segment (boundary no-op).
    pub fn next(&mut self) -> bool {
        self.step(Step::Forward)
    }

    /// Move to the previous segment and play it. Returns false at index 0.
    pub fn previous(&mut self) -> bool {
        self.step(Step::Backward)
    }

    /// Replay the current segment from its start.
    pub fn replay(&mut self) {
        self.play_current();
    }

    /// Toggle between playing and paused, unbounded.
    pub fn toggle_play(&mut self) {
        if self.playback_disabled {
            return;
        }
        if let Err(e) = self.bounder.toggle() {
            self.record_playback_error(e);
        }
    }

    /// Dispatch one key press. Returns true when the event was consumed.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if self.bindings.is_replay_chord(&event) {
            self.replay();
            return true;
        }
        if self.bindings.is_play_pause(&event) {
            self.toggle_play();
            return true;
        }
        if event.code == KeyCode::Enter && !event.shift {
            self.submit();
            return true;
        }
        false
    }

    /// Drop the exercise and return to `Idle`. Stops any pending watch so
    /// nothing fires after the user navigates away.
    pub fn unload(&mut self) {
        self.bounder.cancel_watch();
        self.exercise = None;
        self.navigator = Navigator::default();
        self.phase = Phase::Idle;
        self.user_input.clear();
        self.revealed = false;
        self.last_playback_error = None;
    }

    fn step(&mut self, step: Step) -> bool {
        let moved = match step {
            Step::Forward => self.navigator.next().is_some(),
            Step::Backward => self.navigator.previous().is_some(),
        };
        if moved {
            // Navigating always discards the in-progress answer.
            self.user_input.clear();
            self.revealed = false;
            if self.phase != Phase::Idle {
                self.phase = Phase::Answering;
            }
            self.play_current();
        }
        moved
    }

    fn play_current(&mut self) {
        if self.playback_disabled {
            return;
        }
        let Some(segment) = self.navigator.current().cloned() else {
            return;
        };
        if let Err(e) = self.bounder.play_segment(&segment) {
            self.record_playback_error(e);
        }
    }

    fn record_playback_error(&mut self, error: PlaybackError) {
        tracing::warn!("playback degraded: {error}");
        if matches!(error, PlaybackError::NotLoaded) {
            self.playback_disabled = true;
        }
        self.last_playback_error = Some(error);
    }
}

enum Step {
    Forward,
    Backward,
}
