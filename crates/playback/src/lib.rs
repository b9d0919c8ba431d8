//! Bounded media playback.
//!
//! One capability trait covers both media kinds the trainer plays against
//! (file-based audio, streamed video); the [`Bounder`] drives any backend so
//! playback of a segment never runs past its end time.

pub mod backend;
pub mod bounder;

pub use backend::{MediaBackend, MediaBackendRef, VirtualPlayer};
pub use bounder::{Bounder, DEFAULT_WATCH_INTERVAL};

/// Playback failures. All of them are recoverable: the session downgrades
/// to text-only interaction rather than aborting.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    /// The underlying media never finished loading.
    #[error("media is not loaded")]
    NotLoaded,
    /// Media duration is not known yet, so a seek target cannot be clamped.
    #[error("media duration unknown")]
    DurationUnknown,
    /// The backend rejected a seek.
    #[error("seek failed: {0}")]
    Seek(String),
    /// The backend rejected a play request.
    #[error("play rejected: {0}")]
    Play(String),
}
