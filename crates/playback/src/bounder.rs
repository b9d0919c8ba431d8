//! Segment-bounded playback.
//!
//! [`Bounder::play_segment`] seeks to a segment start, plays, and watches
//! the position so the backend is paused the first time it reaches the
//! segment end. At most one watch exists per bounder; starting a new
//! segment or unloading cancels the previous watch before anything else
//! runs, so a stale watch can never pause the next segment's playback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use diktat_transcript::Segment;

use crate::backend::MediaBackendRef;
use crate::PlaybackError;

/// Default polling interval for the end-of-segment watch.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(200);

/// Drives a media backend so segment playback stops at the segment end.
pub struct Bounder {
    backend: MediaBackendRef,
    interval: Duration,
    watch: Option<SegmentWatch>,
}

impl Bounder {
    pub fn new(backend: MediaBackendRef) -> Self {
        Self::with_interval(backend, DEFAULT_WATCH_INTERVAL)
    }

    pub fn with_interval(backend: MediaBackendRef, interval: Duration) -> Self {
        Self {
            backend,
            interval,
            watch: None,
        }
    }

    pub fn backend(&self) -> &MediaBackendRef {
        &self.backend
    }

    /// Seek to the segment start and play, pausing automatically the first
    /// time the position reaches the segment end.
    ///
    /// The seek target is clamped to `[0, duration]`; an unknown duration
    /// aborts the request with a recoverable error before touching the
    /// backend.
    pub fn play_segment(&mut self, segment: &Segment) -> Result<(), PlaybackError> {
        self.cancel_watch();

        let Some(duration) = self.backend.duration() else {
            // No duration to clamp against. A backend whose media failed to
            // load reports that from the seek itself; otherwise the clamp
            // failure is the recoverable error.
            return Err(self
                .backend
                .seek(segment.start_secs)
                .err()
                .unwrap_or(PlaybackError::DurationUnknown));
        };
        self.backend.seek(segment.start_secs.clamp(0.0, duration))?;
        self.backend.play()?;

        self.watch = Some(SegmentWatch::spawn(
            Arc::clone(&self.backend),
            segment.end_secs,
            self.interval,
        ));
        Ok(())
    }

    /// Stop any pending end-of-segment watch. Idempotent.
    pub fn cancel_watch(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.stop();
        }
    }

    /// Play from the current position, unbounded.
    pub fn play(&self) -> Result<(), PlaybackError> {
        self.backend.play()
    }

    pub fn pause(&self) {
        self.backend.pause();
    }

    /// Flip between playing and paused.
    pub fn toggle(&self) -> Result<(), PlaybackError> {
        if self.backend.is_playing() {
            self.backend.pause();
            Ok(())
        } else {
            self.backend.play()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.backend.is_playing()
    }
}

impl Drop for Bounder {
    fn drop(&mut self) {
        self.cancel_watch();
    }
}

/// Poll task that pauses the backend once its position reaches a segment
/// end, then exits. Cancellation joins the thread, so after `stop` returns
/// no callback can touch the backend.
struct SegmentWatch {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SegmentWatch {
    fn spawn(backend: MediaBackendRef, end_secs: f64, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = std::thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                if backend.current_time() >= end_secs {
                    backend.pause();
                    tracing::debug!(end_secs, "segment end reached, paused");
                    break;
                }
                std::thread::sleep(interval);
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SegmentWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MediaBackend, VirtualPlayer};
    use std::sync::Mutex;

    /// Backend wrapper that counts pause calls.
    struct CountingBackend {
        inner: VirtualPlayer,
        pauses: Mutex<usize>,
    }

    impl CountingBackend {
        fn new(duration_secs: f64) -> Self {
            Self {
                inner: VirtualPlayer::new(duration_secs),
                pauses: Mutex::new(0),
            }
        }

        fn pause_count(&self) -> usize {
            *self.pauses.lock().unwrap()
        }
    }

    impl MediaBackend for CountingBackend {
        fn seek(&self, secs: f64) -> Result<(), PlaybackError> {
            self.inner.seek(secs)
        }
        fn play(&self) -> Result<(), PlaybackError> {
            self.inner.play()
        }
        fn pause(&self) {
            *self.pauses.lock().unwrap() += 1;
            self.inner.pause();
        }
        fn is_playing(&self) -> bool {
            self.inner.is_playing()
        }
        fn current_time(&self) -> f64 {
            self.inner.current_time()
        }
        fn duration(&self) -> Option<f64> {
            self.inner.duration()
        }
    }

    /// Backend that never learns its duration.
    struct DurationlessBackend;

    impl MediaBackend for DurationlessBackend {
        fn seek(&self, _secs: f64) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn play(&self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn pause(&self) {}
        fn is_playing(&self) -> bool {
            false
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn duration(&self) -> Option<f64> {
            None
        }
    }

    fn short_interval() -> Duration {
        Duration::from_millis(10)
    }

    #[test]
    fn test_auto_pause_at_segment_end_exactly_once() {
        let backend = Arc::new(CountingBackend::new(10.0));
        let mut bounder =
            Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        let segment = Segment::new("kurz", 0.0, 0.05);
        bounder.play_segment(&segment).unwrap();

        std::thread::sleep(Duration::from_millis(200));
        assert!(!backend.is_playing());
        assert_eq!(backend.pause_count(), 1, "watch must pause exactly once");

        // The exhausted watch never re-triggers, even if playback resumes.
        backend.play().unwrap();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(backend.pause_count(), 1);
    }

    #[test]
    fn test_play_segment_seeks_to_start() {
        let backend = Arc::new(VirtualPlayer::new(60.0));
        let mut bounder =
            Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        let segment = Segment::new("mitte", 30.0, 32.0);
        bounder.play_segment(&segment).unwrap();
        assert!(backend.current_time() >= 30.0);
        assert!(backend.is_playing());
        bounder.cancel_watch();
    }

    #[test]
    fn test_new_segment_cancels_previous_watch() {
        let backend = Arc::new(CountingBackend::new(60.0));
        let mut bounder =
            Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        // The second segment starts past the first segment's end. A stale
        // first watch would see the new position and pause immediately;
        // cancel-before-replace joins it before the seek happens.
        bounder.play_segment(&Segment::new("a", 0.0, 0.5)).unwrap();
        bounder.play_segment(&Segment::new("b", 1.0, 40.0)).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        assert!(backend.is_playing(), "replacement watch must keep playing");
        assert_eq!(backend.pause_count(), 0);
        bounder.cancel_watch();
    }

    #[test]
    fn test_cancel_watch_stops_polling() {
        let backend = Arc::new(CountingBackend::new(10.0));
        let mut bounder =
            Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        bounder.play_segment(&Segment::new("a", 0.0, 0.05)).unwrap();
        bounder.cancel_watch();
        let count = backend.pause_count();

        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(backend.pause_count(), count, "cancelled watch must not fire");
    }

    #[test]
    fn test_unknown_duration_is_recoverable() {
        let mut bounder =
            Bounder::with_interval(Arc::new(DurationlessBackend), short_interval());
        let result = bounder.play_segment(&Segment::new("a", 0.0, 1.0));
        assert!(matches!(result, Err(PlaybackError::DurationUnknown)));
    }

    #[test]
    fn test_seek_target_clamped() {
        let backend = Arc::new(VirtualPlayer::new(5.0));
        let mut bounder =
            Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        // Start beyond the media end clamps to the duration.
        bounder.play_segment(&Segment::new("a", 20.0, 30.0)).unwrap();
        assert!(backend.current_time() <= 5.0);
        bounder.cancel_watch();
    }

    #[test]
    fn test_unloaded_backend_reports_not_loaded() {
        let mut bounder =
            Bounder::with_interval(Arc::new(VirtualPlayer::unloaded()), short_interval());
        let result = bounder.play_segment(&Segment::new("a", 0.0, 1.0));
        assert!(matches!(result, Err(PlaybackError::NotLoaded)));
    }

    #[test]
    fn test_toggle_flips_play_state() {
        let backend = Arc::new(VirtualPlayer::new(10.0));
        let bounder = Bounder::with_interval(Arc::clone(&backend) as MediaBackendRef, short_interval());

        bounder.toggle().unwrap();
        assert!(backend.is_playing());
        bounder.toggle().unwrap();
        assert!(!backend.is_playing());
    }
}
