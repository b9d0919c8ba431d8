//! TTL cache in front of a caption source.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use diktat_transcript::{clean_caption_text, Segment};

use crate::source::{CaptionSource, DEFAULT_LANG};
use crate::Result;

/// How long fetched captions stay cached.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

struct CacheEntry {
    segments: Vec<Segment>,
    inserted_at: Instant,
}

/// Caching front of a caption source, keyed by `(video_id, lang)`.
///
/// Raw captions are cleaned and mapped to segments before they enter the
/// cache, so a hit never touches the upstream or the cleaning path again.
pub struct CaptionProxy<S> {
    source: S,
    ttl: Duration,
    cache: Mutex<HashMap<(String, String), CacheEntry>>,
}

impl<S: CaptionSource> CaptionProxy<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, CACHE_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Segments for a video, from cache when fresh. An empty `lang` falls
    /// back to [`DEFAULT_LANG`].
    pub async fn segments(&self, video_id: &str, lang: &str) -> Result<Vec<Segment>> {
        let lang = if lang.is_empty() { DEFAULT_LANG } else { lang };
        let key = (video_id.to_string(), lang.to_string());

        if let Some(segments) = self.lookup(&key) {
            tracing::debug!(video_id, lang, "caption cache hit");
            return Ok(segments);
        }

        let raw = self.source.fetch(video_id, lang).await?;
        let segments: Vec<Segment> = raw
            .into_iter()
            .filter_map(|item| {
                let text = clean_caption_text(&item.text);
                if text.is_empty() || item.dur <= 0.0 {
                    return None;
                }
                Some(Segment::new(text, item.start, item.start + item.dur))
            })
            .collect();

        tracing::debug!(video_id, lang, count = segments.len(), "captions fetched and cached");
        self.cache
            .lock()
            .expect("caption cache mutex poisoned")
            .insert(
                key,
                CacheEntry {
                    segments: segments.clone(),
                    inserted_at: Instant::now(),
                },
            );
        Ok(segments)
    }

    fn lookup(&self, key: &(String, String)) -> Option<Vec<Segment>> {
        let mut cache = self.cache.lock().expect("caption cache mutex poisoned");
        match cache.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.segments.clone()),
            Some(_) => {
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.cache
            .lock()
            .expect("caption cache mutex poisoned")
            .clear();
    }
}
