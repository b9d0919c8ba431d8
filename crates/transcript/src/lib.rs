use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod clean;
pub mod parser;

pub use clean::clean_caption_text;
pub use parser::{parse_cues, parse_script, zip_translations, ParseError, ScriptPair};

/// Repository trait for lesson persistence.
/// Implemented by storage layer, allowing domain to remain decoupled.
pub trait LessonRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list(&self) -> Result<Vec<Lesson>, Self::Error>;
    fn save(&self, lesson: &Lesson) -> Result<(), Self::Error>;
    fn update(&self, id: &Uuid, patch: LessonPatch) -> Result<Lesson, Self::Error>;
    fn delete(&self, id: &Uuid) -> Result<(), Self::Error>;
}

/// One timed unit of reference text.
///
/// Within one exercise, segments are expected in non-decreasing `start_secs`
/// order. Gaps between consecutive segments are legal and common; consumers
/// must not assume `end_secs[i] == start_secs[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            text: text.into(),
            translation: None,
            start_secs,
            end_secs,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Media a segment list plays against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaRef {
    /// File-based audio, addressed by URL or filesystem path.
    Audio { url: String },
    /// Streamed video clip, optionally windowed to a sub-range.
    Video {
        video_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window_start: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window_end: Option<f64>,
    },
}

/// A loadable dictation exercise. Immutable while a session runs against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub level: String,
    pub media: MediaRef,
    pub segments: Vec<Segment>,
}

/// A user-created video lesson.
///
/// `subtitles` may be empty; the session resolves captions through the
/// fetch proxy before the lesson becomes playable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub level: String,
    pub language: String,
    pub video_id: String,
    pub subtitles: Vec<Segment>,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(
        title: impl Into<String>,
        level: impl Into<String>,
        language: impl Into<String>,
        video_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            level: level.into(),
            language: language.into(),
            video_id: video_id.into(),
            subtitles: Vec::new(),
            is_system: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to a stored lesson. `None` fields are left as-is.
#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub subtitles: Option<Vec<Segment>>,
}
