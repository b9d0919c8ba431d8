use chrono::{DateTime, Utc};
use diktat_transcript::{Lesson, LessonPatch, LessonRepository, Segment};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS lessons (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                level TEXT NOT NULL,
                language TEXT NOT NULL,
                video_id TEXT NOT NULL,
                is_system INTEGER NOT NULL DEFAULT 0,
                subtitles_json TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_lessons_created_at ON lessons(created_at);
            "#,
        )?;
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Result<Lesson> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let row = conn
            .query_row(
                "SELECT id, title, level, language, video_id, is_system, subtitles_json, created_at, updated_at
                 FROM lessons WHERE id = ?1",
                [id.to_string()],
                LessonRow::from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::NotFound(format!("lesson {id}"))
                }
                other => StorageError::DatabaseError(other),
            })?;
        row.into_lesson()
    }
}

/// Raw row shape, decoded into a [`Lesson`] outside the rusqlite closure so
/// JSON errors map to [`StorageError`] instead of a database error.
struct LessonRow {
    id: String,
    title: String,
    level: String,
    language: String,
    video_id: String,
    is_system: bool,
    subtitles_json: String,
    created_at: i64,
    updated_at: i64,
}

impl LessonRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            level: row.get(2)?,
            language: row.get(3)?,
            video_id: row.get(4)?,
            is_system: row.get(5)?,
            subtitles_json: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_lesson(self) -> Result<Lesson> {
        let subtitles: Vec<Segment> = serde_json::from_str(&self.subtitles_json)?;
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| StorageError::NotFound(format!("lesson with malformed id {}", self.id)))?;
        Ok(Lesson {
            id,
            title: self.title,
            level: self.level,
            language: self.language,
            video_id: self.video_id,
            subtitles,
            is_system: self.is_system,
            created_at: timestamp(self.created_at),
            updated_at: timestamp(self.updated_at),
        })
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl LessonRepository for Database {
    type Error = StorageError;

    fn list(&self) -> Result<Vec<Lesson>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, level, language, video_id, is_system, subtitles_json, created_at, updated_at
             FROM lessons ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], LessonRow::from_row)?;

        let mut lessons = Vec::new();
        for row in rows {
            lessons.push(row?.into_lesson()?);
        }
        Ok(lessons)
    }

    fn save(&self, lesson: &Lesson) -> Result<()> {
        let subtitles_json = serde_json::to_string(&lesson.subtitles)?;
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO lessons
             (id, title, level, language, video_id, is_system, subtitles_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                lesson.id.to_string(),
                &lesson.title,
                &lesson.level,
                &lesson.language,
                &lesson.video_id,
                lesson.is_system,
                subtitles_json,
                lesson.created_at.timestamp(),
                lesson.updated_at.timestamp(),
            ),
        )?;
        tracing::debug!(id = %lesson.id, "lesson saved");
        Ok(())
    }

    fn update(&self, id: &Uuid, patch: LessonPatch) -> Result<Lesson> {
        let mut lesson = self.get(id)?;

        if let Some(title) = patch.title {
            lesson.title = title;
        }
        if let Some(level) = patch.level {
            lesson.level = level;
        }
        if let Some(language) = patch.language {
            lesson.language = language;
        }
        if let Some(subtitles) = patch.subtitles {
            lesson.subtitles = subtitles;
        }
        lesson.updated_at = Utc::now();

        self.save(&lesson)?;
        Ok(lesson)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let affected = conn.execute("DELETE FROM lessons WHERE id = ?1", [id.to_string()])?;
        if affected == 0 {
            return Err(StorageError::NotFound(format!("lesson {id}")));
        }
        tracing::debug!(%id, "lesson deleted");
        Ok(())
    }
}
