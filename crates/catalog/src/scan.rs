//! Directory scanner for file-based exercises.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use diktat_transcript::{parse_cues, parse_script, zip_translations, Exercise, MediaRef};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory layout the scanner walks: `<base>.mp3` in `audio` pairs with
/// `<base>.txt` in `scripts` and `<base>.vtt` in `subtitles`.
#[derive(Debug, Clone)]
pub struct CatalogDirs {
    pub audio: PathBuf,
    pub scripts: PathBuf,
    pub subtitles: PathBuf,
}

/// Build exercises from paired files on disk.
///
/// Audio files without a script are ignored. Pairs without a subtitle file
/// carry no timing and are skipped with a warning; unreadable or empty
/// files skip that entry only. Results come back in file-name order.
pub fn scan(dirs: &CatalogDirs) -> Result<Vec<Exercise>, CatalogError> {
    let entries = fs::read_dir(&dirs.audio).map_err(|source| CatalogError::Io {
        path: dirs.audio.clone(),
        source,
    })?;

    let mut bases: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".mp3").map(str::to_string)
        })
        .collect();
    bases.sort();

    let mut exercises = Vec::new();
    for base in bases {
        let script_path = dirs.scripts.join(format!("{base}.txt"));
        if !script_path.exists() {
            continue;
        }

        let cue_path = dirs.subtitles.join(format!("{base}.vtt"));
        if !cue_path.exists() {
            tracing::warn!(%base, "script has no subtitle timing, skipping");
            continue;
        }

        let script = match fs::read_to_string(&script_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(%base, "unreadable script file: {e}");
                continue;
            }
        };
        let cue_text = match fs::read_to_string(&cue_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(%base, "unreadable subtitle file: {e}");
                continue;
            }
        };

        let cues = parse_cues(&cue_text);
        if cues.is_empty() {
            tracing::warn!(%base, "subtitle file has no usable cues, skipping");
            continue;
        }
        let segments = zip_translations(cues, &parse_script(&script));

        let (level, title) = level_and_title(&base);
        let audio_url = dirs.audio.join(format!("{base}.mp3")).display().to_string();
        exercises.push(Exercise {
            id: base,
            title,
            level,
            media: MediaRef::Audio { url: audio_url },
            segments,
        });
    }

    tracing::info!(count = exercises.len(), "catalog scan complete");
    Ok(exercises)
}

/// Infer the level from a leading `A1`..`C2` in the file name; the rest,
/// underscores replaced by spaces, becomes the title.
fn level_and_title(base: &str) -> (String, String) {
    static LEVEL_RE: OnceLock<Regex> = OnceLock::new();
    let re = LEVEL_RE.get_or_init(|| Regex::new(r"(?i)^([a-c][1-2])").unwrap());

    let level = re
        .captures(base)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| "A1".to_string());

    let spaced = base.replace('_', " ");
    let title = re.replace(&spaced, "").trim().to_string();

    (level, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    const CUES: &str = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nGuten Tag!\n\n00:00:02.000 --> 00:00:04.000\nWie geht es Ihnen?\n";
    const SCRIPT: &str = "Guten Tag!\nGood day!\nWie geht es Ihnen?\nHow are you?\n";

    fn write_triple(root: &Path, base: &str, with_cues: bool) -> CatalogDirs {
        let dirs = CatalogDirs {
            audio: root.join("audio"),
            scripts: root.join("scripts"),
            subtitles: root.join("subtitles"),
        };
        fs::create_dir_all(&dirs.audio).unwrap();
        fs::create_dir_all(&dirs.scripts).unwrap();
        fs::create_dir_all(&dirs.subtitles).unwrap();

        fs::write(dirs.audio.join(format!("{base}.mp3")), b"").unwrap();
        fs::write(dirs.scripts.join(format!("{base}.txt")), SCRIPT).unwrap();
        if with_cues {
            fs::write(dirs.subtitles.join(format!("{base}.vtt")), CUES).unwrap();
        }
        dirs
    }

    #[test]
    fn test_scan_builds_timed_exercise_with_translations() {
        let dir = tempdir().unwrap();
        let dirs = write_triple(dir.path(), "a1_zu_hause", true);

        let exercises = scan(&dirs).unwrap();
        assert_eq!(exercises.len(), 1);

        let exercise = &exercises[0];
        assert_eq!(exercise.id, "a1_zu_hause");
        assert_eq!(exercise.level, "A1");
        assert_eq!(exercise.title, "zu hause");
        assert_eq!(exercise.segments.len(), 2);
        assert_eq!(exercise.segments[0].text, "Guten Tag!");
        assert_eq!(exercise.segments[0].start_secs, 0.0);
        assert_eq!(exercise.segments[0].translation.as_deref(), Some("Good day!"));
        assert!(matches!(exercise.media, MediaRef::Audio { .. }));
    }

    #[test]
    fn test_audio_without_script_ignored() {
        let dir = tempdir().unwrap();
        let dirs = write_triple(dir.path(), "a1_eins", true);
        fs::write(dirs.audio.join("b1_ohne_skript.mp3"), b"").unwrap();

        let exercises = scan(&dirs).unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].id, "a1_eins");
    }

    #[test]
    fn test_pair_without_timing_skipped() {
        let dir = tempdir().unwrap();
        let dirs = write_triple(dir.path(), "a2_kein_vtt", false);

        let exercises = scan(&dirs).unwrap();
        assert!(exercises.is_empty());
    }

    #[test]
    fn test_missing_audio_dir_is_an_error() {
        let dirs = CatalogDirs {
            audio: PathBuf::from("/nonexistent/audio"),
            scripts: PathBuf::from("/nonexistent/scripts"),
            subtitles: PathBuf::from("/nonexistent/subtitles"),
        };
        assert!(matches!(scan(&dirs), Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_results_in_file_name_order() {
        let dir = tempdir().unwrap();
        let dirs = write_triple(dir.path(), "b1_zwei", true);
        fs::write(dirs.audio.join("a1_eins.mp3"), b"").unwrap();
        fs::write(dirs.scripts.join("a1_eins.txt"), SCRIPT).unwrap();
        fs::write(dirs.subtitles.join("a1_eins.vtt"), CUES).unwrap();

        let exercises = scan(&dirs).unwrap();
        let ids: Vec<&str> = exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a1_eins", "b1_zwei"]);
    }

    #[test]
    fn test_level_and_title_inference() {
        assert_eq!(
            level_and_title("b2_beim_arzt"),
            ("B2".to_string(), "beim arzt".to_string())
        );
        assert_eq!(
            level_and_title("ohne_stufe"),
            ("A1".to_string(), "ohne stufe".to_string())
        );
        assert_eq!(level_and_title("C1"), ("C1".to_string(), String::new()));
    }
}
