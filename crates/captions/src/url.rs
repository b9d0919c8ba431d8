//! YouTube URL handling.

use std::sync::OnceLock;

use regex::Regex;

/// Extract the 11-character video id from the usual YouTube URL shapes
/// (`watch?v=`, `youtu.be/`, `embed/`, bare `v/`).
pub fn extract_video_id(url: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?:youtu\.be/|/v/|/u/\w/|/embed/|watch\?v=|&v=)([^#&?/]+)").unwrap()
    });

    let id = re.captures(url)?.get(1)?.as_str();
    (id.len() == 11).then(|| id.to_string())
}
