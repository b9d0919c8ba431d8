//! Cleaning for caption text fetched from external providers.
//!
//! Applied once at fetch time, before segments enter an exercise. Answer
//! checking never strips punctuation; captions are cleaned here so the
//! reference text users type against has none to begin with.

/// Punctuation and bracket characters removed from fetched captions.
const STRIPPED: &[char] = &[
    '.', ',', '[', ']', '{', '}', '(', ')', '"', '\'', '\u{201c}', '\u{201d}', '\u{2018}',
    '\u{2019}', '!', '?', ':', ';', '<', '>', '/', '\\',
];

/// Decode the common HTML entities, strip punctuation, and trim.
pub fn clean_caption_text(text: &str) -> String {
    let decoded = text
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'");

    decoded
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_decoded_then_stripped() {
        assert_eq!(clean_caption_text("&quot;Hallo&quot; &amp; Co"), "Hallo & Co");
        assert_eq!(clean_caption_text("it&#39;s fine"), "its fine");
    }

    #[test]
    fn test_punctuation_removed() {
        assert_eq!(clean_caption_text("Wie geht's?!"), "Wie gehts");
        assert_eq!(clean_caption_text("[Musik]"), "Musik");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(clean_caption_text("  Guten Tag  "), "Guten Tag");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(clean_caption_text("Das ist gut"), "Das ist gut");
    }
}
