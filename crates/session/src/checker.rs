//! Literal answer checking.

/// Compare a typed answer against the reference text.
///
/// Both sides are trimmed and lowercased, then compared for exact equality.
/// No partial credit, no fuzzy matching, and no punctuation stripping —
/// captions are cleaned at fetch time, not here.
pub fn check(user_input: &str, reference: &str) -> bool {
    user_input.trim().to_lowercase() == reference.trim().to_lowercase()
}
