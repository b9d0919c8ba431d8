//! Timed-text parsing.
//!
//! Two source formats produce the same `Vec<Segment>` shape: cue-format
//! subtitle text (timestamped blocks) and plain scripts (alternating
//! text/translation lines, no timing).

use crate::Segment;

/// Why a single cue block was rejected. Rejected blocks are dropped and
/// parsing continues; the error never escapes this module's entry points.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),
    #[error("cue has no text")]
    EmptyCue,
}

/// A text/translation pair read from a plain script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPair {
    pub text: String,
    pub translation: String,
}

/// Parse cue-format subtitle text into timed segments.
///
/// Blocks look like `[index line?] [start --> end] [text lines]`, separated
/// by blank lines or the next timestamp line. Header/title blocks before the
/// first timestamp (a `WEBVTT` line, notes) are skipped. Malformed blocks
/// are dropped individually; the rest of the input still parses.
///
/// Segments come out in source order. Out-of-order source timestamps stay
/// out of order.
pub fn parse_cues(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_block(&mut block, &mut segments);
        } else if is_time_line(trimmed) && block.iter().any(|l| is_time_line(l)) {
            // A new timestamp ends the previous block even without a blank
            // separator line.
            flush_block(&mut block, &mut segments);
            block.push(trimmed);
        } else {
            block.push(trimmed);
        }
    }
    flush_block(&mut block, &mut segments);

    segments
}

fn flush_block(block: &mut Vec<&str>, out: &mut Vec<Segment>) {
    if block.is_empty() {
        return;
    }
    match parse_cue_block(block) {
        Ok(Some(segment)) => out.push(segment),
        Ok(None) => {}
        Err(e) => tracing::debug!("dropping malformed cue block: {e}"),
    }
    block.clear();
}

/// Parse one block of non-empty lines. `Ok(None)` marks a header/title block
/// with no timestamp line, which is skipped rather than dropped-with-error.
fn parse_cue_block(lines: &[&str]) -> Result<Option<Segment>, ParseError> {
    let Some(pos) = lines.iter().position(|l| is_time_line(l)) else {
        return Ok(None);
    };
    let (start_secs, end_secs) = parse_time_range(lines[pos])?;

    // Everything before the timestamp line is a cue index or stray header
    // text; everything after is cue text.
    let text = lines[pos + 1..].join(" ");
    if text.is_empty() {
        return Err(ParseError::EmptyCue);
    }

    Ok(Some(Segment::new(text, start_secs, end_secs)))
}

fn is_time_line(line: &str) -> bool {
    line.contains("-->")
}

fn parse_time_range(line: &str) -> Result<(f64, f64), ParseError> {
    let mut parts = line.splitn(2, "-->");
    let start = parts.next().unwrap_or_default().trim();
    let end = parts
        .next()
        .ok_or_else(|| ParseError::InvalidTimeRange(line.to_string()))?
        .trim();
    // Cue settings may trail the end timestamp; they end at the first space.
    let end = end.split_whitespace().next().unwrap_or_default();

    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

/// Parse a `HH:MM:SS.mmm` token into seconds. The fractional part is
/// optional and scaled by its digit count.
fn parse_timestamp(token: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidTimestamp(token.to_string());

    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
    let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;

    let mut sec_parts = parts[2].splitn(2, '.');
    let seconds: u64 = sec_parts
        .next()
        .unwrap_or_default()
        .parse()
        .map_err(|_| invalid())?;
    let millis = match sec_parts.next() {
        Some(frac) if !frac.is_empty() => {
            let raw: u64 = frac.parse().map_err(|_| invalid())?;
            match frac.len() {
                1 => raw * 100,
                2 => raw * 10,
                3 => raw,
                n => raw / 10u64.pow(n as u32 - 3),
            }
        }
        _ => 0,
    };

    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

/// Parse a plain script: lines are trimmed, empty lines discarded, and the
/// remainder consumed in pairs of primary text then translation. A trailing
/// unpaired line is dropped without emitting a partial pair.
pub fn parse_script(content: &str) -> Vec<ScriptPair> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .chunks_exact(2)
        .map(|pair| ScriptPair {
            text: pair[0].to_string(),
            translation: pair[1].to_string(),
        })
        .collect()
}

/// Attach script translations to cues by position: cue `i` receives pair
/// `i`'s translation. Excess items on either side are ignored.
pub fn zip_translations(cues: Vec<Segment>, pairs: &[ScriptPair]) -> Vec<Segment> {
    cues.into_iter()
        .enumerate()
        .map(|(i, mut segment)| {
            if let Some(pair) = pairs.get(i) {
                segment.translation = Some(pair.translation.clone());
            }
            segment
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:01:23.456").unwrap(), 83.456);
        assert_eq!(parse_timestamp("01:00:00.000").unwrap(), 3600.0);
    }

    #[test]
    fn test_parse_timestamp_fraction_optional_and_scaled() {
        assert_eq!(parse_timestamp("00:00:02").unwrap(), 2.0);
        assert_eq!(parse_timestamp("00:00:02.5").unwrap(), 2.5);
        assert_eq!(parse_timestamp("00:00:02.50").unwrap(), 2.5);
        assert_eq!(parse_timestamp("00:00:02.500").unwrap(), 2.5);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("1:23").is_err());
        assert!(parse_timestamp("aa:bb:cc").is_err());
        assert!(parse_timestamp("00:00:xx.000").is_err());
    }

    #[test]
    fn test_two_cue_round_trip() {
        let input = "00:00:00.000 --> 00:00:02.000\nGuten Tag!\n\n00:00:02.000 --> 00:00:04.000\nWie geht es Ihnen?";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Guten Tag!");
        assert_eq!(segments[0].start_secs, 0.0);
        assert_eq!(segments[0].end_secs, 2.0);
        assert_eq!(segments[1].text, "Wie geht es Ihnen?");
        assert_eq!(segments[1].start_secs, 2.0);
        assert_eq!(segments[1].end_secs, 4.0);
    }

    #[test]
    fn test_header_and_index_lines_skipped() {
        let input = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\nHallo\n\n2\n00:00:01.000 --> 00:00:02.000\nWelt";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hallo");
        assert_eq!(segments[1].text, "Welt");
    }

    #[test]
    fn test_malformed_block_dropped_not_fatal() {
        let input = "00:00:xx.000 --> 00:00:01.000\nkaputt\n\n00:00:01.000 --> 00:00:02.000\nheil";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "heil");
    }

    #[test]
    fn test_cue_without_text_dropped() {
        let input = "00:00:00.000 --> 00:00:01.000\n\n00:00:01.000 --> 00:00:02.000\nText";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Text");
    }

    #[test]
    fn test_multiline_text_joined_with_space() {
        let input = "00:00:00.000 --> 00:00:03.000\nErste Zeile\nzweite Zeile";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Erste Zeile zweite Zeile");
    }

    #[test]
    fn test_consecutive_timestamps_without_blank_separator() {
        let input = "00:00:00.000 --> 00:00:01.000\nEins\n00:00:01.000 --> 00:00:02.000\nZwei";
        let segments = parse_cues(input);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Eins");
        assert_eq!(segments[1].text, "Zwei");
    }

    #[test]
    fn test_out_of_order_source_preserved() {
        let input = "00:00:05.000 --> 00:00:06.000\nSpät\n\n00:00:01.000 --> 00:00:02.000\nFrüh";
        let segments = parse_cues(input);
        assert_eq!(segments[0].text, "Spät");
        assert_eq!(segments[1].text, "Früh");
    }

    #[test]
    fn test_script_pairs() {
        let pairs = parse_script("Hello\nXin chào\nGoodbye\nTạm biệt\nOrphan");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].text, "Hello");
        assert_eq!(pairs[0].translation, "Xin chào");
        assert_eq!(pairs[1].text, "Goodbye");
        assert_eq!(pairs[1].translation, "Tạm biệt");
    }

    #[test]
    fn test_script_blank_lines_discarded_before_pairing() {
        let pairs = parse_script("  Hello  \n\n\nXin chào\n");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].text, "Hello");
        assert_eq!(pairs[0].translation, "Xin chào");
    }

    #[test]
    fn test_zip_translations_by_index() {
        let cues = vec![
            Segment::new("Guten Tag!", 0.0, 2.0),
            Segment::new("Wie geht es Ihnen?", 2.0, 4.0),
        ];
        let pairs = parse_script("Guten Tag!\nGood day!\nWie geht es Ihnen?\nHow are you?");
        let zipped = zip_translations(cues, &pairs);
        assert_eq!(zipped[0].translation.as_deref(), Some("Good day!"));
        assert_eq!(zipped[1].translation.as_deref(), Some("How are you?"));
    }

    #[test]
    fn test_zip_excess_on_either_side_ignored() {
        let cues = vec![
            Segment::new("Eins", 0.0, 1.0),
            Segment::new("Zwei", 1.0, 2.0),
        ];
        let one_pair = parse_script("Eins\nOne");
        let zipped = zip_translations(cues.clone(), &one_pair);
        assert_eq!(zipped.len(), 2);
        assert_eq!(zipped[0].translation.as_deref(), Some("One"));
        assert!(zipped[1].translation.is_none());

        let three_pairs = parse_script("Eins\nOne\nZwei\nTwo\nDrei\nThree");
        let zipped = zip_translations(cues, &three_pairs);
        assert_eq!(zipped.len(), 2);
    }
}
