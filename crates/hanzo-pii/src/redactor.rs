//! Redaction engine
//!
//! Replaces matched spans with `[ENTITY_TYPE]` markers. Overlaps are settled
//! before splicing:
//!
//! 1. a match lying inside an existing marker is dropped, and one that
//!    straddles a marker is cut into the pieces outside it, so markers are
//!    never rewritten and text around them is still redacted;
//! 2. zero-width matches are dropped;
//! 3. a match fully contained in another one is dropped (for identical spans
//!    the higher confidence wins, then the smaller entity name);
//! 4. the survivors are spliced right to left, and a match that runs into
//!    the region already replaced is clipped at its start.

use crate::error::{PiiError, Result};
use crate::types::{EntityMatch, RedactionResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Z][A-Z0-9_]*\]").expect("marker pattern is valid"));

/// Marker inserted for an entity type
pub fn marker(entity_type: &str) -> String {
    format!("[{}]", entity_type.to_uppercase())
}

/// Whether `text` contains a redaction marker
pub fn contains_marker(text: &str) -> bool {
    MARKER.is_match(text)
}

/// Byte spans of every marker in `text`, in order
pub fn marker_spans(text: &str) -> Vec<(usize, usize)> {
    MARKER.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

/// `text` with each marker overwritten by underscores of the same length.
///
/// Offsets are preserved, and a marker reads as one opaque word to the
/// patterns, so it neither matches nor opens a word boundary next to it.
pub fn mask_markers<'a>(text: &'a str, markers: &[(usize, usize)]) -> Cow<'a, str> {
    if markers.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut masked = String::with_capacity(text.len());
    let mut cursor = 0;
    for &(start, end) in markers {
        masked.push_str(&text[cursor..start]);
        masked.extend(std::iter::repeat('_').take(end - start));
        cursor = end;
    }
    masked.push_str(&text[cursor..]);
    Cow::Owned(masked)
}

/// Parts of `m` outside every marker
fn outside_markers(text: &str, m: &EntityMatch, markers: &[(usize, usize)]) -> Vec<EntityMatch> {
    let mut pieces = Vec::new();
    let mut start = m.start;
    for &(marker_start, marker_end) in markers {
        if marker_end <= start || marker_start >= m.end {
            continue;
        }
        if marker_start > start {
            pieces.push(piece(text, m, start, marker_start));
        }
        start = start.max(marker_end);
    }
    if start < m.end {
        pieces.push(piece(text, m, start, m.end));
    }
    pieces
}

fn piece(text: &str, m: &EntityMatch, start: usize, end: usize) -> EntityMatch {
    EntityMatch {
        start,
        end,
        matched_text: text[start..end].to_string(),
        ..m.clone()
    }
}

fn check_span(text: &str, m: &EntityMatch) -> Result<()> {
    let valid = m.start <= m.end
        && m.end <= text.len()
        && text.is_char_boundary(m.start)
        && text.is_char_boundary(m.end);
    if valid {
        Ok(())
    } else {
        Err(PiiError::InvalidSpan {
            entity_type: m.entity_type.clone(),
            start: m.start,
            end: m.end,
            len: text.len(),
        })
    }
}

/// Largest first; identical spans by confidence, then entity name
fn precedence(a: &EntityMatch, b: &EntityMatch) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
        .then_with(|| a.start.cmp(&b.start))
}

/// Matches that will be spliced, in splice order (right to left)
pub fn select(text: &str, matches: &[EntityMatch]) -> Result<Vec<EntityMatch>> {
    for m in matches {
        check_span(text, m)?;
    }

    let markers = marker_spans(text);

    let mut candidates: Vec<EntityMatch> = matches
        .iter()
        .filter(|m| m.start < m.end)
        .flat_map(|m| outside_markers(text, m, &markers))
        .collect();
    candidates.sort_by(precedence);

    let mut kept: Vec<EntityMatch> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !kept.iter().any(|k| k.contains(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.end.cmp(&a.end)));
    Ok(kept)
}

/// Replace every match in `text` with its marker
pub fn redact(text: &str, matches: &[EntityMatch]) -> Result<RedactionResult> {
    let selected = select(text, matches)?;

    let mut redacted = text.to_string();
    let mut frontier = text.len();
    for m in &selected {
        let end = m.end.min(frontier);
        if m.start >= end {
            continue;
        }
        redacted.replace_range(m.start..end, &marker(&m.entity_type));
        frontier = m.start;
    }

    let changed = redacted != text;
    Ok(RedactionResult {
        redacted_text: redacted,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(entity: &str, text: &str, start: usize, end: usize, confidence: f32) -> EntityMatch {
        EntityMatch::new(entity, text, start, end, confidence)
    }

    const CALL: &str = "call me at 415-555-0199 or email a@b.com";

    #[test]
    fn test_no_matches_is_stable() {
        let result = redact("nothing here", &[]).unwrap();
        assert_eq!(result.redacted_text, "nothing here");
        assert!(!result.changed);
    }

    #[test]
    fn test_splice_independent_of_order() {
        let phone = span("PHONE", CALL, 11, 23, 0.7);
        let email = span("EMAIL", CALL, 33, 40, 1.0);
        let expected = "call me at [PHONE] or email [EMAIL]";

        let forward = redact(CALL, &[phone.clone(), email.clone()]).unwrap();
        let backward = redact(CALL, &[email, phone]).unwrap();
        assert_eq!(forward.redacted_text, expected);
        assert_eq!(backward.redacted_text, expected);
        assert!(forward.changed);
    }

    #[test]
    fn test_identical_spans_single_marker() {
        let text = "id 123456789";
        let result = redact(
            text,
            &[
                span("US_PASSPORT", text, 3, 12, 0.4),
                span("US_SSN", text, 3, 12, 0.85),
                span("AU_TFN", text, 3, 12, 0.85),
            ],
        )
        .unwrap();
        assert_eq!(result.redacted_text, "id [AU_TFN]");
    }

    #[test]
    fn test_contained_match_dropped() {
        let text = "visit https://hanzo.ai/docs now";
        let result = redact(
            text,
            &[span("URL", text, 6, 27, 0.6), span("URL", text, 14, 22, 0.5)],
        )
        .unwrap();
        assert_eq!(result.redacted_text, "visit [URL] now");
    }

    #[test]
    fn test_partial_overlap_is_clipped() {
        let text = "abcdefghij";
        let result = redact(
            text,
            &[span("X", text, 0, 6, 0.5), span("Y", text, 4, 10, 0.5)],
        )
        .unwrap();
        assert_eq!(result.redacted_text, "[X][Y]");
    }

    #[test]
    fn test_adjacent_spans() {
        let text = "AAABBB";
        let result = redact(text, &[span("A", text, 0, 3, 0.5), span("B", text, 3, 6, 0.5)]).unwrap();
        assert_eq!(result.redacted_text, "[A][B]");
    }

    #[test]
    fn test_zero_width_is_noop() {
        let text = "hello";
        let result = redact(text, &[span("X", text, 2, 2, 0.9)]).unwrap();
        assert_eq!(result.redacted_text, "hello");
        assert!(!result.changed);
    }

    #[test]
    fn test_spans_touching_edges() {
        let text = "123-45-6789";
        let result = redact(text, &[span("US_SSN", text, 0, text.len(), 0.9)]).unwrap();
        assert_eq!(result.redacted_text, "[US_SSN]");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "naïve 123-45-6789 ✓";
        let start = text.find("123").unwrap();
        let result = redact(text, &[span("us_ssn", text, start, start + 11, 0.9)]).unwrap();
        assert_eq!(result.redacted_text, "naïve [US_SSN] ✓");
    }

    #[test]
    fn test_invalid_spans() {
        let text = "naïve";
        let mid_char = span("X", text, 3, 4, 0.5);
        let err = redact(text, &[mid_char]).unwrap_err();
        assert!(matches!(err, PiiError::InvalidSpan { .. }));
        assert!(err.is_internal());

        let past_end = EntityMatch {
            entity_type: "X".to_string(),
            start: 2,
            end: 99,
            confidence: 0.5,
            matched_text: String::new(),
            recognizer: None,
        };
        assert!(redact(text, &[past_end]).is_err());
    }

    #[test]
    fn test_existing_markers_are_left_alone() {
        let text = "call me at [PHONE] or 2";
        let result = redact(text, &[span("X", text, 12, 17, 0.9)]).unwrap();
        assert_eq!(result.redacted_text, text);
        assert!(!result.changed);
    }

    #[test]
    fn test_match_around_marker_is_cut() {
        let text = "see https://intranet.acme.com/users/[ADMIN]/jane.doe/profile";
        let result = redact(text, &[span("URL", text, 4, text.len(), 0.6)]).unwrap();
        assert_eq!(result.redacted_text, "see [URL][ADMIN][URL]");

        let again = redact(&result.redacted_text, &[]).unwrap();
        assert!(!again.changed);
    }

    #[test]
    fn test_selected_pieces_skip_markers() {
        let text = "ab[X]cd[Y]ef";
        let selected = select(text, &[span("Z", text, 0, text.len(), 0.5)]).unwrap();
        let spans: Vec<(usize, usize)> = selected.iter().map(|m| (m.start, m.end)).collect();
        assert_eq!(spans, vec![(10, 12), (5, 7), (0, 2)]);
        assert_eq!(selected[1].matched_text, "cd");
    }

    #[test]
    fn test_mask_markers() {
        let text = "id [US_SSN]7 ok";
        let markers = marker_spans(text);
        assert_eq!(markers, vec![(3, 11)]);
        assert_eq!(mask_markers(text, &markers), "id ________7 ok");
        assert!(matches!(mask_markers("plain", &[]), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_marker_format() {
        assert_eq!(marker("email_address"), "[EMAIL_ADDRESS]");
        assert!(contains_marker("x [US_SSN] y"));
        assert!(!contains_marker("x [not a marker] y"));
    }
}
