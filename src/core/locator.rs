// src/core/locator.rs

use crate::models::EndRule;
use regex::Regex;
use thiserror::Error;

/// Errors raised while locating the region to transform.
///
/// Both are terminal: they mean the buffer no longer matches the expected
/// shape and needs human re-inspection, not an automatic retry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocateError {
    #[error("Marker '{marker}' not found at or after byte offset {searched_from}.")]
    MarkerNotFound { marker: String, searched_from: usize },
    #[error(
        "No end rule matched at or after byte offset {searched_from}: {rules_tried} rule(s) tried, search window {}.",
        window_text(.search_window)
    )]
    RegionEndNotFound {
        searched_from: usize,
        rules_tried: usize,
        search_window: Option<usize>,
    },
}

fn window_text(window: &Option<usize>) -> String {
    match window {
        Some(bytes) => format!("{} bytes", bytes),
        None => "unbounded".to_string(),
    }
}

/// Byte offset of the first occurrence of `marker` at or after `from`.
///
/// An offset past the end of the buffer, or one that does not fall on a
/// character boundary, finds nothing and reports `MarkerNotFound`.
pub fn find_marker(buffer: &str, marker: &str, from: usize) -> Result<usize, LocateError> {
    let not_found = || LocateError::MarkerNotFound {
        marker: marker.to_string(),
        searched_from: from,
    };

    let tail = buffer.get(from..).ok_or_else(not_found)?;
    let position = tail.find(marker).map(|pos| from + pos).ok_or_else(not_found)?;

    log::debug!(
        "Marker '{}' found at byte offset {} (searched from {}).",
        marker,
        position,
        from
    );
    Ok(position)
}

/// Finds the exclusive end of the region: the position of the closing
/// delimiter, determined by the first rule in `rules` that matches.
///
/// Every rule considers only its *first* match at or after `content_start`.
/// When `search_window` is set, a rule whose reported end position lies
/// more than that many bytes past `content_start` is treated as not
/// matching at all, and the next rule is consulted. The bound applies to
/// the delimiter position itself, not to where a rule's pattern begins.
pub fn find_region_end(
    buffer: &str,
    content_start: usize,
    delimiter: char,
    rules: &[EndRule],
    search_window: Option<usize>,
) -> Result<usize, LocateError> {
    let not_found = || LocateError::RegionEndNotFound {
        searched_from: content_start,
        rules_tried: rules.len(),
        search_window,
    };

    let tail = buffer.get(content_start..).ok_or_else(not_found)?;

    for rule in rules {
        let Some(offset) = match_end_rule(rule, tail, delimiter) else {
            log::debug!("End rule {:?} did not match.", rule);
            continue;
        };

        if let Some(window) = search_window
            && offset > window
        {
            log::debug!(
                "End rule {:?} matched {} bytes past the region start, beyond the {} byte window; discarding.",
                rule,
                offset,
                window
            );
            continue;
        }

        let end_pos = content_start + offset;
        log::debug!("End rule {:?} matched at byte offset {}.", rule, end_pos);
        return Ok(end_pos);
    }

    Err(not_found())
}

/// Position (relative to `tail`) of the closing delimiter according to one
/// rule, or `None` when the rule does not apply.
fn match_end_rule(rule: &EndRule, tail: &str, delimiter: char) -> Option<usize> {
    match rule {
        EndRule::DelimiterThenClose { close } => structural_end(tail, delimiter, *close, false),
        EndRule::DelimiterThenCloseComma { close } => structural_end(tail, delimiter, *close, true),
        EndRule::FallbackLiteral(literal) => literal_end(tail, literal, delimiter),
    }
}

/// Matches the delimiter followed by a line break (amid optional whitespace)
/// and the closing character, e.g. `` `\n    } ``. The match position is the
/// delimiter itself, not the closing character.
fn structural_end(tail: &str, delimiter: char, close: char, trailing_comma: bool) -> Option<usize> {
    let mut pattern = format!(
        r"{}\s*\n\s*{}",
        regex::escape(&delimiter.to_string()),
        regex::escape(&close.to_string())
    );
    if trailing_comma {
        pattern.push(',');
    }

    let re = Regex::new(&pattern).expect("pattern built from escaped literals is always valid");
    re.find(tail).map(|m| m.start())
}

/// Matches an explicit literal near the region end. Two shapes are accepted:
/// a literal whose final character is the closing delimiter itself, and a
/// literal sitting immediately before it. In both cases the reported
/// position is that of the delimiter.
fn literal_end(tail: &str, literal: &str, delimiter: char) -> Option<usize> {
    if literal.is_empty() {
        return None;
    }

    let found = tail.find(literal)?;
    let after = found + literal.len();

    if literal.ends_with(delimiter) {
        return Some(after - delimiter.len_utf8());
    }
    if tail[after..].starts_with(delimiter) {
        return Some(after);
    }

    log::debug!(
        "Fallback literal found at relative offset {} but no delimiter adjoins it.",
        found
    );
    None
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> Vec<EndRule> {
        vec![
            EndRule::DelimiterThenClose { close: '}' },
            EndRule::DelimiterThenCloseComma { close: '}' },
        ]
    }

    // --- `find_marker` Tests ---

    #[test]
    fn test_find_marker_first_occurrence_wins() {
        let buffer = "xx MARK yy MARK zz";
        assert_eq!(find_marker(buffer, "MARK", 0).unwrap(), 3);
    }

    #[test]
    fn test_find_marker_honors_search_offset() {
        let buffer = "xx MARK yy MARK zz";
        // Strictly after the first occurrence: the second one is selected.
        assert_eq!(find_marker(buffer, "MARK", 4).unwrap(), 11);
        // At the first occurrence: "at or after" keeps it.
        assert_eq!(find_marker(buffer, "MARK", 3).unwrap(), 3);
    }

    #[test]
    fn test_find_marker_missing_reports_context() {
        let err = find_marker("nothing here", "MARK", 5).unwrap_err();
        assert_eq!(
            err,
            LocateError::MarkerNotFound {
                marker: "MARK".to_string(),
                searched_from: 5,
            }
        );
    }

    #[test]
    fn test_find_marker_offset_past_end_finds_nothing() {
        let err = find_marker("short", "MARK", 99).unwrap_err();
        assert!(matches!(err, LocateError::MarkerNotFound { .. }));
    }

    // --- End Rule Tests ---

    #[test]
    fn test_structural_rule_stops_at_the_delimiter() {
        // The end position is the backtick, not the closing brace.
        let buffer = "prompt: `body text`\n    }";
        let end = find_region_end(buffer, 9, '`', &default_rules(), None).unwrap();
        assert_eq!(end, 18);
        assert_eq!(&buffer[end..end + 1], "`");
    }

    #[test]
    fn test_structural_rule_with_trailing_comma() {
        let buffer = "key: `text`\n},\nnext: 1";
        let rules = vec![EndRule::DelimiterThenCloseComma { close: '}' }];
        let end = find_region_end(buffer, 6, '`', &rules, None).unwrap();
        assert_eq!(end, 10);
    }

    #[test]
    fn test_first_match_wins_within_a_rule() {
        // Two candidate endings; the earlier one is taken.
        let buffer = "`one`\n}`two`\n}";
        let end = find_region_end(buffer, 1, '`', &default_rules(), None).unwrap();
        assert_eq!(end, 4);
    }

    #[test]
    fn test_rules_are_tried_in_priority_order() {
        // The fallback literal occurs earlier in the buffer, but the
        // structural rule comes first in the chain and wins.
        let buffer = "THE END` middle `\n}";
        let rules = vec![
            EndRule::DelimiterThenClose { close: '}' },
            EndRule::FallbackLiteral("THE END`".to_string()),
        ];
        let end = find_region_end(buffer, 0, '`', &rules, None).unwrap();
        assert_eq!(end, 16);
    }

    #[test]
    fn test_fallback_literal_carrying_the_delimiter() {
        let buffer = "body body END OF PROMPT\n` trailing";
        let rules = vec![EndRule::FallbackLiteral("END OF PROMPT\n`".to_string())];
        let end = find_region_end(buffer, 0, '`', &rules, None).unwrap();
        // The literal's final character is the delimiter; the region ends there.
        assert_eq!(end, 24);
        assert_eq!(&buffer[end..end + 1], "`");
    }

    #[test]
    fn test_fallback_literal_preceding_the_delimiter() {
        let buffer = "body body END OF PROMPT` trailing";
        let rules = vec![EndRule::FallbackLiteral("END OF PROMPT".to_string())];
        let end = find_region_end(buffer, 0, '`', &rules, None).unwrap();
        assert_eq!(end, 23);
        assert_eq!(&buffer[end..end + 1], "`");
    }

    #[test]
    fn test_fallback_literal_with_no_adjacent_delimiter_fails() {
        let buffer = "body body END OF PROMPT trailing";
        let rules = vec![EndRule::FallbackLiteral("END OF PROMPT".to_string())];
        let err = find_region_end(buffer, 0, '`', &rules, None).unwrap_err();
        assert_eq!(
            err,
            LocateError::RegionEndNotFound {
                searched_from: 0,
                rules_tried: 1,
                search_window: None,
            }
        );
    }

    #[test]
    fn test_no_rule_matches_reports_all_rules_tried() {
        let err = find_region_end("plain text", 0, '`', &default_rules(), None).unwrap_err();
        assert_eq!(
            err,
            LocateError::RegionEndNotFound {
                searched_from: 0,
                rules_tried: 2,
                search_window: None,
            }
        );
    }

    // --- Search Window Tests ---

    #[test]
    fn test_search_window_rejects_distant_match() {
        let buffer = format!("{}`\n{}", "x".repeat(100), "}");
        let err = find_region_end(&buffer, 0, '`', &default_rules(), Some(50)).unwrap_err();
        assert!(matches!(
            err,
            LocateError::RegionEndNotFound {
                search_window: Some(50),
                ..
            }
        ));

        // A window large enough accepts the same match.
        let end = find_region_end(&buffer, 0, '`', &default_rules(), Some(100)).unwrap();
        assert_eq!(end, 100);
    }

    #[test]
    fn test_search_window_falls_through_to_a_closer_rule() {
        // The structural ending lies beyond the window, but the fallback
        // literal sits within it and still resolves the region.
        let buffer = format!("short STOP` {}`\n{}", "y".repeat(80), "}");
        let rules = vec![
            EndRule::DelimiterThenClose { close: '}' },
            EndRule::FallbackLiteral("STOP".to_string()),
        ];
        let end = find_region_end(&buffer, 0, '`', &rules, Some(20)).unwrap();
        assert_eq!(end, 10);
    }

    #[test]
    fn test_search_window_bounds_the_delimiter_position() {
        // The fallback literal begins well within the window, but the
        // delimiter it resolves to lies beyond it; the bound applies to
        // the delimiter position, not the literal's start.
        let literal = "L".repeat(40);
        let buffer = format!("xx{}` tail", literal);
        let rules = vec![EndRule::FallbackLiteral(literal)];

        let err = find_region_end(&buffer, 0, '`', &rules, Some(10)).unwrap_err();
        assert!(matches!(err, LocateError::RegionEndNotFound { .. }));

        // A window that reaches the delimiter accepts the same match.
        let end = find_region_end(&buffer, 0, '`', &rules, Some(42)).unwrap();
        assert_eq!(end, 42);
        assert_eq!(&buffer[end..end + 1], "`");
    }
}
