//! # Rewriter
//!
//! The pure transformation at the heart of the tool: locate the quoted block
//! between the start marker and the first matching end rule, escape every
//! unescaped delimiter inside it, and splice the result back into the
//! buffer. No I/O happens here; persisting the returned buffer is the
//! caller's responsibility.

use crate::{
    core::{
        escaper,
        locator::{self, LocateError},
        region::{Region, RegionError},
    },
    models::EscapeRequest,
};
use thiserror::Error;

/// Errors raised by the transformation. All of them leave the input buffer
/// untouched; there is no partial result to recover.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EscapeRegionError {
    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),
    #[error("Region error: {0}")]
    Region(#[from] RegionError),
}

/// The result of one successful transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeOutcome {
    /// The reassembled buffer, ready to be written back.
    pub buffer: String,
    /// The transformed span, in byte offsets of the *input* buffer.
    pub region: Region,
    /// Number of delimiters that received an escape character.
    pub escaped: usize,
    /// Bytes added relative to the input buffer.
    pub length_delta: usize,
}

/// Locates the region described by `request` without transforming anything.
///
/// The region starts immediately after the first occurrence of
/// `request.start_marker` at or past `request.region_after`, and ends at the
/// closing delimiter found by the first matching end rule.
pub fn locate_region(buffer: &str, request: &EscapeRequest) -> Result<Region, EscapeRegionError> {
    // 1. Start marker, then the content right after it.
    let marker_pos = locator::find_marker(buffer, &request.start_marker, request.region_after)?;
    let content_start = marker_pos + request.start_marker.len();

    // 2. Closing delimiter via the ordered rule chain.
    let end_pos = locator::find_region_end(
        buffer,
        content_start,
        request.delimiter,
        &request.end_rules,
        request.search_window,
    )?;

    Ok(Region::new(content_start, end_pos, buffer)?)
}

/// Runs the full escape transformation described by `request` against
/// `buffer` and returns the reassembled buffer together with its statistics.
///
/// Everything outside the located region is carried over byte for byte; the
/// region itself is rewritten by a single escape pass (see
/// [`escaper::escape_unescaped`] for the exact escaping rule).
///
/// # Errors
/// `MarkerNotFound` / `RegionEndNotFound` when the buffer does not contain
/// the expected shape; both carry the marker and search range involved.
pub fn escape_region(
    buffer: &str,
    request: &EscapeRequest,
) -> Result<EscapeOutcome, EscapeRegionError> {
    let region = locate_region(buffer, request)?;
    let content = region.slice(buffer);

    let (escaped_content, escaped) =
        escaper::escape_unescaped(content, request.delimiter, request.escape_char);
    let rebuilt = region.splice(buffer, &escaped_content);
    let length_delta = rebuilt.len() - buffer.len();

    log::debug!(
        "Escaped {} delimiter(s) in region {}..{} ({} bytes added).",
        escaped,
        region.start(),
        region.end(),
        length_delta
    );

    Ok(EscapeOutcome {
        buffer: rebuilt,
        region,
        escaped,
        length_delta,
    })
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EndRule;

    /// A miniature of the kind of file the tool is pointed at: an object
    /// whose `prompt` value is a template literal with stray backticks.
    const SOURCE: &str = "\
const PROMPTS = {
    intro: {
        prompt: `Use `npm install` to begin.
Then check `package.json` for scripts.
`
    }
};
";

    fn request() -> EscapeRequest {
        let mut request = EscapeRequest::new("prompt: `");
        request.end_rules = EndRule::default_chain('}', None);
        request
    }

    #[test]
    fn test_escapes_the_embedded_block() {
        let outcome = escape_region(SOURCE, &request()).unwrap();
        assert!(outcome.buffer.contains(r"Use \`npm install\` to begin."));
        assert!(outcome.buffer.contains(r"check \`package.json\` for scripts."));
        // The four backticks inside the block are escaped; the closing
        // backtick marks the region end and stays bare.
        assert_eq!(outcome.escaped, 4);
    }

    #[test]
    fn test_everything_outside_the_region_is_untouched() {
        let outcome = escape_region(SOURCE, &request()).unwrap();
        let region = outcome.region;

        assert_eq!(&outcome.buffer[..region.start()], &SOURCE[..region.start()]);
        // The suffix moved right by `length_delta` but kept its bytes.
        assert_eq!(
            &outcome.buffer[region.end() + outcome.length_delta..],
            &SOURCE[region.end()..]
        );
    }

    #[test]
    fn test_length_delta_equals_unescaped_count() {
        let outcome = escape_region(SOURCE, &request()).unwrap();
        let unescaped_before =
            escaper::count_unescaped(outcome.region.slice(SOURCE), '`', '\\');

        assert_eq!(outcome.length_delta, unescaped_before);
        assert_eq!(outcome.buffer.len(), SOURCE.len() + unescaped_before);
    }

    #[test]
    fn test_missing_start_marker_is_reported() {
        let err = escape_region("no markers here", &request()).unwrap_err();
        assert_eq!(
            err,
            EscapeRegionError::Locate(LocateError::MarkerNotFound {
                marker: "prompt: `".to_string(),
                searched_from: 0,
            })
        );
    }

    #[test]
    fn test_missing_region_end_is_reported() {
        // The marker is present but the block never closes.
        let buffer = "prompt: `runs on forever without an ending";
        let err = escape_region(buffer, &request()).unwrap_err();
        assert!(matches!(
            err,
            EscapeRegionError::Locate(LocateError::RegionEndNotFound { .. })
        ));
    }

    #[test]
    fn test_region_after_skips_an_earlier_block() {
        let buffer = "\
first: {
    prompt: `alpha ` beta`
}
second: {
    prompt: `gamma ` delta`
}
";
        // Anchor past the first block: only the second one is rewritten.
        let mut req = request();
        req.region_after = buffer.find("second").unwrap();

        let outcome = escape_region(buffer, &req).unwrap();
        assert!(outcome.buffer.contains("`alpha ` beta`"));
        assert!(outcome.buffer.contains(r"gamma \` delta"));
    }

    #[test]
    fn test_empty_region_is_a_no_op() {
        let buffer = "prompt: ``\n}";
        let outcome = escape_region(buffer, &request()).unwrap();
        assert_eq!(outcome.buffer, buffer);
        assert_eq!(outcome.escaped, 0);
        assert_eq!(outcome.length_delta, 0);
        assert!(outcome.region.is_empty());
    }

    #[test]
    fn test_pre_escaped_content_stays_singly_escaped() {
        let buffer = "prompt: `mixed \\` and ` ticks`\n}";
        let outcome = escape_region(buffer, &request()).unwrap();
        assert!(outcome.buffer.contains(r"mixed \` and \` ticks"));
        assert_eq!(outcome.escaped, 1);
        assert_eq!(outcome.length_delta, 1);
    }
}
