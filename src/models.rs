// src/models.rs

use serde::Serialize;

use crate::constants::{DEFAULT_CLOSE_CHAR, DEFAULT_DELIMITER, DEFAULT_ESCAPE_CHAR};

// --- END-DETECTION RULES ---

/// A single rule for detecting where the quoted block ends.
///
/// Rules are tried in the order they appear in `EscapeRequest::end_rules`;
/// each one reports the byte position of the closing delimiter, which becomes
/// the exclusive end of the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndRule {
    /// The delimiter, a line break amid optional whitespace, then the
    /// closing character of the enclosing structure (e.g. `` `\n    } ``).
    DelimiterThenClose { close: char },
    /// Like `DelimiterThenClose`, but with a trailing comma after the
    /// closing character (the block is not the last entry of its parent).
    DelimiterThenCloseComma { close: char },
    /// A literal observed to sit immediately before the closing delimiter,
    /// or to carry it as its final character. A last resort for blocks whose
    /// end is not followed by a recognizable structural token.
    FallbackLiteral(String),
}

impl EndRule {
    /// Builds the default rule chain in priority order: the two structural
    /// rules first, then the fallback literal when one is supplied.
    pub fn default_chain(close: char, fallback: Option<String>) -> Vec<Self> {
        let mut rules = vec![
            Self::DelimiterThenClose { close },
            Self::DelimiterThenCloseComma { close },
        ];
        if let Some(literal) = fallback {
            rules.push(Self::FallbackLiteral(literal));
        }
        rules
    }
}

// --- TRANSFORMATION REQUEST ---

/// Everything one escaping run needs to know, minus the buffer itself.
///
/// `region_after` is the byte offset at which the search for `start_marker`
/// begins; the region itself starts immediately after the marker's first
/// occurrence at or past that offset.
#[derive(Debug, Clone)]
pub struct EscapeRequest {
    pub start_marker: String,
    pub region_after: usize,
    pub delimiter: char,
    pub escape_char: char,
    pub end_rules: Vec<EndRule>,
    /// Maximum distance in bytes between the region start and the position
    /// where an end rule may match. `None` leaves the search unbounded.
    pub search_window: Option<usize>,
}

impl EscapeRequest {
    /// A request with the stock delimiters and the default rule chain.
    pub fn new(start_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            region_after: 0,
            delimiter: DEFAULT_DELIMITER,
            escape_char: DEFAULT_ESCAPE_CHAR,
            end_rules: EndRule::default_chain(DEFAULT_CLOSE_CHAR, None),
            search_window: None,
        }
    }
}

// --- REPORTS ---

/// The outcome of an `escape` run, as printed or serialized for the user.
#[derive(Serialize, Debug, Clone)]
pub struct EscapeReport {
    pub file: String,
    pub content_start: usize,
    pub end_pos: usize,
    /// Number of delimiters that received an escape character.
    pub escaped: usize,
    /// Bytes added to the file by the inserted escape characters.
    pub length_delta: usize,
    pub written: bool,
}

/// The outcome of a `locate` or `check` run. Read-only: nothing is written.
#[derive(Serialize, Debug, Clone)]
pub struct RegionReport {
    pub file: String,
    pub content_start: usize,
    pub end_pos: usize,
    pub region_len: usize,
    /// Number of delimiters in the region not yet preceded by the escape
    /// character.
    pub unescaped: usize,
}
