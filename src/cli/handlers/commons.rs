// src/cli/handlers/commons.rs

// This module contains shared arguments and functions used by multiple handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::{
    constants::{DEFAULT_CLOSE_CHAR, DEFAULT_DELIMITER, DEFAULT_ESCAPE_CHAR},
    core::locator,
    models::{EndRule, EscapeReport, EscapeRequest, RegionReport},
    system::file_io,
};

/// Arguments shared by every command that operates on a delimited region
/// inside a file.
#[derive(Args, Debug)]
pub struct RegionArgs {
    /// The file containing the embedded text block.
    pub file: String,

    /// Literal text that opens the block; the region starts right after it.
    #[arg(long, value_name = "TEXT")]
    pub start_marker: String,

    /// Anchor literal: search for the start marker only at or after the
    /// first occurrence of this text.
    #[arg(long, value_name = "TEXT", conflicts_with = "from")]
    pub after: Option<String>,

    /// Search for the start marker only at or after this byte offset.
    #[arg(long, value_name = "OFFSET")]
    pub from: Option<usize>,

    /// The character to escape inside the region.
    #[arg(long, value_name = "CHAR", default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// The character inserted before each unescaped delimiter.
    #[arg(long, value_name = "CHAR", default_value_t = DEFAULT_ESCAPE_CHAR)]
    pub escape_char: char,

    /// The character that closes the surrounding block in the end patterns.
    #[arg(long, value_name = "CHAR", default_value_t = DEFAULT_CLOSE_CHAR)]
    pub close_char: char,

    /// Fallback literal known to sit at the very end of the region, tried
    /// when the structural end patterns do not match.
    #[arg(long, value_name = "TEXT")]
    pub fallback: Option<String>,

    /// Reject a detected region end that lies more than this many bytes
    /// past the region start.
    #[arg(long, value_name = "BYTES")]
    pub search_window: Option<usize>,
}

/// How a command's report is rendered.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned, colored summary for terminals.
    #[default]
    Text,
    /// The report struct as pretty-printed JSON.
    Json,
}

/// Expands `~` and environment variables in a path argument.
pub fn resolve_file(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| anyhow!("Failed to expand path '{}': {}", raw, e))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Reads the target file as UTF-8, with the path in the error chain.
pub fn read_target(path: &Path) -> Result<String> {
    file_io::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", dunce::simplified(path).display()))
}

/// Builds the region request from the shared arguments.
///
/// `--from` is taken as a raw byte offset; `--after` resolves an anchor
/// literal to its own start position, so the marker search begins at the
/// anchor (the anchor text itself may contain the marker).
pub fn build_request(args: &RegionArgs, buffer: &str) -> Result<EscapeRequest> {
    if args.start_marker.is_empty() {
        return Err(anyhow!("The start marker cannot be empty."));
    }

    let region_after = match (&args.after, args.from) {
        (Some(anchor), _) => {
            if anchor.is_empty() {
                return Err(anyhow!("The anchor passed to --after cannot be empty."));
            }
            locator::find_marker(buffer, anchor, 0)
                .with_context(|| format!("Anchor '{}' not found in the file.", anchor))?
        }
        (None, Some(offset)) => {
            if !buffer.is_char_boundary(offset.min(buffer.len())) {
                return Err(anyhow!(
                    "Offset {} passed to --from is not a character boundary.",
                    offset
                ));
            }
            offset
        }
        (None, None) => 0,
    };

    let mut request = EscapeRequest::new(args.start_marker.clone());
    request.region_after = region_after;
    request.delimiter = args.delimiter;
    request.escape_char = args.escape_char;
    request.end_rules = EndRule::default_chain(args.close_char, args.fallback.clone());
    request.search_window = args.search_window;
    Ok(request)
}

/// Prints an escape report in the requested format.
pub fn emit_escape_report(report: &EscapeReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("  {:<18} {}", "File:".blue(), report.file);
    println!(
        "  {:<18} {}..{}",
        "Region:".blue(),
        report.content_start,
        report.end_pos
    );
    println!("  {:<18} {}", "Escaped:".blue(), report.escaped);
    println!("  {:<18} +{} bytes", "Length delta:".blue(), report.length_delta);
    Ok(())
}

/// Prints a locate/check report in the requested format.
pub fn emit_region_report(report: &RegionReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("  {:<18} {}", "File:".blue(), report.file);
    println!(
        "  {:<18} {}..{}",
        "Region:".blue(),
        report.content_start,
        report.end_pos
    );
    println!("  {:<18} {} bytes", "Region length:".blue(), report.region_len);
    println!("  {:<18} {}", "Unescaped:".blue(), report.unescaped);
    Ok(())
}

// MARK: --- UNIT TESTS ---
