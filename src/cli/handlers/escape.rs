// src/cli/handlers/escape.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{
    cli::handlers::commons::{self, OutputFormat, RegionArgs},
    core::rewriter,
    models::EscapeReport,
    system::file_io,
};

// --- Command Argument Parsing ---
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Escapes stray delimiters inside the target block and rewrites the file in place."
)]
struct EscapeArgs {
    #[command(flatten)]
    region: RegionArgs,

    /// Run the full transformation and report, but leave the file untouched.
    #[arg(long)]
    dry_run: bool,

    /// Show the summary and ask for confirmation before writing.
    #[arg(long, conflicts_with = "dry_run")]
    interactive: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

// --- Main Handler ---
pub fn handle(args: Vec<String>) -> Result<()> {
    let escape_args = EscapeArgs::try_parse_from(&args)?;
    let text_mode = escape_args.output == OutputFormat::Text;

    // 1. Read the target file.
    let path = commons::resolve_file(&escape_args.region.file)?;
    let display_path = dunce::simplified(&path).display().to_string();
    let buffer = commons::read_target(&path)?;

    // 2. Locate the block and run the escape pass. Any failure here leaves
    //    the file on disk exactly as it was.
    let request = commons::build_request(&escape_args.region, &buffer)?;
    let outcome = rewriter::escape_region(&buffer, &request)
        .with_context(|| format!("Cannot escape '{}'", display_path))?;

    let mut report = EscapeReport {
        file: display_path.clone(),
        content_start: outcome.region.start(),
        end_pos: outcome.region.end(),
        escaped: outcome.escaped,
        length_delta: outcome.length_delta,
        written: false,
    };

    // 3. Handle a no-op run gracefully: nothing to write.
    if outcome.escaped == 0 {
        if text_mode {
            println!(
                "\n{}",
                format!("'{}' is already fully escaped.", display_path).yellow()
            );
        }
        return commons::emit_escape_report(&report, escape_args.output);
    }

    // 4. Dry run: report the would-be result and stop.
    if escape_args.dry_run {
        if text_mode {
            println!(
                "\n{} {}",
                "Dry run:".yellow().bold(),
                "the file was not modified."
            );
        }
        return commons::emit_escape_report(&report, escape_args.output);
    }

    // 5. Optional confirmation before touching the file.
    if escape_args.interactive && !confirm_write(&display_path, outcome.escaped)? {
        if text_mode {
            println!("\n{}", "Operation cancelled.".yellow());
        }
        return commons::emit_escape_report(&report, escape_args.output);
    }

    // 6. Atomically replace the file with the escaped buffer.
    file_io::write_atomic(&path, &outcome.buffer)
        .with_context(|| format!("Failed to write '{}'", display_path))?;
    report.written = true;

    // 7. Provide clear feedback.
    if text_mode {
        println!("\n{}", "Success!".green().bold());
    }
    commons::emit_escape_report(&report, escape_args.output)
}

fn confirm_write(display_path: &str, escaped: usize) -> Result<bool> {
    let prompt = format!(
        "Escape {} delimiter(s) in '{}' and overwrite it?",
        escaped, display_path
    );
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

// MARK: --- UNIT TESTS ---
