// src/cli/handlers/check.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::handlers::commons::{self, OutputFormat, RegionArgs},
    core::{escaper, rewriter},
    models::RegionReport,
};

// --- Command Argument Parsing ---
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Verifies that the target block contains no unescaped delimiters."
)]
struct CheckArgs {
    #[command(flatten)]
    region: RegionArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

// --- Main Handler ---
pub fn handle(args: Vec<String>) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;

    let path = commons::resolve_file(&check_args.region.file)?;
    let display_path = dunce::simplified(&path).display().to_string();
    let buffer = commons::read_target(&path)?;

    let request = commons::build_request(&check_args.region, &buffer)?;
    let region = rewriter::locate_region(&buffer, &request)
        .with_context(|| format!("Cannot locate the block in '{}'", display_path))?;

    let unescaped = escaper::count_unescaped(
        region.slice(&buffer),
        request.delimiter,
        request.escape_char,
    );
    let report = RegionReport {
        file: display_path.clone(),
        content_start: region.start(),
        end_pos: region.end(),
        region_len: region.len(),
        unescaped,
    };
    commons::emit_region_report(&report, check_args.output)?;

    // The verdict drives the exit code: any unescaped delimiter fails the run.
    if unescaped > 0 {
        return Err(anyhow!(
            "'{}' has {} unescaped delimiter(s) in the target block.",
            display_path,
            unescaped
        ));
    }
    if check_args.output == OutputFormat::Text {
        println!("\n{}", "All delimiters are escaped.".green().bold());
    }
    Ok(())
}
