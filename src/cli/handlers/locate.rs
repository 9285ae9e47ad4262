// src/cli/handlers/locate.rs

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::handlers::commons::{self, OutputFormat, RegionArgs},
    core::{escaper, rewriter},
    models::RegionReport,
};

// --- Command Argument Parsing ---
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Locates the target block and reports its offsets. Never writes."
)]
struct LocateArgs {
    #[command(flatten)]
    region: RegionArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

// --- Main Handler ---
pub fn handle(args: Vec<String>) -> Result<()> {
    let locate_args = LocateArgs::try_parse_from(&args)?;

    let path = commons::resolve_file(&locate_args.region.file)?;
    let display_path = dunce::simplified(&path).display().to_string();
    let buffer = commons::read_target(&path)?;

    let request = commons::build_request(&locate_args.region, &buffer)?;
    let region = rewriter::locate_region(&buffer, &request)
        .with_context(|| format!("Cannot locate the block in '{}'", display_path))?;

    let report = RegionReport {
        file: display_path,
        content_start: region.start(),
        end_pos: region.end(),
        region_len: region.len(),
        unescaped: escaper::count_unescaped(
            region.slice(&buffer),
            request.delimiter,
            request.escape_char,
        ),
    };
    commons::emit_region_report(&report, locate_args.output)
}
