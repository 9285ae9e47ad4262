// src/cli.rs

use clap::Parser;

pub mod handlers;

/// requote: escapes stray delimiters inside embedded text blocks.
///
/// `requote` accepts two calling styles:
///
/// 1. COMMAND MODE:
///    The first argument names a system command.
///
///    Valid formats:
///    - `requote escape <file> [flags...]`
///    - `requote locate <file> [flags...]`
///    - `requote check <file> [flags...]`
///
/// 2. FILE SHORTCUT:
///    If the first argument is not a known command, it is treated as the
///    target file of an `escape` run.
///
///    - `requote notes.js` -> expands to `requote escape notes.js`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The first positional argument.
    ///
    /// Either the name of a system command (`escape`, `locate`, `check`) or,
    /// as a shortcut, the path of the file to escape.
    pub command_or_file: Option<String>,

    /// All remaining arguments, passed through to the selected handler.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
