// src/bin/requote.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use requote::cli::{Cli, handlers};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its handler function.
/// The handler signature is kept consistent across all commands for
/// simplicity in the registry.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all system commands.
/// To add a new command, simply add a new entry to this static array.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "check",
        aliases: &[],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "escape",
        aliases: &["fix"],
        handler: handlers::escape::handle,
    },
    CommandDefinition {
        name: "locate",
        aliases: &["find"],
        handler: handlers::locate::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point of the `requote` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // For all errors, print a formatted message to stderr and exit with
        // a failure code.
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// The main application dispatcher.
///
/// The first argument is either a registered command name or, as a shortcut,
/// the path of the file to escape; anything that is not a known command is
/// routed to the `escape` handler as its file argument.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let Some(first) = cli.command_or_file else {
        return Err(anyhow!("No command or file given. See 'requote --help'."));
    };

    if let Some(command) = find_command(&first) {
        // A known system command was found. Execute its handler.
        (command.handler)(cli.args)
    } else {
        // Not a system command: treat it as the target file of an `escape`
        // run, keeping every remaining flag.
        let mut escape_args = vec![first];
        escape_args.extend(cli.args);
        handlers::escape::handle(escape_args)
    }
}
