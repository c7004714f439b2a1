// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! minisql command-line interface.
//!
//! This is the main entry point for the `minisql` command.

use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod diagnostic;

use commands::check::{CheckFlags, OutputFormat};

/// minisql: check SQL-like source files for lexical, syntax and semantic errors
#[derive(Debug, Parser)]
#[command(name = "minisql")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check source files and report diagnostics
    Check {
        /// Source file or directory to check
        #[arg(default_value = ".")]
        path: String,

        /// Output format for diagnostics: text or json
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Print the token listing of each file
        #[arg(long)]
        tokens: bool,

        /// Print the parse tree of each statement
        #[arg(long)]
        tree: bool,

        /// Fail when warnings are reported
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Print the token listing of a source file
    Tokens {
        /// Source file to tokenize
        path: String,
    },
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Check {
            path,
            format,
            tokens,
            tree,
            deny_warnings,
        } => commands::check::run_check(
            &path,
            CheckFlags {
                format,
                show_tokens: tokens,
                show_tree: tree,
                deny_warnings,
            },
        ),
        Command::Tokens { path } => commands::tokens::run_tokens(&path),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so they never mix with token, tree or JSON output.
fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Targets are crate module paths, so both crates are listed.
    match v {
        0 => "minisql_cli=info,minisql_core=info",
        1 => "minisql_cli=debug,minisql_core=debug",
        _ => "minisql_cli=trace,minisql_core=trace",
    }
}
