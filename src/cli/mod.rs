//! Command-line definitions for querystat.
//!
//! Provides the `distinct` and `top` subcommands and their shared options.

pub mod output;

use crate::query::{self, QueryOptions};
use crate::scan::ScanSummary;
use clap::{Args, Parser, Subcommand};
use output::Diagnostic;
use std::path::PathBuf;

const DATE_HELP: &str = "\
Date format:
    YYYY[-MM[-DD[ hh[:mm[:ss]]]]]

    Omitted fields extend the range: --from 2015-08 starts at the first
    second of August 2015, --to 2015-08 ends at its last second.

Log format:
    One query per line: YYYY-MM-DD hh:mm:ss<TAB>query
    Malformed lines are skipped.";

#[derive(Parser, Debug)]
#[command(name = "querystat", version)]
#[command(about = "Count distinct and most frequent queries in search logs", long_about = None)]
#[command(after_help = DATE_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for querystat.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count the distinct queries performed in the time range
    Distinct(ScanArgs),

    /// Show the N most frequent queries performed in the time range
    Top(TopArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Inclusive lower limit of the time range (default: no limit)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Inclusive upper limit of the time range (default: no limit)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Output JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Print per-source line counts to stderr
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Do not warn about skipped sources
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Log files to read, in order (default or `-`: standard input)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Arguments for the top subcommand.
#[derive(Args, Debug)]
pub struct TopArgs {
    /// Number of queries to show
    #[arg(value_name = "N")]
    pub count: u64,

    #[command(flatten)]
    pub scan: ScanArgs,
}

/// Run a parsed command line.
///
/// Follows the Unix convention: results on stdout, diagnostics on stderr,
/// `Err(1)` after printing the reason for any fatal error.
pub fn run(cli: Cli) -> Result<(), i32> {
    let (top, args) = match cli.command {
        Commands::Distinct(args) => (None, args),
        Commands::Top(TopArgs { count, scan }) => (Some(count), scan),
    };

    let (options, duplicates) = match resolve(top, &args) {
        Ok(resolved) => resolved,
        Err(e) => {
            output::error(&e);
            return Err(1);
        }
    };

    for diagnostic in duplicate_warnings(&args, &duplicates) {
        diagnostic.emit();
    }

    let run = query::run(&options);

    for diagnostic in scan_diagnostics(&args, &options, &run.summary) {
        diagnostic.emit();
    }

    let result = match run.into_output() {
        Ok(result) => result,
        Err(e) => {
            output::error(&e);
            return Err(1);
        }
    };

    let rendered = if args.json {
        output::render_json(&result)
    } else {
        Ok(output::render_text(&result))
    };

    match rendered.and_then(|text| output::print(&text)) {
        Ok(()) => Ok(()),
        Err(e) => {
            output::error(&e);
            Err(1)
        }
    }
}

fn resolve(
    top: Option<u64>,
    args: &ScanArgs,
) -> Result<(QueryOptions, Vec<PathBuf>), crate::error::QueryError> {
    QueryOptions::from_args(top, args.from.as_deref(), args.to.as_deref(), &args.files)
}

/// Warnings for repeated `-` arguments, unless `--quiet`.
fn duplicate_warnings(args: &ScanArgs, duplicates: &[PathBuf]) -> Vec<Diagnostic> {
    if args.quiet {
        return Vec::new();
    }
    duplicates
        .iter()
        .map(|dup| {
            Diagnostic::Warning(format!(
                "{}: standard input already listed, ignoring",
                dup.display()
            ))
        })
        .collect()
}

/// Warnings for dropped sources (unless `--quiet`), then `--verbose` details.
fn scan_diagnostics(
    args: &ScanArgs,
    options: &QueryOptions,
    summary: &ScanSummary,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if !args.quiet {
        diagnostics.extend(
            summary
                .failures()
                .map(|failure| Diagnostic::Warning(failure.to_string())),
        );
    }
    if args.verbose {
        diagnostics.extend(
            output::verbose_lines(&options.range, summary)
                .into_iter()
                .map(Diagnostic::Detail),
        );
    }
    diagnostics
}
