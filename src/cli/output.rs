//! Rendering of results and diagnostics.
//!
//! Results go to stdout; `error:`/`warning:` diagnostics go to stderr.
//! Colours respect `NO_COLOR` through the colored crate.

use crate::aggregate::AggregateOutput;
use crate::filter::{EntryFilter, TimeRange};
use crate::scan::{ScanSummary, SourceReport};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;
use std::io::Write;

#[derive(Serialize)]
struct DistinctJson {
    distinct: usize,
}

#[derive(Serialize)]
struct RankedJson<'a> {
    query: Cow<'a, str>,
    count: u64,
}

/// A message for stderr, built before it is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Warning(String),
    Detail(String),
}

impl Diagnostic {
    pub fn emit(&self) {
        match self {
            Diagnostic::Warning(message) => warning(message),
            Diagnostic::Detail(message) => eprintln!("{}", message.dimmed()),
        }
    }
}

pub fn error(message: impl Display) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

pub fn warning(message: impl Display) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

/// Plain text: the count alone, or one `query<TAB>count` line per entry.
pub fn render_text(output: &AggregateOutput) -> String {
    match output {
        AggregateOutput::Distinct(count) => format!("{}\n", count),
        AggregateOutput::Top(ranked) => ranked
            .iter()
            .map(|entry| {
                format!(
                    "{}\t{}\n",
                    String::from_utf8_lossy(&entry.query),
                    entry.count
                )
            })
            .collect(),
    }
}

pub fn render_json(output: &AggregateOutput) -> Result<String> {
    let json = match output {
        AggregateOutput::Distinct(count) => {
            serde_json::to_string_pretty(&DistinctJson { distinct: *count })
        }
        AggregateOutput::Top(ranked) => {
            let entries: Vec<RankedJson<'_>> = ranked
                .iter()
                .map(|entry| RankedJson {
                    query: String::from_utf8_lossy(&entry.query),
                    count: entry.count,
                })
                .collect();
            serde_json::to_string_pretty(&entries)
        }
    }
    .context("Failed to serialize result")?;
    Ok(json + "\n")
}

pub fn print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write result")
}

/// `--verbose` output: the active range, one line per source, then totals.
pub fn verbose_lines(range: &TimeRange, summary: &ScanSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(summary.reports.len() + 2);
    lines.push(range.description());
    lines.extend(summary.reports.iter().map(format_report));
    lines.push(format_totals(summary));
    lines
}

/// Totals over the sources that contributed to the result.
pub fn format_totals(summary: &ScanSummary) -> String {
    let totals = summary.valid_totals();
    format!(
        "total: {}/{} sources valid, {} lines, {} malformed, {} in range, {} out of range",
        summary.valid_sources(),
        summary.reports.len(),
        totals.lines,
        totals.skipped,
        totals.in_range,
        totals.out_of_range
    )
}

/// One line of `--verbose` output for a source.
pub fn format_report(report: &SourceReport) -> String {
    let stats = &report.stats;
    let mut line = format!(
        "{}: {} lines, {} malformed, {} in range, {} out of range",
        report.name, stats.lines, stats.skipped, stats.in_range, stats.out_of_range
    );
    if let Some((number, reason)) = &report.first_skipped {
        line.push_str(&format!(" (first malformed: line {}: {})", number, reason));
    }
    if !report.is_valid() {
        line.push_str(" [skipped]");
    }
    line
}
