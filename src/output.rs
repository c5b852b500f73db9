//! Run summaries: terminal text and JSON.

use crate::cli::OutputFormat;
use crate::commands::RunSummary;
use crate::core::{FileStatus, RewriteKind, RewriteStats};
use crate::formatting::{painter_for, FormattingConfig, Painter, Tone};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

const RULE_WIDTH: usize = 50;

#[derive(Serialize)]
struct JsonReport<'a> {
    dry_run: bool,
    #[serde(flatten)]
    stats: &'a RewriteStats,
    modified_files: Vec<&'a Path>,
    failed_files: Vec<FailedFile<'a>>,
}

#[derive(Serialize)]
struct FailedFile<'a> {
    path: &'a Path,
    error: &'a str,
}

pub fn render_json(summary: &RunSummary) -> Result<String> {
    let report = JsonReport {
        dry_run: summary.dry_run,
        stats: &summary.stats,
        modified_files: summary.modified().map(|o| o.path.as_path()).collect(),
        failed_files: summary
            .outcomes
            .iter()
            .filter_map(|o| match &o.status {
                FileStatus::Failed(error) => Some(FailedFile {
                    path: &o.path,
                    error,
                }),
                _ => None,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Per-file lines shown at `-v`: what was (or would be) modified and what
/// failed.
pub fn render_file_list(summary: &RunSummary, painter: &dyn Painter) -> String {
    let mut out = String::new();
    let verb = if summary.dry_run {
        "Would modernise:"
    } else {
        "Modernised:"
    };
    for outcome in &summary.outcomes {
        match &outcome.status {
            FileStatus::Modified => {
                let _ = writeln!(
                    out,
                    "{} {}",
                    painter.paint(Tone::Modified, verb),
                    outcome.path.display()
                );
            }
            FileStatus::Failed(error) => {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    painter.paint(Tone::Failed, "Failed:"),
                    outcome.path.display(),
                    painter.paint(Tone::Muted, &format!("({error})"))
                );
            }
            FileStatus::Unchanged => {}
        }
    }
    out
}

pub fn render_terminal(summary: &RunSummary, painter: &dyn Painter) -> String {
    let stats = &summary.stats;
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", painter.paint(Tone::Title, "Modernisation Summary"));
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Files processed: {}", stats.files_scanned);
    let _ = writeln!(out, "Files modified: {}", stats.files_modified);
    if stats.files_failed > 0 {
        let _ = writeln!(
            out,
            "{}",
            painter.paint(Tone::Failed, &format!("Files failed: {}", stats.files_failed))
        );
    }
    for kind in RewriteKind::ALL {
        let _ = writeln!(out, "{}: {}", kind.label(), stats.rewrites_of(kind));
    }

    if !stats.skipped.is_empty() {
        let _ = writeln!(out, "{}", painter.paint(Tone::Emphasis, "Left unchanged:"));
        for (label, count) in &stats.skipped {
            let _ = writeln!(out, "  {}: {}", label.replace('_', " "), count);
        }
    }

    if summary.dry_run {
        let _ = writeln!(
            out,
            "{}",
            painter.paint(Tone::Notice, "Dry run: no files were written.")
        );
    }
    out
}

/// Print the summary to stdout in the requested format.
pub fn print_summary(
    summary: &RunSummary,
    format: OutputFormat,
    formatting: FormattingConfig,
    verbosity: u8,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(summary)?),
        OutputFormat::Terminal => {
            let painter = painter_for(formatting);
            if verbosity > 0 {
                print!("{}", render_file_list(summary, painter.as_ref()));
            }
            print!("{}", render_terminal(summary, painter.as_ref()));
        }
    }
    Ok(())
}
