use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::domain::{RenameRecord, RenameReport};

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Failed to write the summary: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Failed to serialize the summary: {0}")]
    SerializationError(#[from] serde_json::Error)
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    dry_run: bool,
    renamed: &'a [RenameRecord],
    skipped: usize,
    errors: Vec<String>
}

pub fn write_summary<W: Write>(out: &mut W, report: &RenameReport, dry_run: bool) -> Result<(), SummaryError> {
    if report.renamed.is_empty() {
        writeln!(out, "{}", "No files renamed.".bold())?;
    } else {
        let header = if dry_run { "Would rename" } else { "Renamed" };
        writeln!(out, "{} {} file(s):", header.bold(), report.renamed.len())?;

        for record in &report.renamed {
            writeln!(
                out,
                "  {} -> {}",
                record.original.display().to_string().yellow(),
                record.renamed.display().to_string().green()
            )?;
        }
    }

    if !report.errors.is_empty() {
        let line = format!("{} path(s) could not be renamed.", report.errors.len());
        writeln!(out, "{}", line.red())?;
    }

    Ok(())
}

pub fn write_json_summary<W: Write>(out: &mut W, report: &RenameReport, dry_run: bool) -> Result<(), SummaryError> {
    let summary = JsonSummary {
        dry_run,
        renamed: &report.renamed,
        skipped: report.skipped.len(),
        errors: report.errors.iter().map(|err| err.to_string()).collect()
    };

    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;

    Ok(())
}
