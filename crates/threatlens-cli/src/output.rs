//! Output formatting for the CLI.

use colored::*;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use threatlens_domain::Reconciliation;
use threatlens_extractor::ExtractionReport;
use threatlens_report::{ChartOutcome, NormalizedFrame, VisualizationReport};

/// Longest cell shown in the data overview
const MAX_CELL_CHARS: usize = 40;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
    preview_rows: usize,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool, preview_rows: usize) -> Self {
        Self {
            color_enabled,
            preview_rows,
        }
    }

    /// Summary of an extraction run.
    pub fn extraction_summary(&self, report: &ExtractionReport, output: &Path) -> String {
        let mut lines = vec![self.info(&format!(
            "Processed {} chunks ({} tokens max each) in {} ms",
            report.metadata.total_chunks,
            report.metadata.max_chunk_tokens,
            report.metadata.processing_time_ms
        ))];

        for failure in &report.failures {
            lines.push(self.error(&format!(
                "Chunk {} skipped: {}",
                failure.index + 1,
                failure.reason
            )));
        }

        let padded: usize = report.chunks.iter().map(|c| c.padded_rows).sum();
        let truncated: usize = report.chunks.iter().map(|c| c.truncated_rows).sum();
        if padded + truncated > 0 {
            lines.push(self.warning(&format!(
                "{} short rows padded, {} long rows truncated",
                padded, truncated
            )));
        }

        if report.table.is_empty() {
            lines.push(self.warning("No incidents extracted."));
        }
        lines.push(self.success(&format!(
            "Data saved to {} ({} records)",
            output.display(),
            report.table.len()
        )));
        lines.join("\n")
    }

    /// Note about schema repair, if any happened.
    pub fn reconciliation(&self, outcome: &Reconciliation) -> Option<String> {
        match outcome {
            Reconciliation::Reconciled => None,
            Reconciliation::PaddedWithPlaceholders { added } => Some(self.warning(&format!(
                "Detected improperly formatted data: added {} placeholder columns",
                added
            ))),
            Reconciliation::Truncated { dropped } => Some(self.warning(&format!(
                "Detected improperly formatted data: dropped {} extra columns",
                dropped
            ))),
        }
    }

    /// First rows of the cleaned table and its column names.
    pub fn frame_overview(&self, frame: &NormalizedFrame) -> String {
        let names = frame.column_names();
        let mut out = String::from("Parsed Data Overview:\n");

        if frame.is_empty() {
            out.push_str(&self.colorize("No rows left after cleaning.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(names.iter().map(String::as_str));
            for row in frame.head(self.preview_rows) {
                builder.push_record(row.iter().map(|cell| truncate(cell, MAX_CELL_CHARS)));
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            out.push_str(&table.to_string());
        }

        out.push_str(&format!("\n\nColumn Names: [{}]", names.join(", ")));
        out
    }

    /// One line per chart, then an overall verdict.
    pub fn chart_outcomes(&self, report: &VisualizationReport) -> String {
        let mut lines: Vec<String> = report
            .charts
            .iter()
            .map(|chart| match &chart.outcome {
                ChartOutcome::Rendered(path) => {
                    self.success(&format!("{}: {}", chart.kind, path.display()))
                }
                ChartOutcome::Skipped(reason) => {
                    self.warning(&format!("{} skipped: {}", chart.kind, reason))
                }
                ChartOutcome::Failed(err) => self.error(&format!("{} failed: {}", chart.kind, err)),
            })
            .collect();

        if report.is_complete() {
            lines.push(self.success("Visualizations generated successfully!"));
        } else {
            lines.push(self.warning(&format!(
                "{} of {} visualizations generated",
                report.rendered().len(),
                report.charts.len()
            )));
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
