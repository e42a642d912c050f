//! ThreatLens Report
//!
//! Reloads a persisted incident table, repairs and cleans it, and draws
//! summary charts.
//!
//! # Architecture
//!
//! ```text
//! CSV → load_frame → normalize → NormalizedFrame → Visualizer → SVG charts
//! ```
//!
//! Aggregation is pure and lives apart from drawing, which goes through the
//! [`ChartRenderer`] trait.
//!
//! # Example Usage
//!
//! ```no_run
//! use threatlens_report::{load_normalized, ReportConfig, Visualizer};
//!
//! # fn example() -> Result<(), threatlens_report::ReportError> {
//! let normalized = load_normalized("output.csv")?;
//! let visualizer = Visualizer::from_config(&ReportConfig::default())?;
//! let report = visualizer.generate(&normalized.frame)?;
//! println!("Charts written: {}", report.rendered().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregate;
mod chart;
mod config;
mod error;
mod frame;
mod loader;
mod normalize;
mod timestamp;
mod visualize;

pub use aggregate::{counts_per_date, proportions, value_counts, Share, ValueCount};
pub use chart::{BarChart, ChartRenderer, LineChart, PieChart, Rgb, SvgRenderer};
pub use config::ReportConfig;
pub use error::ReportError;
pub use frame::{Column, RawFrame, PLACEHOLDER_PREFIX};
pub use loader::{load_frame, read_frame, NULL_MARKERS};
pub use normalize::{
    drop_incomplete, load_normalized, normalize, repair_schema, trim_cells, Normalized,
    NormalizedFrame, COMBINED_SEPARATOR,
};
pub use timestamp::parse_timestamp;
pub use visualize::{
    affected_systems_chart, severity_chart, threat_type_chart, timeline_chart, ChartKind,
    ChartOutcome, ChartResult, VisualizationReport, Visualizer, PIE_START_ANGLE,
};
