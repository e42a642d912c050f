//! Chart generation from a normalized frame
//!
//! Each chart is built and drawn on its own. A missing column, an empty
//! series or a backend error is recorded for that chart and the next one
//! is attempted.

use crate::aggregate::{counts_per_date, proportions, value_counts};
use crate::chart::{BarChart, ChartRenderer, LineChart, PieChart, Rgb, SvgRenderer};
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::normalize::NormalizedFrame;
use std::fmt;
use std::path::{Path, PathBuf};
use threatlens_domain::Field;
use tracing::{info, warn};

const SKY_BLUE: Rgb = (135, 206, 235);
const SALMON: Rgb = (250, 128, 114);
const PURPLE: Rgb = (128, 0, 128);
const PIE_COLORS: [Rgb; 4] = [(255, 153, 153), (102, 179, 255), (153, 255, 153), (255, 204, 153)];

/// Start of the first severity slice, degrees
pub const PIE_START_ANGLE: f64 = 140.0;

/// The charts a report contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Bar chart of threat type frequencies
    ThreatTypes,
    /// Pie chart of severity proportions
    SeverityLevels,
    /// Bar chart of affected system frequencies
    AffectedSystems,
    /// Line chart of records per date
    ThreatsOverTime,
}

impl ChartKind {
    /// All charts in generation order
    pub const ALL: [ChartKind; 4] = [
        ChartKind::ThreatTypes,
        ChartKind::SeverityLevels,
        ChartKind::AffectedSystems,
        ChartKind::ThreatsOverTime,
    ];

    /// Output file name
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::ThreatTypes => "threat_type_distribution.svg",
            ChartKind::SeverityLevels => "severity_levels_distribution.svg",
            ChartKind::AffectedSystems => "affected_systems_count.svg",
            ChartKind::ThreatsOverTime => "threats_over_time.svg",
        }
    }

    /// Chart title
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::ThreatTypes => "Threat Type Distribution",
            ChartKind::SeverityLevels => "Severity Levels Distribution",
            ChartKind::AffectedSystems => "Affected Systems Count",
            ChartKind::ThreatsOverTime => "Threat Occurrences Over Time",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What happened to one chart
#[derive(Debug)]
pub enum ChartOutcome {
    /// Written to this path
    Rendered(PathBuf),
    /// Not drawn because the data did not allow it
    Skipped(String),
    /// Drawing failed
    Failed(ReportError),
}

/// One chart and its outcome
#[derive(Debug)]
pub struct ChartResult {
    /// Which chart
    pub kind: ChartKind,
    /// What happened
    pub outcome: ChartOutcome,
}

/// Outcomes of a chart generation run, in generation order
#[derive(Debug, Default)]
pub struct VisualizationReport {
    /// Per-chart results
    pub charts: Vec<ChartResult>,
}

impl VisualizationReport {
    /// Outcome for a given chart
    pub fn outcome(&self, kind: ChartKind) -> Option<&ChartOutcome> {
        self.charts.iter().find(|c| c.kind == kind).map(|c| &c.outcome)
    }

    /// Paths of the charts that were written
    pub fn rendered(&self) -> Vec<&Path> {
        self.charts
            .iter()
            .filter_map(|c| match &c.outcome {
                ChartOutcome::Rendered(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    /// True when every chart was written
    pub fn is_complete(&self) -> bool {
        self.charts
            .iter()
            .all(|c| matches!(c.outcome, ChartOutcome::Rendered(_)))
    }
}

fn bar_chart(
    frame: &NormalizedFrame,
    field: Field,
    kind: ChartKind,
    x_label: &str,
    color: Rgb,
) -> Result<BarChart, ReportError> {
    let values = frame
        .column(field)
        .ok_or_else(|| ReportError::MissingColumn(field.to_string()))?;
    let bars = value_counts(values);
    if bars.is_empty() {
        return Err(ReportError::EmptyData(kind.to_string()));
    }
    Ok(BarChart {
        title: kind.title().to_string(),
        x_label: x_label.to_string(),
        y_label: "Count".to_string(),
        bars,
        color,
    })
}

/// Threat type frequencies, most common first
pub fn threat_type_chart(frame: &NormalizedFrame) -> Result<BarChart, ReportError> {
    bar_chart(frame, Field::ThreatType, ChartKind::ThreatTypes, "Threat Type", SKY_BLUE)
}

/// Severity level proportions
pub fn severity_chart(frame: &NormalizedFrame) -> Result<PieChart, ReportError> {
    let kind = ChartKind::SeverityLevels;
    let values = frame
        .column(Field::SeverityLevel)
        .ok_or_else(|| ReportError::MissingColumn(Field::SeverityLevel.to_string()))?;
    let slices = proportions(&value_counts(values));
    if slices.is_empty() {
        return Err(ReportError::EmptyData(kind.to_string()));
    }
    Ok(PieChart {
        title: kind.title().to_string(),
        slices,
        start_angle: PIE_START_ANGLE,
        colors: PIE_COLORS.to_vec(),
    })
}

/// Affected system frequencies, most common first
pub fn affected_systems_chart(frame: &NormalizedFrame) -> Result<BarChart, ReportError> {
    bar_chart(
        frame,
        Field::AffectedSystems,
        ChartKind::AffectedSystems,
        "Affected System",
        SALMON,
    )
}

/// Records per calendar date, oldest first
pub fn timeline_chart(frame: &NormalizedFrame) -> Result<LineChart, ReportError> {
    let kind = ChartKind::ThreatsOverTime;
    let dates = frame
        .dates()
        .ok_or_else(|| ReportError::MissingColumn(Field::Timestamp.to_string()))?;
    let points = counts_per_date(dates);
    if points.is_empty() {
        return Err(ReportError::EmptyData(kind.to_string()));
    }
    Ok(LineChart {
        title: kind.title().to_string(),
        x_label: "Date".to_string(),
        y_label: "Count".to_string(),
        points,
        color: PURPLE,
    })
}

/// Generates the chart set for a normalized frame
pub struct Visualizer<R = SvgRenderer> {
    renderer: R,
    output_dir: PathBuf,
}

impl Visualizer<SvgRenderer> {
    /// SVG visualizer for a report configuration
    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        config.validate()?;
        let (width, height) = config.chart_size();
        Ok(Self::new(
            SvgRenderer::new(width, height),
            config.output_dir.clone(),
        ))
    }
}

impl<R: ChartRenderer> Visualizer<R> {
    /// Create a visualizer writing into `output_dir`
    pub fn new(renderer: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Directory the charts are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build and draw every chart
    ///
    /// Only a failure to create the output directory is returned as an
    /// error; per-chart problems are in the report.
    pub fn generate(&self, frame: &NormalizedFrame) -> Result<VisualizationReport, ReportError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ReportError::persistence(&self.output_dir, e))?;

        let mut report = VisualizationReport::default();
        for kind in ChartKind::ALL {
            let outcome = self.chart(kind, frame);
            match &outcome {
                ChartOutcome::Rendered(path) => info!("Saved {} to {}", kind, path.display()),
                ChartOutcome::Skipped(reason) => warn!("Skipped {}: {}", kind, reason),
                ChartOutcome::Failed(err) => warn!("Failed to draw {}: {}", kind, err),
            }
            report.charts.push(ChartResult { kind, outcome });
        }

        info!(
            "Visualizations generated: {}/{} charts written",
            report.rendered().len(),
            report.charts.len()
        );
        Ok(report)
    }

    fn chart(&self, kind: ChartKind, frame: &NormalizedFrame) -> ChartOutcome {
        let path = self.output_dir.join(kind.file_name());
        let drawn = match kind {
            ChartKind::ThreatTypes => {
                threat_type_chart(frame).map(|c| self.renderer.bar_chart(&c, &path))
            }
            ChartKind::SeverityLevels => {
                severity_chart(frame).map(|c| self.renderer.pie_chart(&c, &path))
            }
            ChartKind::AffectedSystems => {
                affected_systems_chart(frame).map(|c| self.renderer.bar_chart(&c, &path))
            }
            ChartKind::ThreatsOverTime => {
                timeline_chart(frame).map(|c| self.renderer.line_chart(&c, &path))
            }
        };

        match drawn {
            Err(reason) => ChartOutcome::Skipped(reason.to_string()),
            Ok(Err(err)) => ChartOutcome::Failed(err),
            Ok(Ok(())) => ChartOutcome::Rendered(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_frame;
    use crate::normalize::normalize;
    use std::cell::RefCell;

    const HEADER: &str = "Threat Type,Severity Level,Affected Systems,Timestamp,Description,Suggested Mitigation Steps";

    fn frame(rows: &[&str]) -> NormalizedFrame {
        let mut data = format!("{}\n", HEADER);
        for row in rows {
            data.push_str(row);
            data.push('\n');
        }
        normalize(read_frame(data.as_bytes()).unwrap()).frame
    }

    /// Records which charts were drawn; can be told to fail pie charts
    #[derive(Default)]
    struct RecordingRenderer {
        drawn: RefCell<Vec<String>>,
        fail_pie: bool,
    }

    impl RecordingRenderer {
        fn record(&self, title: &str, path: &Path) -> Result<(), ReportError> {
            self.drawn.borrow_mut().push(title.to_string());
            std::fs::write(path, "<svg/>").map_err(|e| ReportError::Render(e.to_string()))
        }
    }

    impl ChartRenderer for RecordingRenderer {
        fn bar_chart(&self, chart: &BarChart, path: &Path) -> Result<(), ReportError> {
            self.record(&chart.title, path)
        }

        fn pie_chart(&self, chart: &PieChart, path: &Path) -> Result<(), ReportError> {
            if self.fail_pie {
                return Err(ReportError::Render("backend exploded".into()));
            }
            self.record(&chart.title, path)
        }

        fn line_chart(&self, chart: &LineChart, path: &Path) -> Result<(), ReportError> {
            self.record(&chart.title, path)
        }
    }

    #[test]
    fn test_threat_chart_ordering() {
        let frame = frame(&[
            "Phishing,High,Mail,2024-01-01,d,m",
            "Phishing,Low,Web,2024-01-02,d,m",
            "Malware,High,Mail,2024-01-02,d,m",
        ]);
        let chart = threat_type_chart(&frame).unwrap();
        assert_eq!(chart.bars[0].value, "Phishing");
        assert_eq!(chart.bars[0].count, 2);
        assert_eq!(chart.bars[1].value, "Malware");
    }

    #[test]
    fn test_severity_chart_labels() {
        let frame = frame(&[
            "Phishing,High,Mail,2024-01-01,d,m",
            "Worm,High,Web,2024-01-02,d,m",
            "Malware,Low,Mail,2024-01-02,d,m",
        ]);
        let chart = severity_chart(&frame).unwrap();
        assert_eq!(chart.start_angle, 140.0);
        assert_eq!(chart.slices[0].percent_label(), "66.7%");
    }

    #[test]
    fn test_timeline_ascending_skips_bad_dates() {
        let frame = frame(&[
            "A,High,Mail,2024-01-03,d,m",
            "B,High,Mail,2024-01-01,d,m",
            "C,High,Mail,garbage,d,m",
            "D,High,Mail,2024-01-03 08:00:00,d,m",
        ]);
        let chart = timeline_chart(&frame).unwrap();
        let counts: Vec<usize> = chart.points.iter().map(|p| p.1).collect();
        assert_eq!(counts, vec![1, 2]);
        assert!(chart.points[0].0 < chart.points[1].0);
    }

    #[test]
    fn test_missing_column_skips_only_that_chart() {
        let data = "Threat Type,Severity Level,Timestamp\nPhishing,High,2024-01-01\n";
        let frame = normalize(read_frame(data.as_bytes()).unwrap()).frame;
        let dir = tempfile::tempdir().unwrap();
        let visualizer = Visualizer::new(RecordingRenderer::default(), dir.path());

        let report = visualizer.generate(&frame).unwrap();
        assert!(matches!(
            report.outcome(ChartKind::AffectedSystems),
            Some(ChartOutcome::Skipped(_))
        ));
        assert_eq!(report.rendered().len(), 3);
        assert!(dir.path().join("threats_over_time.svg").exists());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_render_failure_is_isolated() {
        let frame = frame(&["Phishing,High,Mail,2024-01-01,d,m"]);
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer {
            fail_pie: true,
            ..Default::default()
        };
        let visualizer = Visualizer::new(renderer, dir.path());

        let report = visualizer.generate(&frame).unwrap();
        assert!(matches!(
            report.outcome(ChartKind::SeverityLevels),
            Some(ChartOutcome::Failed(ReportError::Render(_)))
        ));
        assert_eq!(report.rendered().len(), 3);
        assert_eq!(
            *visualizer.renderer.drawn.borrow(),
            vec![
                "Threat Type Distribution",
                "Affected Systems Count",
                "Threat Occurrences Over Time"
            ]
        );
    }

    #[test]
    fn test_empty_frame_skips_everything() {
        let frame = frame(&[]);
        let dir = tempfile::tempdir().unwrap();
        let visualizer = Visualizer::new(RecordingRenderer::default(), dir.path());

        let report = visualizer.generate(&frame).unwrap();
        assert_eq!(report.charts.len(), 4);
        assert!(report.rendered().is_empty());
        assert!(report
            .charts
            .iter()
            .all(|c| matches!(c.outcome, ChartOutcome::Skipped(_))));
    }

    #[test]
    fn test_file_names() {
        let names: Vec<_> = ChartKind::ALL.iter().map(ChartKind::file_name).collect();
        assert_eq!(
            names,
            vec![
                "threat_type_distribution.svg",
                "severity_levels_distribution.svg",
                "affected_systems_count.svg",
                "threats_over_time.svg"
            ]
        );
    }
}
