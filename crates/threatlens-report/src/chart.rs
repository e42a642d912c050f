//! Chart descriptions and the SVG renderer

use crate::aggregate::{Share, ValueCount};
use crate::error::ReportError;
use chrono::{Days, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::Path;

/// An RGB color
pub type Rgb = (u8, u8, u8);

const FONT: &str = "sans-serif";

/// A frequency bar chart
#[derive(Debug, Clone)]
pub struct BarChart {
    /// Chart title
    pub title: String,
    /// Label under the x axis
    pub x_label: String,
    /// Label beside the y axis
    pub y_label: String,
    /// One bar per value, drawn left to right
    pub bars: Vec<ValueCount>,
    /// Bar fill
    pub color: Rgb,
}

/// A proportion pie chart
#[derive(Debug, Clone)]
pub struct PieChart {
    /// Chart title
    pub title: String,
    /// Slices, drawn counterclockwise
    pub slices: Vec<Share>,
    /// Where the first slice starts, degrees counterclockwise from 3 o'clock
    pub start_angle: f64,
    /// Slice fills, cycled
    pub colors: Vec<Rgb>,
}

/// A count-per-date line chart with point markers
#[derive(Debug, Clone)]
pub struct LineChart {
    /// Chart title
    pub title: String,
    /// Label under the x axis
    pub x_label: String,
    /// Label beside the y axis
    pub y_label: String,
    /// Points in ascending date order
    pub points: Vec<(NaiveDate, usize)>,
    /// Line and marker color
    pub color: Rgb,
}

/// Draws charts to files
pub trait ChartRenderer {
    /// Draw a bar chart to `path`
    fn bar_chart(&self, chart: &BarChart, path: &Path) -> Result<(), ReportError>;

    /// Draw a pie chart to `path`
    fn pie_chart(&self, chart: &PieChart, path: &Path) -> Result<(), ReportError>;

    /// Draw a line chart to `path`
    fn line_chart(&self, chart: &LineChart, path: &Path) -> Result<(), ReportError>;
}

/// Renders charts as SVG files with plotters
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
}

impl SvgRenderer {
    /// Create a renderer for bar charts of `width` x `height` pixels
    ///
    /// Pie charts are drawn square at `height`; line charts are a fifth wider.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(1000, 600)
    }
}

fn rgb((r, g, b): Rgb) -> RGBColor {
    RGBColor(r, g, b)
}

fn render_error(err: Box<dyn Error>) -> ReportError {
    ReportError::Render(err.to_string())
}

fn draw_bars(chart: &BarChart, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<&str> = chart.bars.iter().map(|b| b.value.as_str()).collect();
    let max = chart.bars.iter().map(|b| b.count).max().unwrap_or(0) as u32;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, 28))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), 0u32..max + 1)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.15))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .axis_desc_style((FONT, 16))
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    let bars = || {
        chart
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (i as u32, bar.count as u32))
    };
    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(rgb(chart.color).filled())
            .margin(8)
            .data(bars()),
    )?;
    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BLACK.stroke_width(1))
            .margin(8)
            .data(bars()),
    )?;

    root.present()?;
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let rad = degrees.to_radians();
    (
        center.0 + (radius * rad.cos()).round() as i32,
        center.1 - (radius * rad.sin()).round() as i32,
    )
}

fn draw_pie(chart: &PieChart, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(&chart.title, (FONT, 28))?;

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let total: usize = chart.slices.iter().map(|s| s.count).sum();
    let centered = Pos::new(HPos::Center, VPos::Center);
    let label_style = (FONT, 16).into_font().color(&BLACK).pos(centered);

    let mut angle = chart.start_angle;
    for (i, slice) in chart.slices.iter().enumerate() {
        let sweep = 360.0 * slice.count as f64 / total.max(1) as f64;
        let color = chart
            .colors
            .get(i % chart.colors.len().max(1))
            .copied()
            .unwrap_or((128, 128, 128));

        // One polygon vertex per degree of arc
        let steps = (sweep.ceil() as usize).max(1);
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        points.extend(
            (0..=steps).map(|s| polar(center, radius, angle + sweep * s as f64 / steps as f64)),
        );
        area.draw(&Polygon::new(points, rgb(color).filled()))?;

        let mid = angle + sweep / 2.0;
        area.draw(&Text::new(
            slice.value.clone(),
            polar(center, radius * 1.2, mid),
            label_style.clone(),
        ))?;
        area.draw(&Text::new(
            slice.percent_label(),
            polar(center, radius * 0.6, mid),
            label_style.clone(),
        ))?;

        angle += sweep;
    }

    root.present()?;
    Ok(())
}

fn draw_line(chart: &LineChart, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let (first, last) = match (chart.points.first(), chart.points.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => return Err("no points to plot".into()),
    };
    let span = (last - first).num_days().max(1) as i32;
    let max = chart.points.iter().map(|p| p.1).max().unwrap_or(0) as u32;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-1i32..span + 1, 0u32..max + 1)?;

    ctx.configure_mesh()
        .bold_line_style(BLACK.mix(0.15))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .axis_desc_style((FONT, 16))
        .x_labels(8)
        .x_label_formatter(&|offset| {
            u64::try_from(*offset)
                .ok()
                .and_then(|days| first.checked_add_days(Days::new(days)))
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    let color = rgb(chart.color);
    let points: Vec<(i32, u32)> = chart
        .points
        .iter()
        .map(|(date, count)| ((*date - first).num_days() as i32, *count as u32))
        .collect();

    ctx.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
    ctx.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
    )?;

    root.present()?;
    Ok(())
}

impl ChartRenderer for SvgRenderer {
    fn bar_chart(&self, chart: &BarChart, path: &Path) -> Result<(), ReportError> {
        draw_bars(chart, path, (self.width, self.height)).map_err(render_error)
    }

    fn pie_chart(&self, chart: &PieChart, path: &Path) -> Result<(), ReportError> {
        draw_pie(chart, path, (self.height, self.height)).map_err(render_error)
    }

    fn line_chart(&self, chart: &LineChart, path: &Path) -> Result<(), ReportError> {
        draw_line(chart, path, (self.width * 6 / 5, self.height)).map_err(render_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_quadrants() {
        assert_eq!(polar((100, 100), 10.0, 0.0), (110, 100));
        assert_eq!(polar((100, 100), 10.0, 90.0), (100, 90));
        assert_eq!(polar((100, 100), 10.0, 180.0), (90, 100));
    }

    #[test]
    fn test_render_bar_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.svg");
        let chart = BarChart {
            title: "Threat Type Distribution".into(),
            x_label: "Threat Type".into(),
            y_label: "Count".into(),
            bars: vec![
                ValueCount { value: "Phishing".into(), count: 2 },
                ValueCount { value: "Malware".into(), count: 1 },
            ],
            color: (135, 206, 235),
        };

        SvgRenderer::default().bar_chart(&chart, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Threat Type Distribution"));
    }

    #[test]
    fn test_render_pie_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.svg");
        let chart = PieChart {
            title: "Severity".into(),
            slices: vec![
                Share { value: "High".into(), count: 2, percent: 200.0 / 3.0 },
                Share { value: "Low".into(), count: 1, percent: 100.0 / 3.0 },
            ],
            start_angle: 140.0,
            colors: vec![(255, 153, 153), (102, 179, 255)],
        };

        SvgRenderer::default().pie_chart(&chart, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("66.7%"));
        assert!(svg.contains("33.3%"));
    }

    #[test]
    fn test_render_to_missing_directory_fails() {
        let chart = LineChart {
            title: "Over time".into(),
            x_label: "Date".into(),
            y_label: "Count".into(),
            points: vec![(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1)],
            color: (128, 0, 128),
        };
        let result = SvgRenderer::default().line_chart(&chart, Path::new("/no/such/dir/line.svg"));
        assert!(matches!(result, Err(ReportError::Render(_))));
    }
}
