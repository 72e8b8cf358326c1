//! Histogram figures.
//!
//! Figures are drawn from the same [`Histogram`] the shape classifier
//! uses, so what the reader sees matches the reported label. Rendering
//! sits behind [`FigureRenderer`]; the bundled implementation writes SVG
//! through `plotters`.

use std::collections::HashSet;
use std::path::Path;

use plotters::prelude::*;

use crate::distribution::Histogram;
use crate::error::ProfileError;

/// Bar fill colour.
pub const BAR_COLOR: RGBColor = RGBColor(128, 0, 128);

/// One column's histogram, ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct HistogramFigure<'a> {
    pub column: &'a str,
    pub histogram: &'a Histogram,
}

impl HistogramFigure<'_> {
    /// Chart title.
    pub fn title(&self) -> String {
        format!("Distribución - {}", self.column)
    }
}

/// Draws histogram figures to files.
pub trait FigureRenderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Renders `figure` to `path`.
    fn render(&self, figure: &HistogramFigure<'_>, path: &Path) -> Result<(), ProfileError>;
}

/// `<column>_hist.<ext>`, with path separators in the name replaced.
///
/// ```
/// use eda_report::figures::figure_file_name;
/// assert_eq!(figure_file_name("precio", "svg"), "precio_hist.svg");
/// assert_eq!(figure_file_name("a/b", "svg"), "a_b_hist.svg");
/// ```
pub fn figure_file_name(column: &str, extension: &str) -> String {
    format!("{}_hist.{extension}", file_stem(column))
}

fn file_stem(column: &str) -> String {
    column
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// Hands out one distinct figure file name per column within a directory.
///
/// Columns whose names collide once path separators are replaced get a
/// numeric suffix, in column order.
///
/// ```
/// use eda_report::figures::FigureNames;
/// let mut names = FigureNames::default();
/// assert_eq!(names.assign("a/b", "svg"), "a_b_hist.svg");
/// assert_eq!(names.assign("a_b", "svg"), "a_b_2_hist.svg");
/// ```
#[derive(Debug, Default)]
pub struct FigureNames {
    taken: HashSet<String>,
}

impl FigureNames {
    pub fn assign(&mut self, column: &str, extension: &str) -> String {
        let name = figure_file_name(column, extension);
        if self.taken.insert(name.clone()) {
            return name;
        }
        let stem = file_stem(column);
        (2..)
            .map(|n| format!("{stem}_{n}_hist.{extension}"))
            .find(|candidate| self.taken.insert(candidate.clone()))
            .unwrap_or(name)
    }
}

// ── SVG ───────────────────────────────────────────────────────────────

/// SVG histogram renderer.
#[derive(Debug, Clone)]
pub struct SvgHistogramRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgHistogramRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl SvgHistogramRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

fn render_error<E: std::fmt::Display>(column: &str) -> impl Fn(E) -> ProfileError + '_ {
    move |e| ProfileError::Render {
        column: column.to_string(),
        message: e.to_string(),
    }
}

impl FigureRenderer for SvgHistogramRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, figure: &HistogramFigure<'_>, path: &Path) -> Result<(), ProfileError> {
        let hist = figure.histogram;
        let err = render_error(figure.column);

        let (x_min, x_max) = match (hist.edges.first(), hist.edges.last()) {
            (Some(&lo), Some(&hi)) if lo < hi => (lo, hi),
            _ => {
                return Err(ProfileError::Render {
                    column: figure.column.to_string(),
                    message: "histogram has no bin edges".into(),
                })
            }
        };
        let max_count = hist.counts.iter().copied().max().unwrap_or(0).max(1);
        let y_max = max_count as f64 * 1.05;

        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(figure.title(), ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(&err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(figure.column)
            .y_desc("Frecuencia")
            .x_label_formatter(&|v| format!("{v:.2}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .draw()
            .map_err(&err)?;

        let bars = || {
            hist.edges
                .windows(2)
                .zip(hist.counts.iter())
                .map(|(w, &c)| [(w[0], 0.0), (w[1], c as f64)])
        };
        chart
            .draw_series(bars().map(|corners| Rectangle::new(corners, BAR_COLOR.filled())))
            .map_err(&err)?;
        chart
            .draw_series(bars().map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))
            .map_err(&err)?;

        root.present().map_err(&err)?;
        tracing::debug!(column = figure.column, path = %path.display(), "rendered histogram");
        Ok(())
    }
}
