//! Profiling pipeline.
//!
//! [`profile_table`] is the pure core: it runs the column extractor,
//! descriptive statistics, shape classifier, outlier detector and
//! correlation engine over a [`DataFrame`] and returns a [`ProfileResult`].
//! [`run`] wraps it with I/O: load the configured input, write the report,
//! one figure per numeric column and, optionally, a JSON summary.
//!
//! ```
//! use eda_report::csv_parser::CsvParser;
//! use eda_report::pipeline::profile_table;
//!
//! let df = CsvParser::new().parse_str("x,label\n1,a\n2,b\n3,c\n").unwrap();
//! let result = profile_table(&df);
//! assert_eq!(result.statistics.len(), 1);
//! assert!(result.correlation.is_none());
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{correlation_matrix, CorrelationMatrix};
use crate::config::ProfileConfig;
use crate::dataframe::DataFrame;
use crate::distribution::{histogram, BinMethod, Histogram};
use crate::error::ProfileError;
use crate::figures::{FigureNames, FigureRenderer, HistogramFigure, SvgHistogramRenderer};
use crate::input::load_table;
use crate::profiling::{
    dataset_overview, describe_column, detect_outliers, ColumnStatistics, DatasetOverview,
    OutlierRecord,
};
use crate::report::{assemble_report, MarkdownRenderer, ReportOptions, ReportRenderer};

/// Timestamp format used in the report title.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Auto-binned histogram of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHistogram {
    pub column: String,
    pub histogram: Histogram,
}

/// Everything the core computes for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResult {
    pub overview: DatasetOverview,
    /// One entry per numeric column, in column order.
    pub statistics: Vec<ColumnStatistics>,
    /// One entry per numeric column, in column order.
    pub outliers: Vec<OutlierRecord>,
    /// `None` when fewer than two numeric columns exist.
    pub correlation: Option<CorrelationMatrix>,
    /// One entry per numeric column, in column order.
    pub histograms: Vec<ColumnHistogram>,
}

/// Profiles every numeric column of `df`.
///
/// Never fails: empty tables, all-missing columns and constant columns all
/// produce NaN sentinels or placeholder labels.
pub fn profile_table(df: &DataFrame) -> ProfileResult {
    let numeric = df.numeric_columns();
    tracing::info!(
        numeric = numeric.len(),
        columns = df.column_count(),
        "profiling numeric columns"
    );

    let statistics = numeric.iter().map(describe_column).collect();
    let outliers = numeric.iter().map(detect_outliers).collect();
    let histograms = numeric
        .iter()
        .map(|col| ColumnHistogram {
            column: col.name().to_string(),
            histogram: histogram(&col.present_values(), BinMethod::Auto),
        })
        .collect();
    let correlation = correlation_matrix(&numeric);
    if correlation.is_none() {
        tracing::debug!("fewer than two numeric columns, correlation not computed");
    }

    ProfileResult {
        overview: dataset_overview(df),
        statistics,
        outliers,
        correlation,
        histograms,
    }
}

// ── Run ───────────────────────────────────────────────────────────────

/// Files produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report_path: PathBuf,
    /// Figures written, in column order.
    pub figures: Vec<PathBuf>,
    /// Columns whose figure failed to render.
    pub failed_figures: Vec<String>,
    pub json_path: Option<PathBuf>,
    pub numeric_columns: usize,
}

/// Loads, profiles and writes all outputs with the SVG figure renderer.
pub fn run(config: &ProfileConfig) -> Result<RunSummary, ProfileError> {
    let renderer = SvgHistogramRenderer::new(config.figure_width, config.figure_height);
    run_with(config, &renderer)
}

/// Like [`run`], with a caller-supplied figure renderer.
pub fn run_with<R: FigureRenderer>(
    config: &ProfileConfig,
    renderer: &R,
) -> Result<RunSummary, ProfileError> {
    config.validate()?;
    let df = load_table(config)?;
    let result = profile_table(&df);

    create_dir(&config.output_dir)?;

    let (figures, failed_figures) = if config.render_figures {
        write_figures(&result, &config.figures_path(), renderer)?
    } else {
        (Vec::new(), Vec::new())
    };

    let options = ReportOptions {
        timestamp: Some(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
        figures_dir: config.render_figures.then(|| config.figures_label()),
    };
    let markdown = MarkdownRenderer.render(&assemble_report(&result, &options));
    let report_path = config.report_path();
    write_file(&report_path, markdown.as_bytes())?;
    tracing::info!(path = %report_path.display(), "report written");

    let json_path = if config.write_json {
        let path = config.json_path();
        let json = serde_json::to_string_pretty(&result)?;
        write_file(&path, json.as_bytes())?;
        tracing::info!(path = %path.display(), "profile JSON written");
        Some(path)
    } else {
        None
    };

    Ok(RunSummary {
        report_path,
        figures,
        failed_figures,
        json_path,
        numeric_columns: result.statistics.len(),
    })
}

/// Renders one figure per histogram; a failure is logged and skipped.
fn write_figures<R: FigureRenderer>(
    result: &ProfileResult,
    dir: &Path,
    renderer: &R,
) -> Result<(Vec<PathBuf>, Vec<String>), ProfileError> {
    create_dir(dir)?;
    let mut written = Vec::new();
    let mut failed = Vec::new();
    let mut names = FigureNames::default();

    for entry in &result.histograms {
        let path = dir.join(names.assign(&entry.column, renderer.extension()));
        let figure = HistogramFigure {
            column: &entry.column,
            histogram: &entry.histogram,
        };
        match renderer.render(&figure, &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                tracing::warn!(column = %entry.column, error = %e, "skipping figure");
                failed.push(entry.column.clone());
            }
        }
    }

    tracing::info!(
        written = written.len(),
        failed = failed.len(),
        dir = %dir.display(),
        "figures rendered"
    );
    Ok((written, failed))
}

fn create_dir(dir: &Path) -> Result<(), ProfileError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ProfileError::Io(format!("cannot create {}: {e}", dir.display())))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ProfileError> {
    std::fs::write(path, contents)
        .map_err(|e| ProfileError::Io(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::CsvParser;
    use crate::distribution::DistributionShape;

    struct FailingOn(&'static str);

    impl FigureRenderer for FailingOn {
        fn extension(&self) -> &'static str {
            "txt"
        }

        fn render(&self, figure: &HistogramFigure<'_>, path: &Path) -> Result<(), ProfileError> {
            if figure.column == self.0 {
                return Err(ProfileError::Render {
                    column: figure.column.to_string(),
                    message: "boom".into(),
                });
            }
            std::fs::write(path, format!("{:?}", figure.histogram.counts))?;
            Ok(())
        }
    }

    fn config_for(dir: &Path, csv: &str) -> ProfileConfig {
        let input = dir.join("input.csv");
        std::fs::write(&input, csv).expect("write input");
        ProfileConfig {
            input,
            output_dir: dir.join("out"),
            ..ProfileConfig::default()
        }
    }

    #[test]
    fn profile_table_covers_every_numeric_column() {
        let df = CsvParser::new()
            .parse_str("a,name,b\n1,x,2\n2,y,4\n3,z,6\n4,w,8\n5,v,10\n100,u,200\n")
            .expect("csv");
        let result = profile_table(&df);
        let names: Vec<&str> = result.statistics.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(result.outliers.len(), 2);
        assert_eq!(result.histograms.len(), 2);
        assert_eq!(result.statistics[0].distribution, DistributionShape::RightSkewed);
        assert_eq!(result.histograms[0].histogram.n_bins(), 36);
        let corr = result.correlation.expect("two numeric columns");
        assert!((corr.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn statistics_and_outliers_agree() {
        let df = CsvParser::new()
            .parse_str("x\n1\n2\n3\n4\n5\n100\nNA\n")
            .expect("csv");
        let result = profile_table(&df);
        let s = &result.statistics[0];
        let o = &result.outliers[0];
        assert_eq!(s.outlier_count, o.count);
        assert_eq!(s.outlier_pct, o.percentage);
        assert_eq!(o.percentage, 14.29);
    }

    #[test]
    fn zero_numeric_columns() {
        let df = CsvParser::new().parse_str("name\na\nb\n").expect("csv");
        let result = profile_table(&df);
        assert!(result.statistics.is_empty());
        assert!(result.outliers.is_empty());
        assert!(result.histograms.is_empty());
        assert!(result.correlation.is_none());
        assert_eq!(result.overview.column_count, 1);
    }

    #[test]
    fn run_writes_report_figures_and_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config_for(dir.path(), "a,b\n1,2\n2,4\n3,6\n4,8\n5,10\n");
        config.write_json = true;

        let summary = run(&config).expect("run");
        assert_eq!(summary.numeric_columns, 2);
        assert_eq!(summary.figures.len(), 2);
        assert!(summary.failed_figures.is_empty());
        assert!(summary.figures[0].ends_with("figs/a_hist.svg"));
        assert!(summary.figures.iter().all(|p| p.exists()));

        let report = std::fs::read_to_string(&summary.report_path).expect("report");
        assert!(report.starts_with("# Reporte EDA — "));
        assert!(report.contains("_Gráficos guardados en carpeta figs/_"));

        let json_path = summary.json_path.expect("json requested");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_path).expect("json")).expect("parse");
        assert_eq!(json["statistics"][0]["name"], "a");
        // Undefined mode serializes as null.
        assert!(json["statistics"][0]["mode"].is_null());
    }

    #[test]
    fn figure_failure_does_not_abort_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_for(dir.path(), "a,b,c\n1,2,3\n2,4,1\n3,6,2\n");

        let summary = run_with(&config, &FailingOn("b")).expect("run");
        assert_eq!(summary.failed_figures, vec!["b".to_string()]);
        assert_eq!(summary.figures.len(), 2);
        assert!(summary.report_path.exists());
    }

    #[test]
    fn colliding_column_names_keep_both_figures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_for(dir.path(), "a/b,a_b\n1,5\n2,3\n3,4\n");

        let summary = run(&config).expect("run");
        assert_eq!(summary.figures.len(), 2);
        assert_ne!(summary.figures[0], summary.figures[1]);
        assert!(summary.figures[1].ends_with("figs/a_b_2_hist.svg"));
        assert!(summary.figures.iter().all(|p| p.exists()));
    }

    #[test]
    fn figures_can_be_disabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config_for(dir.path(), "a\n1\n2\n");
        config.render_figures = false;

        let summary = run(&config).expect("run");
        assert!(summary.figures.is_empty());
        assert!(!config.figures_path().exists());
        let report = std::fs::read_to_string(&summary.report_path).expect("report");
        assert!(report.ends_with("_No se generaron gráficos._\n"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ProfileConfig {
            input: dir.path().join("absent.csv"),
            output_dir: dir.path().join("out"),
            ..ProfileConfig::default()
        };
        assert!(matches!(run(&config), Err(ProfileError::Io(_))));
        assert!(!config.output_dir.exists());
    }
}
