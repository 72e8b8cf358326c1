//! # eda-report
//!
//! Exploratory data analysis for one table: descriptive statistics,
//! distribution-shape classification, IQR outliers, pairwise Pearson
//! correlation, a markdown report and one histogram per numeric column.
//!
//! The crate has two layers:
//!
//! - **Core** ([`profiling`], [`distribution`], [`analysis`], [`stats`]):
//!   pure functions over an in-memory [`DataFrame`](dataframe::DataFrame);
//!   tolerates missing values, never fails on degenerate data
//! - **Collaborators** ([`input`], [`report`], [`figures`], [`pipeline`]):
//!   loading, rendering and writing files
//!
//! ## Modules
//!
//! - [`dataframe`]: Column-major table model (DataFrame, Column, NumericColumn view)
//! - [`csv_parser`]: CSV parsing with automatic type inference
//! - [`input`]: Format detection, CSV/TSV and spreadsheet loading
//! - [`stats`]: Mean, median, mode, standard deviation, quantiles, skewness, kurtosis
//! - [`distribution`]: Auto-binned histograms and the distribution-shape classifier
//! - [`profiling`]: Per-column statistics, IQR outliers, dataset overview
//! - [`analysis`]: Pairwise-complete Pearson correlation matrix
//! - [`report`]: Report document model and markdown rendering
//! - [`figures`]: Histogram figures (SVG)
//! - [`pipeline`]: End-to-end run: load, profile, write
//! - [`config`]: Run configuration (TOML)
//! - [`cli`]: Command-line arguments
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types
//!
//! ## Quick Start
//!
//! ```
//! use eda_report::csv_parser::CsvParser;
//! use eda_report::distribution::DistributionShape;
//! use eda_report::pipeline::profile_table;
//!
//! let csv = "producto,precio,stock\na,1,10\nb,2,12\nc,3,11\nd,4,13\ne,5,12\nf,100,11\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let result = profile_table(&df);
//!
//! assert_eq!(result.statistics.len(), 2); // producto is text
//! assert_eq!(result.statistics[0].distribution, DistributionShape::RightSkewed);
//! assert_eq!(result.outliers[0].count, 1);
//! assert!(result.correlation.is_some());
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod csv_parser;
pub mod dataframe;
pub mod distribution;
pub mod error;
pub mod figures;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod profiling;
pub mod report;
pub mod stats;
