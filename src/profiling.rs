//! Column-level statistics, outlier detection and dataset overview.
//!
//! Profiling tolerates dirty data: missing values are expected input, not
//! errors, and every undefined statistic is reported as NaN rather than
//! aborting the column.
//!
//! # Example
//!
//! ```
//! use eda_report::csv_parser::CsvParser;
//! use eda_report::distribution::DistributionShape;
//! use eda_report::profiling::describe_column;
//!
//! let csv = "price\n1\n2\n3\n4\n5\n100\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let columns = df.numeric_columns();
//! let stats = describe_column(&columns[0]);
//!
//! assert_eq!(stats.name, "price");
//! assert_eq!(stats.median, 3.5);
//! assert_eq!(stats.outlier_count, 1);
//! assert_eq!(stats.distribution, DistributionShape::RightSkewed);
//! ```

use serde::Serialize;

use crate::dataframe::{DataFrame, DataType, NumericColumn};
use crate::distribution::{classify_distribution, DistributionShape};
use crate::stats;

/// Tukey fence multiplier.
pub const IQR_MULTIPLIER: f64 = 1.5;

// ── Dataset overview ──────────────────────────────────────────────────

/// Name, type and non-null count of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub non_null: usize,
}

/// Shape and per-column summary of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetOverview {
    /// Number of numeric (integer or float) columns.
    pub fn numeric_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.data_type.is_numeric())
            .count()
    }
}

/// Summarizes the table's shape, column types and non-null counts.
///
/// ```
/// use eda_report::csv_parser::CsvParser;
/// use eda_report::dataframe::DataType;
/// use eda_report::profiling::dataset_overview;
///
/// let df = CsvParser::new().parse_str("id,name\n1,a\nNA,b\n").unwrap();
/// let overview = dataset_overview(&df);
/// assert_eq!(overview.row_count, 2);
/// assert_eq!(overview.columns[0].data_type, DataType::Integer);
/// assert_eq!(overview.columns[0].non_null, 1);
/// ```
pub fn dataset_overview(df: &DataFrame) -> DatasetOverview {
    let columns = df
        .iter()
        .map(|(name, col)| ColumnSummary {
            name: name.to_string(),
            data_type: col.data_type(),
            non_null: col.valid_count(),
        })
        .collect();
    DatasetOverview {
        row_count: df.row_count(),
        column_count: df.column_count(),
        columns,
    }
}

// ── Outlier detection ─────────────────────────────────────────────────

/// IQR outlier summary for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRecord {
    /// Column name.
    pub column: String,
    /// Values strictly outside the fences.
    pub count: usize,
    /// `count` over the total row count (missing included), in percent,
    /// rounded to 2 decimals.
    pub percentage: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
    /// `q1 - 1.5 * IQR`.
    pub lower: f64,
    /// `q3 + 1.5 * IQR`.
    pub upper: f64,
}

impl OutlierRecord {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Detects outliers with Tukey fences `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`.
///
/// Quartiles use R-7 interpolation over the finite non-missing values. A
/// value is an outlier only when strictly outside the fences. A column with
/// no finite values has NaN fences and no outliers.
///
/// ```
/// use eda_report::dataframe::{NumericColumn, ValidityBitmap};
/// use eda_report::profiling::detect_outliers;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let validity = ValidityBitmap::all_valid(6);
/// let record = detect_outliers(&NumericColumn::new("x", &values, &validity));
/// assert_eq!((record.q1, record.q3, record.upper), (2.25, 4.75, 8.5));
/// assert_eq!(record.count, 1);
/// assert_eq!(record.percentage, 16.67);
/// ```
pub fn detect_outliers(col: &NumericColumn<'_>) -> OutlierRecord {
    let present = col.present_values();
    let finite: Vec<f64> = present.iter().copied().filter(|v| v.is_finite()).collect();

    let (q1, q3) = match stats::sorted(&finite) {
        Some(sorted) if !sorted.is_empty() => (
            stats::quantile_sorted(&sorted, 0.25).unwrap_or(f64::NAN),
            stats::quantile_sorted(&sorted, 0.75).unwrap_or(f64::NAN),
        ),
        _ => (f64::NAN, f64::NAN),
    };
    let iqr = q3 - q1;
    let lower = q1 - IQR_MULTIPLIER * iqr;
    let upper = q3 + IQR_MULTIPLIER * iqr;

    // NaN fences compare false, so an empty column counts nothing.
    let count = present.iter().filter(|&&v| v < lower || v > upper).count();

    OutlierRecord {
        column: col.name().to_string(),
        count,
        percentage: percentage(count, col.row_count()),
        q1,
        q3,
        lower,
        upper,
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 2)
}

/// Rounds to `decimals` places, ties to even on the scaled value. NaN and
/// infinities pass through unchanged.
///
/// ```
/// use eda_report::profiling::round_to;
/// assert_eq!(round_to(16.666_666, 2), 16.67);
/// assert_eq!(round_to(-2.5, 0), -2.0);
/// assert_eq!(round_to(3.125, 2), 3.12);
/// assert!(round_to(f64::NAN, 3).is_nan());
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

// ── Descriptive statistics ────────────────────────────────────────────

/// Descriptive statistics and shape for one numeric column.
///
/// Computed over the non-missing values; undefined statistics are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    /// Column name.
    pub name: String,
    /// Number of non-missing values.
    pub valid_count: usize,
    /// Total rows, missing included.
    pub row_count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (average of the two middles for even counts).
    pub median: f64,
    /// Most frequent value; NaN when empty or all values are distinct.
    pub mode: f64,
    /// Sample standard deviation (n − 1).
    pub std_dev: f64,
    /// Bias-corrected sample skewness.
    pub skewness: f64,
    /// Bias-corrected sample excess kurtosis.
    pub kurtosis: f64,
    /// Estimated distribution shape.
    pub distribution: DistributionShape,
    /// IQR outlier count.
    pub outlier_count: usize,
    /// IQR outlier percentage of all rows.
    pub outlier_pct: f64,
}

/// Computes descriptive statistics, shape and outlier totals for a column.
pub fn describe_column(col: &NumericColumn<'_>) -> ColumnStatistics {
    let values = col.present_values();
    let nan = f64::NAN;

    let skewness = stats::skewness(&values).unwrap_or(nan);
    let kurtosis = stats::kurtosis(&values).unwrap_or(nan);
    let distribution = classify_distribution(&values, skewness, kurtosis);
    let outliers = detect_outliers(col);

    tracing::debug!(
        column = col.name(),
        valid = values.len(),
        skewness,
        kurtosis,
        distribution = distribution.label(),
        outliers = outliers.count,
        "profiled column"
    );

    ColumnStatistics {
        name: col.name().to_string(),
        valid_count: values.len(),
        row_count: col.row_count(),
        mean: stats::mean(&values).unwrap_or(nan),
        median: stats::median(&values).unwrap_or(nan),
        mode: stats::mode(&values).unwrap_or(nan),
        std_dev: stats::std_dev(&values).unwrap_or(nan),
        skewness,
        kurtosis,
        distribution,
        outlier_count: outliers.count,
        outlier_pct: outliers.percentage,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
