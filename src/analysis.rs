//! Pairwise correlation between numeric columns.
//!
//! Unlike a clean-data correlation routine, missing values are tolerated:
//! each pair of columns is correlated over the rows where *both* columns
//! are present (pairwise-complete observations).
//!
//! # Example
//!
//! ```
//! use eda_report::analysis::correlation_matrix;
//! use eda_report::dataframe::{NumericColumn, ValidityBitmap};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1];
//! let validity = ValidityBitmap::all_valid(5);
//! let columns = [
//!     NumericColumn::new("x", &x, &validity),
//!     NumericColumn::new("y", &y, &validity),
//! ];
//! let matrix = correlation_matrix(&columns).unwrap();
//! assert_eq!(matrix.get(0, 0), 1.0);
//! assert!(matrix.get(0, 1) > 0.99); // near-perfect correlation
//! ```

use serde::Serialize;

use crate::dataframe::NumericColumn;

// ── Correlation Matrix ────────────────────────────────────────────────

/// Symmetric Pearson correlation matrix over named columns.
///
/// The diagonal is exactly 1.0. Off-diagonal entries are NaN when the pair
/// has fewer than two complete rows or either side has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Column names, in row/column order.
    pub names: Vec<String>,
    /// Row-major n×n values.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Number of columns (and rows).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the matrix has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Correlation between columns `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Correlation between two columns by name.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

/// Computes the pairwise-complete Pearson correlation matrix.
///
/// Returns `None` when fewer than two numeric columns are given; this is the
/// "not computed" state, not an error.
pub fn correlation_matrix(columns: &[NumericColumn<'_>]) -> Option<CorrelationMatrix> {
    let n = columns.len();
    if n < 2 {
        return None;
    }

    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson_pairwise(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        names: columns.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}

/// Pearson correlation of two columns over their pairwise-complete rows.
///
/// Two-pass: means of the complete pairs first, then centered sums. The
/// result is clamped to `[-1, 1]`; NaN when fewer than two complete rows
/// remain or either column is constant over them.
///
/// ```
/// use eda_report::analysis::pearson_pairwise;
/// use eda_report::dataframe::{NumericColumn, ValidityBitmap};
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [4.0, 3.0, 2.0, 1.0];
/// let validity = ValidityBitmap::all_valid(4);
/// let r = pearson_pairwise(
///     &NumericColumn::new("a", &a, &validity),
///     &NumericColumn::new("b", &b, &validity),
/// );
/// assert!((r + 1.0).abs() < 1e-12);
/// ```
pub fn pearson_pairwise(a: &NumericColumn<'_>, b: &NumericColumn<'_>) -> f64 {
    let rows = a.row_count().min(b.row_count());
    let pairs: Vec<(f64, f64)> = (0..rows)
        .filter_map(|i| Some((a.get(i)?, b.get(i)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 || !divisor.is_finite() {
        return f64::NAN;
    }
    (sxy / divisor).clamp(-1.0, 1.0)
}

// ── Tests ─────────────────────────────────────────────────────────────
