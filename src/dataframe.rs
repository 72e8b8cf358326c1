//! Column-major table model.
//!
//! The [`DataFrame`] stores named, typed columns of equal length with a
//! compact validity bitmap for tracking missing values. The profiling core
//! only ever sees numeric columns through the [`NumericColumn`] view
//! returned by [`DataFrame::numeric_columns`].
//!
//! # Column Types
//!
//! | Type | Storage | Use case |
//! |------|---------|----------|
//! | [`Integer`](DataType::Integer) | `Vec<f64>` + bitmap | Whole-number values |
//! | [`Float`](DataType::Float) | `Vec<f64>` + bitmap | Continuous values |
//! | [`Boolean`](DataType::Boolean) | `Vec<bool>` + bitmap | True/false values |
//! | [`Text`](DataType::Text) | `Vec<String>` + bitmap | Anything else |
//!
//! # Example
//!
//! ```
//! use eda_report::dataframe::{Column, DataFrame, ValidityBitmap};
//!
//! let mut df = DataFrame::new();
//! df.add_column(
//!     "price".to_string(),
//!     Column::float(vec![20.5, 21.3, 19.8], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//! df.add_column(
//!     "name".to_string(),
//!     Column::text(vec!["a".into(), "b".into(), "c".into()], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//!
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.numeric_columns().len(), 1);
//! ```

use serde::Serialize;

use crate::error::ProfileError;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap using `Vec<u64>`.
///
/// Each bit indicates whether the corresponding row is present (1) or
/// missing (0).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let n_words = len.div_ceil(64);
        let mut bits = vec![u64::MAX; n_words];
        let trailing = len % 64;
        if trailing != 0 && n_words > 0 {
            bits[n_words - 1] = (1u64 << trailing) - 1;
        }
        Self { bits, len }
    }

    /// Creates a bitmap where all `len` positions are missing.
    pub fn all_invalid(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Creates an empty bitmap with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Returns `true` if the value at `idx` is present.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        (self.bits[word] >> bit) & 1 == 1
    }

    /// Marks position `idx` as missing.
    #[inline]
    pub fn set_invalid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        self.bits[word] &= !(1u64 << bit);
    }

    /// Appends a new position.
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        let (word, bit) = (idx / 64, idx % 64);
        if word >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[word] |= 1u64 << bit;
        }
    }

    /// Returns the total number of tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap tracks zero positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts the number of present positions.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Detected data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// Whole numbers (stored as `f64`).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values.
    Boolean,
    /// Free-form text.
    Text,
}

impl DataType {
    /// Returns `true` for the types the profiling core treats as numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "int64"),
            Self::Float => write!(f, "float64"),
            Self::Boolean => write!(f, "bool"),
            Self::Text => write!(f, "object"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with validity bitmap for missing values.
///
/// Missing positions hold a placeholder (0.0, false or an empty string)
/// that must be ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `f64` values; `integer` records whether every present value
    /// was a whole number at load time.
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
        integer: bool,
    },
    /// Boolean values.
    Boolean {
        values: Vec<bool>,
        validity: ValidityBitmap,
    },
    /// Text values.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates a floating-point numeric column.
    pub fn float(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric {
            values,
            validity,
            integer: false,
        }
    }

    /// Creates an integer numeric column.
    pub fn integer(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric {
            values,
            validity,
            integer: true,
        }
    }

    /// Creates a boolean column.
    pub fn boolean(values: Vec<bool>, validity: ValidityBitmap) -> Self {
        Self::Boolean { values, validity }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Returns the data type of this column.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { integer: true, .. } => DataType::Integer,
            Self::Numeric { integer: false, .. } => DataType::Float,
            Self::Boolean { .. } => DataType::Boolean,
            Self::Text { .. } => DataType::Text,
        }
    }

    /// Returns the number of rows in this column.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. }
            | Self::Boolean { validity, .. }
            | Self::Text { validity, .. } => validity,
        }
    }

    /// Returns the number of present values.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }
}

// ── NumericColumn ─────────────────────────────────────────────────────

/// Borrowed view of a numeric column, as consumed by the profiling core.
#[derive(Debug, Clone, Copy)]
pub struct NumericColumn<'a> {
    name: &'a str,
    values: &'a [f64],
    validity: &'a ValidityBitmap,
}

impl<'a> NumericColumn<'a> {
    /// Creates a view over raw values and their validity bitmap.
    pub fn new(name: &'a str, values: &'a [f64], validity: &'a ValidityBitmap) -> Self {
        Self {
            name,
            values,
            validity,
        }
    }

    /// Column name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Total number of rows, missing included.
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Value at row `idx`, or `None` when missing.
    ///
    /// A NaN stored under a valid bit counts as missing, so every
    /// consumer applies the same missingness rule.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<f64> {
        if self.validity.is_valid(idx) && !self.values[idx].is_nan() {
            Some(self.values[idx])
        } else {
            None
        }
    }

    /// The non-missing subsequence, in row order.
    pub fn present_values(&self) -> Vec<f64> {
        (0..self.row_count()).filter_map(|i| self.get(i)).collect()
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Column-major tabular data structure.
///
/// All columns have the same number of rows; [`add_column`](Self::add_column)
/// rejects a column of a different length.
#[derive(Debug, Clone)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Creates an empty DataFrame with no columns or rows.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Adds a named column to the DataFrame.
    ///
    /// Returns an error if the column length doesn't match the existing
    /// row count (unless this is the first column).
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), ProfileError> {
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(ProfileError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the DataFrame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns a reference to the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Result<&Column, ProfileError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| ProfileError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Returns an iterator over (name, column) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(|s| s.as_str()).zip(self.columns.iter())
    }

    /// Returns the name and data type of every column.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.iter().map(|(name, col)| (name, col.data_type())).collect()
    }

    /// Selects the numeric columns, preserving column order.
    ///
    /// Numeric columns without a single present value are still returned;
    /// boolean and text columns are skipped.
    pub fn numeric_columns(&self) -> Vec<NumericColumn<'_>> {
        self.iter()
            .filter_map(|(name, col)| match col {
                Column::Numeric {
                    values, validity, ..
                } => Some(NumericColumn::new(name, values, validity)),
                _ => None,
            })
            .collect()
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_boundary_64() {
        let bm = ValidityBitmap::all_valid(64);
        assert_eq!(bm.bits.len(), 1);
        assert_eq!(bm.valid_count(), 64);

        let bm65 = ValidityBitmap::all_valid(65);
        assert_eq!(bm65.bits.len(), 2);
        assert_eq!(bm65.valid_count(), 65);
        assert!(bm65.is_valid(64));
    }

    #[test]
    fn bitmap_push_across_word_boundary() {
        let mut bm = ValidityBitmap::empty();
        for i in 0..130 {
            bm.push(i % 4 != 0);
        }
        assert_eq!(bm.len(), 130);
        assert_eq!(bm.valid_count(), (0..130).filter(|i| i % 4 != 0).count());
        let first: Vec<bool> = (0..6).map(|i| bm.is_valid(i)).collect();
        assert_eq!(first, vec![false, true, true, true, false, true]);
        assert!(bm.is_valid(129));
    }

    #[test]
    fn all_invalid_bitmap() {
        let bm = ValidityBitmap::all_invalid(10);
        assert_eq!(bm.valid_count(), 0);
        assert!((0..10).all(|i| !bm.is_valid(i)));
    }

    #[test]
    fn column_length_mismatch() {
        let mut df = DataFrame::new();
        df.add_column(
            "x".into(),
            Column::float(vec![1.0, 2.0], ValidityBitmap::all_valid(2)),
        )
        .unwrap();

        let result = df.add_column(
            "y".into(),
            Column::float(vec![1.0, 2.0, 3.0], ValidityBitmap::all_valid(3)),
        );
        assert_eq!(
            result,
            Err(ProfileError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn numeric_columns_preserve_order_and_skip_others() {
        let mut df = DataFrame::new();
        df.add_column(
            "label".into(),
            Column::text(vec!["a".into(), "b".into()], ValidityBitmap::all_valid(2)),
        )
        .unwrap();
        df.add_column(
            "qty".into(),
            Column::integer(vec![1.0, 2.0], ValidityBitmap::all_valid(2)),
        )
        .unwrap();
        df.add_column(
            "ok".into(),
            Column::boolean(vec![true, false], ValidityBitmap::all_valid(2)),
        )
        .unwrap();
        df.add_column(
            "empty".into(),
            Column::float(vec![0.0, 0.0], ValidityBitmap::all_invalid(2)),
        )
        .unwrap();

        let names: Vec<&str> = df.numeric_columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["qty", "empty"]);
    }

    #[test]
    fn present_values_drop_missing_and_nan() {
        let mut validity = ValidityBitmap::all_valid(5);
        validity.set_invalid(1);
        let values = vec![1.0, 0.0, f64::NAN, 4.0, 5.0];
        let col = NumericColumn::new("x", &values, &validity);

        assert_eq!(col.row_count(), 5);
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(2), None);
        assert_eq!(col.present_values(), vec![1.0, 4.0, 5.0]);
    }

    #[test]
    fn schema_and_lookup() {
        let mut df = DataFrame::new();
        df.add_column(
            "n".into(),
            Column::integer(vec![1.0], ValidityBitmap::all_valid(1)),
        )
        .unwrap();
        df.add_column(
            "f".into(),
            Column::float(vec![1.5], ValidityBitmap::all_valid(1)),
        )
        .unwrap();

        assert_eq!(
            df.schema(),
            vec![("n", DataType::Integer), ("f", DataType::Float)]
        );
        assert_eq!(df.column_by_name("f").unwrap().data_type(), DataType::Float);
        assert!(matches!(
            df.column_by_name("missing"),
            Err(ProfileError::ColumnNotFound { .. })
        ));
        assert_eq!(DataType::Integer.to_string(), "int64");
    }
}
