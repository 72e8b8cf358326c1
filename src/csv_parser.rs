//! CSV parser with automatic type inference.
//!
//! Parses CSV text into a [`DataFrame`](crate::dataframe::DataFrame) with
//! column types inferred from content. The inference priority is:
//! Integer → Float → Boolean → Text.
//!
//! # Features
//!
//! - RFC 4180 compliant (quoted fields, escaped quotes, delimiters in fields)
//! - Automatic type inference per column
//! - Standard null markers recognized: empty, `NA`, `N/A`, `null`, `NULL`, `None`, `NaN`, `#N/A`, `.`
//! - Configurable delimiter and null markers
//! - Blank headers become `Unnamed: <i>`; repeated headers get a `.1`, `.2`, ... suffix
//!
//! Integer columns are those whose every cell is present and parses as a
//! whole number; a numeric column with any missing cell is Float.
//!
//! # Example
//!
//! ```
//! use eda_report::csv_parser::CsvParser;
//! use eda_report::dataframe::DataType;
//!
//! let csv = "name,qty,price,active\nAlice,3,1.5,true\nBob,4,2.3,false\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! assert_eq!(df.row_count(), 2);
//! assert_eq!(df.column_by_name("name").unwrap().data_type(), DataType::Text);
//! assert_eq!(df.column_by_name("qty").unwrap().data_type(), DataType::Integer);
//! assert_eq!(df.column_by_name("price").unwrap().data_type(), DataType::Float);
//! assert_eq!(df.column_by_name("active").unwrap().data_type(), DataType::Boolean);
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::dataframe::{Column, DataFrame, DataType, ValidityBitmap};
use crate::error::ProfileError;

/// Standard null value markers recognized during parsing.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", ".", "NaN", "nan", "NAN",
    "#N/A", "#NA",
];

/// CSV parser configuration and entry point.
///
/// ```
/// use eda_report::csv_parser::CsvParser;
///
/// let csv = "a;b\n1;2\n3;4\n";
/// let df = CsvParser::new().delimiter(b';').parse_str(csv).unwrap();
/// assert_eq!(df.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvParser {
    /// Creates a parser with default settings (comma delimiter, header row, standard null markers).
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true).
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Sets custom null markers (replaces defaults).
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Parses a CSV string into a DataFrame.
    pub fn parse_str(&self, input: &str) -> Result<DataFrame, ProfileError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let mut raw_rows = self.parse_raw(input);
        if raw_rows.is_empty() {
            return Ok(DataFrame::new());
        }

        let (headers, first_line) = if self.has_header {
            (raw_rows.remove(0), 2)
        } else {
            let n_cols = raw_rows[0].len();
            ((0..n_cols).map(|i| format!("col_{i}")).collect(), 1)
        };

        self.build_frame(headers, &raw_rows, first_line)
    }

    /// Parses a CSV file from disk into a DataFrame.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataFrame, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Builds a typed DataFrame from a header row and raw string rows.
    ///
    /// `first_line` is the 1-based source line of `rows[0]`, used in
    /// error messages. Every row must have as many fields as `headers`.
    pub fn build_frame(
        &self,
        headers: Vec<String>,
        rows: &[Vec<String>],
        first_line: usize,
    ) -> Result<DataFrame, ProfileError> {
        let headers = normalize_headers(headers);
        let n_cols = headers.len();

        let mut raw_columns: Vec<Vec<&str>> = vec![Vec::with_capacity(rows.len()); n_cols];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(ProfileError::CsvParse {
                    line: first_line + row_idx,
                    message: format!("expected {n_cols} fields, got {}", row.len()),
                });
            }
            for (col_idx, field) in row.iter().enumerate() {
                raw_columns[col_idx].push(field.as_str());
            }
        }

        let mut df = DataFrame::new();
        for (name, raw_col) in headers.into_iter().zip(raw_columns.iter()) {
            let col = self.build_column(raw_col);
            df.add_column(name, col)?;
        }

        tracing::debug!(
            rows = df.row_count(),
            columns = df.column_count(),
            "parsed table"
        );
        Ok(df)
    }

    // ── Internal parsing ─────────────────────────────────────────

    /// Parses raw CSV text into rows of string fields.
    fn parse_raw(&self, input: &str) -> Vec<Vec<String>> {
        let delim = self.delimiter as char;
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut current_row: Vec<String> = Vec::new();
        let mut current_field = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();

        let end_row = |row: &mut Vec<String>, rows: &mut Vec<Vec<String>>| {
            // Leading blank lines are skipped; later ones are kept as rows.
            if !row.iter().all(|f| f.is_empty()) || !rows.is_empty() {
                rows.push(std::mem::take(row));
            } else {
                row.clear();
            }
        };

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current_field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    current_field.push(c);
                }
            } else if c == '"' && current_field.is_empty() {
                in_quotes = true;
            } else if c == delim {
                current_row.push(std::mem::take(&mut current_field));
            } else if c == '\n' {
                current_row.push(std::mem::take(&mut current_field));
                end_row(&mut current_row, &mut rows);
            } else if c == '\r' {
                // \r\n is handled by the \n branch; a lone \r ends the row.
                if chars.peek() != Some(&'\n') {
                    current_row.push(std::mem::take(&mut current_field));
                    end_row(&mut current_row, &mut rows);
                }
            } else {
                current_field.push(c);
            }
        }

        if !current_field.is_empty() || !current_row.is_empty() {
            current_row.push(current_field);
            rows.push(current_row);
        }

        while rows.last().is_some_and(|r| r.iter().all(|f| f.is_empty())) {
            rows.pop();
        }

        rows
    }

    /// Checks if a trimmed value is a null marker.
    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    /// Infers the column type and builds a typed Column.
    fn build_column(&self, raw_values: &[&str]) -> Column {
        let n = raw_values.len();
        let trimmed: Vec<&str> = raw_values.iter().map(|s| s.trim()).collect();
        let null_flags: Vec<bool> = trimmed.iter().map(|s| self.is_null(s)).collect();

        let non_null_count = null_flags.iter().filter(|&&is_null| !is_null).count();
        if non_null_count == 0 {
            // An all-missing column reads as float; a column without rows as text.
            return if n == 0 {
                Column::text(Vec::new(), ValidityBitmap::empty())
            } else {
                Column::float(vec![0.0; n], ValidityBitmap::all_invalid(n))
            };
        }

        match infer_type(&trimmed, &null_flags) {
            DataType::Integer => build_numeric_column(&trimmed, &null_flags, true),
            DataType::Float => build_numeric_column(&trimmed, &null_flags, false),
            DataType::Boolean => build_boolean_column(&trimmed, &null_flags),
            DataType::Text => build_text_column(&trimmed, &null_flags),
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helper functions ──────────────────────────────────────────────────

/// Determines the most specific type that fits all non-null values.
fn infer_type(values: &[&str], null_flags: &[bool]) -> DataType {
    let mut non_null = values
        .iter()
        .zip(null_flags.iter())
        .filter(|(_, &is_null)| !is_null)
        .map(|(&v, _)| v);

    if non_null.clone().all(|s| s.parse::<f64>().is_ok()) {
        let complete = null_flags.iter().all(|&is_null| !is_null);
        if complete && non_null.clone().all(|s| s.parse::<i64>().is_ok()) {
            return DataType::Integer;
        }
        return DataType::Float;
    }

    if non_null.all(is_boolean_str) {
        return DataType::Boolean;
    }

    DataType::Text
}

fn build_numeric_column(values: &[&str], null_flags: &[bool], integer: bool) -> Column {
    let mut nums = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (&val, &is_null) in values.iter().zip(null_flags) {
        match val.parse::<f64>() {
            Ok(v) if !is_null => {
                nums.push(v);
                validity.push(true);
            }
            _ => {
                nums.push(0.0);
                validity.push(false);
            }
        }
    }

    if integer {
        Column::integer(nums, validity)
    } else {
        Column::float(nums, validity)
    }
}

fn build_boolean_column(values: &[&str], null_flags: &[bool]) -> Column {
    let mut bools = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (&val, &is_null) in values.iter().zip(null_flags) {
        bools.push(!is_null && parse_boolean_str(val));
        validity.push(!is_null);
    }

    Column::boolean(bools, validity)
}

fn build_text_column(values: &[&str], null_flags: &[bool]) -> Column {
    let mut texts = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (&val, &is_null) in values.iter().zip(null_flags) {
        texts.push(if is_null { String::new() } else { val.to_string() });
        validity.push(!is_null);
    }

    Column::text(texts, validity)
}

/// Fills blank headers and disambiguates repeated ones.
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {i}"),
            h => h.to_string(),
        };
        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{base}.{count}");
        }
        seen.insert(name.clone(), 0);
        out.push(name);
    }
    out
}

/// Checks if a string represents a boolean value.
fn is_boolean_str(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "t" | "f" | "y" | "n"
    )
}

/// Parses a boolean string to `bool`.
fn parse_boolean_str(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "yes" | "t" | "y")
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> DataFrame {
        CsvParser::new().parse_str(csv).expect("valid csv")
    }

    fn numbers(df: &DataFrame, name: &str) -> Vec<f64> {
        match df.column_by_name(name).expect("column") {
            Column::Numeric { values, .. } => values.clone(),
            other => panic!("{name} is {}", other.data_type()),
        }
    }

    fn flags(df: &DataFrame, name: &str) -> Vec<bool> {
        match df.column_by_name(name).expect("column") {
            Column::Boolean { values, .. } => values.clone(),
            other => panic!("{name} is {}", other.data_type()),
        }
    }

    fn texts(df: &DataFrame, name: &str) -> Vec<String> {
        match df.column_by_name(name).expect("column") {
            Column::Text { values, .. } => values.clone(),
            other => panic!("{name} is {}", other.data_type()),
        }
    }

    fn null_count(column: &Column) -> usize {
        column.len() - column.valid_count()
    }

    // ── Basic CSV parsing ────────────────────────────────────────

    #[test]
    fn parse_simple_csv() {
        let df = parse("a,b,c\n1,2,3\n4,5,6\n");
        assert_eq!(df.row_count(), 2);
        assert_eq!(df.column_count(), 3);
        assert_eq!(df.column_names(), &["a", "b", "c"]);
    }

    #[test]
    fn parse_numeric_columns() {
        let df = parse("x,y\n1.5,2\n3.1,-4\n0,100\n");
        let x = df.column_by_name("x").expect("x");
        assert_eq!(x.data_type(), DataType::Float);
        assert_eq!(numbers(&df, "x"), vec![1.5, 3.1, 0.0]);
        let y = df.column_by_name("y").expect("y");
        assert_eq!(y.data_type(), DataType::Integer);
    }

    #[test]
    fn missing_cell_makes_integer_column_float() {
        let df = parse("qty\n1\n\n3\n");
        let qty = df.column_by_name("qty").expect("qty");
        assert_eq!(qty.data_type(), DataType::Float);
        assert_eq!(qty.valid_count(), 2);
    }

    #[test]
    fn parse_boolean_column() {
        let df = parse("flag\ntrue\nfalse\nyes\nno\n");
        let flag = df.column_by_name("flag").expect("flag");
        assert_eq!(flag.data_type(), DataType::Boolean);
        assert_eq!(flags(&df, "flag"), vec![true, false, true, false]);
    }

    #[test]
    fn parse_text_column() {
        let df = parse("status\nA\nB\nA\nC\n");
        let status = df.column_by_name("status").expect("status");
        assert_eq!(status.data_type(), DataType::Text);
        assert_eq!(texts(&df, "status")[3], "C");
    }

    // ── Null handling ────────────────────────────────────────────

    #[test]
    fn parse_null_markers() {
        let df = parse("x\n1.0\nNA\n3.0\n\n5.0\nnull\n");
        let x = df.column_by_name("x").expect("x");
        assert_eq!(x.data_type(), DataType::Float);
        assert_eq!(null_count(x), 3);
        let valid: Vec<bool> = (0..6).map(|i| x.validity().is_valid(i)).collect();
        assert_eq!(valid, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn all_null_column_is_float() {
        let df = parse("x,y\nNA,1\n,2\nnull,3\n");
        let x = df.column_by_name("x").expect("x");
        assert_eq!(x.data_type(), DataType::Float);
        assert_eq!(x.valid_count(), 0);
    }

    #[test]
    fn nan_marker_as_null() {
        let df = parse("x\n1.0\nNaN\n3.0\n");
        let x = df.column_by_name("x").expect("x");
        assert_eq!(null_count(x), 1);
        assert!(!x.validity().is_valid(1));
    }

    #[test]
    fn custom_null_markers() {
        let df = CsvParser::new()
            .null_markers(vec!["-999".to_string()])
            .parse_str("x\n1.0\n-999\n3.0\n")
            .expect("valid csv");
        let x = df.column_by_name("x").expect("x");
        assert_eq!(null_count(x), 1);
        assert!(!x.validity().is_valid(1));
    }

    // ── Quoted fields ────────────────────────────────────────────

    #[test]
    fn parse_quoted_fields() {
        let df = parse("name,desc\nAlice,\"hello, world\"\nBob,\"she said \"\"hi\"\"\"\n");
        let desc = texts(&df, "desc");
        assert_eq!(desc[0], "hello, world");
        assert_eq!(desc[1], "she said \"hi\"");
    }

    #[test]
    fn parse_quoted_newlines() {
        let df = parse("name,note\nAlice,\"line1\nline2\"\nBob,simple\n");
        assert_eq!(df.row_count(), 2);
        let note = texts(&df, "note");
        assert_eq!(note[0], "line1\nline2");
    }

    // ── Headers ──────────────────────────────────────────────────

    #[test]
    fn blank_and_repeated_headers() {
        let df = parse("a,,a,a\n1,2,3,4\n");
        assert_eq!(df.column_names(), &["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn parse_without_header() {
        let df = CsvParser::new()
            .has_header(false)
            .parse_str("1,2\n3,4\n")
            .expect("valid csv");
        assert_eq!(df.row_count(), 2);
        assert_eq!(df.column_names(), &["col_0", "col_1"]);
    }

    #[test]
    fn parse_header_only_keeps_columns() {
        let df = parse("a,b,c\n");
        assert_eq!(df.row_count(), 0);
        assert_eq!(df.column_count(), 3);
        assert!(df.numeric_columns().is_empty());
    }

    // ── Edge cases ───────────────────────────────────────────────

    #[test]
    fn parse_crlf_line_endings() {
        let df = parse("a,b\r\n1,2\r\n3,4\r\n");
        assert_eq!(df.row_count(), 2);
        assert_eq!(numbers(&df, "a"), vec![1.0, 3.0]);
    }

    #[test]
    fn parse_no_trailing_newline() {
        assert_eq!(parse("x\n1\n2\n3").row_count(), 3);
    }

    #[test]
    fn parse_bom() {
        assert_eq!(parse("\u{feff}x,y\n1,2\n").column_names(), &["x", "y"]);
    }

    #[test]
    fn parse_empty_csv() {
        let df = parse("");
        assert_eq!(df.row_count(), 0);
        assert_eq!(df.column_count(), 0);
    }

    #[test]
    fn ragged_row_reports_source_line() {
        let err = CsvParser::new().parse_str("a,b\n1,2\n3\n").unwrap_err();
        assert_eq!(
            err,
            ProfileError::CsvParse {
                line: 3,
                message: "expected 2 fields, got 1".into()
            }
        );
    }

    #[test]
    fn parse_tab_delimiter() {
        let df = CsvParser::new()
            .delimiter(b'\t')
            .parse_str("a\tb\n1\t2\n3\t4\n")
            .expect("valid tsv");
        assert_eq!(df.column_names(), &["a", "b"]);
    }

    // ── Type inference edge cases ────────────────────────────────

    #[test]
    fn numeric_with_surrounding_spaces() {
        let df = parse("x\n  1.5  \n  2.3  \n");
        assert_eq!(numbers(&df, "x"), vec![1.5, 2.3]);
    }

    #[test]
    fn single_non_numeric_demotes_to_text() {
        let df = parse("x\n1\n2\nthree\n4\n");
        assert_eq!(df.column_by_name("x").expect("x").data_type(), DataType::Text);
    }

    #[test]
    fn boolean_mixed_formats() {
        let df = parse("x\ntrue\nFalse\nYes\nno\nT\nf\n");
        assert_eq!(flags(&df, "x"), vec![true, false, true, false, true, false]);
    }

    #[test]
    fn negative_and_scientific_notation() {
        let df = parse("x\n-1.5\n2.3e10\n-4.5E-3\n");
        let x = numbers(&df, "x");
        assert_eq!(x[0], -1.5);
        assert!((x[1] - 2.3e10).abs() < 1.0);
        assert!((x[2] + 4.5e-3).abs() < 1e-10);
    }
}
