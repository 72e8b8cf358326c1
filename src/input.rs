//! Table loading.
//!
//! [`load_table`] picks a reader from the file extension: delimited text
//! goes through [`CsvParser`], spreadsheets through `calamine`. Spreadsheet
//! cells are stringified and run through the same type inference as CSV
//! fields, so both paths produce identically typed columns. Date, time and
//! duration cells are written out as calendar text, so those columns stay
//! out of the numeric profile.

use std::path::Path;

use calamine::{open_workbook_auto, DataType as Cell, Reader};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::config::ProfileConfig;
use crate::csv_parser::CsvParser;
use crate::dataframe::DataFrame;
use crate::error::ProfileError;

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited text using the configured delimiter.
    Csv,
    /// Tab-separated text.
    Tsv,
    /// Excel or OpenDocument workbook.
    Spreadsheet,
}

impl InputFormat {
    /// Detects the format from a path's extension (case-insensitive).
    ///
    /// ```
    /// use eda_report::input::InputFormat;
    ///
    /// assert_eq!(InputFormat::from_path("data/a.XLSX".as_ref()).unwrap(), InputFormat::Spreadsheet);
    /// assert_eq!(InputFormat::from_path("a.tsv".as_ref()).unwrap(), InputFormat::Tsv);
    /// assert!(InputFormat::from_path("a.parquet".as_ref()).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(ProfileError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            })),
        }
    }
}

/// Loads the configured input into a [`DataFrame`].
pub fn load_table(config: &ProfileConfig) -> Result<DataFrame, ProfileError> {
    let path = config.input.as_path();
    let format = InputFormat::from_path(path)?;
    tracing::info!(path = %path.display(), ?format, "loading table");

    let df = match format {
        InputFormat::Csv => CsvParser::new()
            .delimiter(config.delimiter as u8)
            .parse_file(path)?,
        InputFormat::Tsv => CsvParser::new().delimiter(b'\t').parse_file(path)?,
        InputFormat::Spreadsheet => read_spreadsheet(path, config.sheet.as_deref())?,
    };

    tracing::info!(
        rows = df.row_count(),
        columns = df.column_count(),
        "table loaded"
    );
    Ok(df)
}

// ── Spreadsheets ──────────────────────────────────────────────────────

/// Reads one worksheet (the first when `sheet` is `None`).
///
/// The first row is the header; the remaining rows are data.
pub fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame, ProfileError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ProfileError::Spreadsheet(format!("cannot open {}: {e}", path.display())))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ProfileError::Spreadsheet(format!("{} has no sheets", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ProfileError::Spreadsheet(format!("cannot read sheet '{sheet_name}': {e}")))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "read worksheet");

    frame_from_rows(rows)
}

/// Text form of one cell as fed to type inference.
///
/// Error cells (`#DIV/0!`, `#N/A`, ...) read as missing.
fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty | Cell::Error(_) => String::new(),
        Cell::String(s) | Cell::DateTimeIso(s) | Cell::DurationIso(s) => s.clone(),
        Cell::Int(i) => i.to_string(),
        Cell::Float(f) => f.to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::DateTime(serial) => excel_datetime(*serial),
        Cell::Duration(days) => excel_duration(*days),
    }
}

/// Day zero of the 1900 date system; calamine already shifts 1904 workbooks.
fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

fn excel_datetime(serial: f64) -> String {
    let datetime = TimeDelta::try_milliseconds((serial * 86_400_000.0).round() as i64)
        .zip(excel_epoch())
        .and_then(|(offset, epoch)| epoch.checked_add_signed(offset));
    match datetime {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("#FECHA({serial})"),
    }
}

/// `[-]H:MM:SS`, hours unbounded.
fn excel_duration(days: f64) -> String {
    let total = (days * 86_400.0).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();
    format!("{sign}{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// Builds a typed frame from stringified cells, first row as header.
fn frame_from_rows(mut rows: Vec<Vec<String>>) -> Result<DataFrame, ProfileError> {
    if rows.is_empty() {
        return Ok(DataFrame::new());
    }
    let headers = rows.remove(0);
    CsvParser::new().build_frame(headers, &rows, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::DataType;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn detects_formats() {
        assert_eq!(
            InputFormat::from_path(Path::new("x.csv")).expect("csv"),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x.ods")).expect("ods"),
            InputFormat::Spreadsheet
        );
        assert_eq!(
            InputFormat::from_path(Path::new("noext")),
            Err(ProfileError::UnsupportedFormat("noext".into()))
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x.json")),
            Err(ProfileError::UnsupportedFormat("json".into()))
        );
    }

    #[test]
    fn stringified_cells_are_inferred() {
        // calamine renders whole floats without a fractional part and empty
        // cells as "".
        let rows = vec![
            row(&["producto", "precio", "stock"]),
            row(&["a", "10.5", "3"]),
            row(&["b", "", "4"]),
            row(&["c", "7.25", "5"]),
        ];
        let df = frame_from_rows(rows).expect("frame");
        assert_eq!(df.row_count(), 3);
        assert_eq!(
            df.schema(),
            vec![
                ("producto", DataType::Text),
                ("precio", DataType::Float),
                ("stock", DataType::Integer)
            ]
        );
        assert_eq!(df.numeric_columns().len(), 2);
    }

    #[test]
    fn date_and_duration_cells_become_text() {
        assert_eq!(cell_text(&Cell::DateTime(45000.0)), "2023-03-15");
        assert_eq!(cell_text(&Cell::DateTime(45000.5)), "2023-03-15 12:00:00");
        assert_eq!(cell_text(&Cell::Duration(1.5)), "36:00:00");
        assert_eq!(cell_text(&Cell::Duration(-0.25)), "-6:00:00");
        assert_eq!(cell_text(&Cell::Float(3.0)), "3");
        assert_eq!(cell_text(&Cell::Empty), "");
        assert_eq!(
            cell_text(&Cell::Error(calamine::CellErrorType::Div0)),
            ""
        );
    }

    #[test]
    fn date_column_is_not_numeric() {
        let mut rows = vec![row(&["fecha", "precio"])];
        for i in 0..6 {
            rows.push(vec![
                cell_text(&Cell::DateTime(45000.0 + f64::from(i))),
                cell_text(&Cell::Float(10.0 + f64::from(i) / 4.0)),
            ]);
        }
        let df = frame_from_rows(rows).expect("frame");
        assert_eq!(
            df.schema(),
            vec![("fecha", DataType::Text), ("precio", DataType::Float)]
        );
        let numeric: Vec<&str> = df.numeric_columns().iter().map(|c| c.name()).collect();
        assert_eq!(numeric, vec!["precio"]);
    }

    #[test]
    fn reads_xlsx_workbook() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ventas.xlsx");
        write_workbook(&path);

        let df = read_spreadsheet(&path, None).expect("first sheet");
        assert_eq!(df.row_count(), 3);
        assert_eq!(
            df.schema(),
            vec![
                ("fecha", DataType::Text),
                ("precio", DataType::Float),
                ("producto", DataType::Text),
            ]
        );
        let numeric: Vec<&str> = df.numeric_columns().iter().map(|c| c.name()).collect();
        assert_eq!(numeric, vec!["precio"]);
        let precio = df.numeric_columns()[0].present_values();
        assert_eq!(precio, vec![10.5, 7.25, 12.0]);

        let named = read_spreadsheet(&path, Some("Ventas")).expect("named sheet");
        assert_eq!(named.column_names(), df.column_names());
        assert!(matches!(
            read_spreadsheet(&path, Some("Otra")),
            Err(ProfileError::Spreadsheet(_))
        ));
    }

    #[test]
    fn load_table_reads_xlsx_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("productos_limpios.xlsx");
        write_workbook(&path);

        let config = ProfileConfig {
            input: path,
            ..ProfileConfig::default()
        };
        let df = load_table(&config).expect("load");
        assert_eq!(df.column_count(), 3);
        assert_eq!(df.numeric_columns().len(), 1);
    }

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Ventas" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    // Style 1 uses built-in number format 14 (m/d/yyyy).
    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:C4"/><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>fecha</t></is></c><c r="B1" t="inlineStr"><is><t>precio</t></is></c><c r="C1" t="inlineStr"><is><t>producto</t></is></c></row>
<row r="2"><c r="A2" s="1"><v>45000</v></c><c r="B2"><v>10.5</v></c><c r="C2" t="inlineStr"><is><t>a</t></is></c></row>
<row r="3"><c r="A3" s="1"><v>45001</v></c><c r="B3"><v>7.25</v></c><c r="C3" t="inlineStr"><is><t>b</t></is></c></row>
<row r="4"><c r="A4" s="1"><v>45002</v></c><c r="B4"><v>12</v></c><c r="C4" t="inlineStr"><is><t>c</t></is></c></row>
</sheetData></worksheet>"#;

    fn write_workbook(path: &Path) {
        use std::io::Write;

        let file = std::fs::File::create(path).expect("create workbook");
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for (name, body) in [
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/styles.xml", STYLES),
            ("xl/worksheets/sheet1.xml", SHEET),
        ] {
            zip.start_file(name, options).expect("zip entry");
            zip.write_all(body.as_bytes()).expect("zip write");
        }
        zip.finish().expect("zip finish");
    }

    #[test]
    fn empty_sheet_is_empty_frame() {
        let df = frame_from_rows(Vec::new()).expect("frame");
        assert!(df.is_empty());
    }

    #[test]
    fn missing_workbook_is_spreadsheet_error() {
        let err = read_spreadsheet(Path::new("/nonexistent/book.xlsx"), None).unwrap_err();
        assert!(matches!(err, ProfileError::Spreadsheet(_)));
    }

    #[test]
    fn load_table_reads_csv_with_configured_delimiter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a;b\n1;2\n3;4\n").expect("write csv");

        let config = ProfileConfig {
            input: path,
            delimiter: ';',
            ..ProfileConfig::default()
        };
        let df = load_table(&config).expect("load");
        assert_eq!(df.column_names(), &["a", "b"]);
        assert_eq!(df.row_count(), 2);
    }

    #[test]
    fn load_table_rejects_unknown_extension() {
        let config = ProfileConfig {
            input: "data.parquet".into(),
            ..ProfileConfig::default()
        };
        assert_eq!(
            load_table(&config).unwrap_err(),
            ProfileError::UnsupportedFormat("parquet".into())
        );
    }
}
