//! Report assembly and rendering.
//!
//! [`assemble_report`] turns a [`ProfileResult`] into an ordered
//! [`Report`] of sections made of tables, bullet lists and text. The
//! structure (section order, table headers, one interpretation sentence
//! per distribution label) is fixed; turning it into markup is the job of a
//! [`ReportRenderer`] such as [`MarkdownRenderer`].
//!
//! Numbers are rounded half to even (3 decimals, 2 for outlier
//! percentages), printed without trailing zeros, and undefined values
//! print as `nan`.
//!
//! # Example
//!
//! ```
//! use eda_report::csv_parser::CsvParser;
//! use eda_report::pipeline::profile_table;
//! use eda_report::report::{assemble_report, MarkdownRenderer, ReportOptions, ReportRenderer};
//!
//! let df = CsvParser::new().parse_str("a,b\n1,2\n2,4\n3,6\n").unwrap();
//! let result = profile_table(&df);
//! let report = assemble_report(&result, &ReportOptions::default());
//! let markdown = MarkdownRenderer.render(&report);
//!
//! assert!(markdown.starts_with("# Reporte EDA\n"));
//! assert!(markdown.contains("|  | a | b |"));
//! ```

use serde::Serialize;

use crate::distribution::DistributionShape;
use crate::pipeline::ProfileResult;
use crate::profiling::round_to;

// ── Document model ────────────────────────────────────────────────────

/// Column alignment in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Right,
}

/// A small fixed-schema table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub align: Vec<Align>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str], align: Vec<Align>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            align,
            rows: Vec::new(),
        }
    }

    /// Left-aligned first column, right-aligned numbers after it.
    fn numeric(headers: Vec<String>) -> Self {
        let align = (0..headers.len())
            .map(|i| if i == 0 { Align::Left } else { Align::Right })
            .collect();
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    fn text(headers: &[&str]) -> Self {
        Self::new(headers, vec![Align::Left; headers.len()])
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Content block inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    /// Plain paragraph.
    Text(String),
    /// Emphasized placeholder shown when a section has no data.
    Placeholder(String),
    Table(Table),
    Bullets(Vec<String>),
}

/// A headed (or unheaded) run of blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Heading level: 2 for top-level sections, 3 for subsections.
    pub level: u8,
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(level: u8, heading: &str) -> Self {
        Self {
            level,
            heading: Some(heading.to_string()),
            blocks: Vec::new(),
        }
    }

    fn with(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// Ordered report document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

/// Presentation options not derived from the profile itself.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Appended to the title when set.
    pub timestamp: Option<String>,
    /// Figures directory as referenced from the report; `None` when no
    /// figures were written.
    pub figures_dir: Option<String>,
}

// ── Number formatting ─────────────────────────────────────────────────

/// Formats a statistic for display.
///
/// ```
/// use eda_report::report::format_number;
/// assert_eq!(format_number(3.14159, 3), "3.142");
/// assert_eq!(format_number(2.0, 3), "2");
/// assert_eq!(format_number(-0.0001, 3), "0");
/// assert_eq!(format_number(f64::NAN, 3), "nan");
/// ```
pub fn format_number(value: f64, decimals: i32) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let rounded = round_to(value, decimals);
    // Fold -0 into 0.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

fn stat(value: f64) -> String {
    format_number(value, 3)
}

// ── Fixed text ────────────────────────────────────────────────────────

const NO_STATS: &str = "No hay columnas numéricas para calcular estadísticas.";
const NO_INTERPRETATION: &str = "No hay datos numéricos para interpretar distribuciones.";
const NO_CORRELATION_ONE: &str = "No se calcularon correlaciones (solo una variable numérica).";
const NO_CORRELATION_NONE: &str = "No se calcularon correlaciones (no hay variables numéricas).";
const NO_OUTLIERS: &str = "No se detectaron outliers.";

/// Glossary shown before the per-column interpretation.
const DISTRIBUTION_GLOSSARY: [(&str, &str); 6] = [
    ("Normal", "campana simétrica"),
    ("Sesgada a la izquierda", "cola hacia valores pequeños"),
    ("Sesgada a la derecha", "cola hacia valores grandes"),
    ("Bimodal", "dos picos de frecuencia"),
    ("Multimodal", "múltiples picos de frecuencia"),
    ("Uniforme", "frecuencias similares"),
];

/// Headers of the per-column statistics table, after the row label.
pub const STATS_HEADERS: [&str; 7] = [
    "Mean",
    "Median",
    "Mode",
    "Standard Deviation",
    "Skewness",
    "Kurtosis",
    "Estimated Distribution",
];

/// Headers of the outlier table.
pub const OUTLIER_HEADERS: [&str; 3] = ["Column", "Outliers Detected", "Percentage"];

/// Narrative line for one column.
///
/// ```
/// use eda_report::distribution::DistributionShape;
/// use eda_report::report::interpretation_line;
/// assert_eq!(
///     interpretation_line("precio", DistributionShape::Normal),
///     "**precio**: Distribución normal (campana simétrica)."
/// );
/// ```
pub fn interpretation_line(column: &str, shape: DistributionShape) -> String {
    format!("**{column}**: {}", shape.interpretation())
}

// ── Assembly ──────────────────────────────────────────────────────────

/// Builds the report document from a profile.
pub fn assemble_report(result: &ProfileResult, options: &ReportOptions) -> Report {
    let title = match &options.timestamp {
        Some(ts) => format!("Reporte EDA — {ts}"),
        None => "Reporte EDA".to_string(),
    };

    let mut sections = Vec::new();
    sections.extend(exploration_sections(result));
    sections.extend(descriptive_sections(result));
    sections.extend(distribution_sections(result));
    sections.push(correlation_section(result));
    sections.push(outlier_section(result));
    sections.push(figures_section(options.figures_dir.as_deref()));

    Report { title, sections }
}

fn exploration_sections(result: &ProfileResult) -> Vec<Section> {
    let overview = &result.overview;
    let mut table = Table::new(
        &["Column", "Type", "Non-Null"],
        vec![Align::Left, Align::Left, Align::Right],
    );
    for col in &overview.columns {
        table.push(vec![
            col.name.clone(),
            col.data_type.to_string(),
            col.non_null.to_string(),
        ]);
    }

    let mut tools = Table::text(&["Función", "Propósito", "Resultado"]);
    for row in [
        ["describe_column", "Resumen completo", "Todas las estadísticas principales"],
        ["dataset_overview", "Información general", "Tipos y valores nulos"],
        ["detect_outliers", "Valores atípicos", "Conteo por columna (IQR)"],
        ["correlation_matrix", "Relaciones lineales", "Matriz de Pearson"],
    ] {
        table_row(&mut tools, &row);
    }

    vec![
        Section::new(2, "📊 Exploración de datos")
            .with(Block::Text(
                "Herramientas para exploración y análisis estadístico".into(),
            ))
            .with(Block::Table(tools)),
        Section::new(3, "Resumen del conjunto de datos")
            .with(Block::Text(format!(
                "Filas: {}, Columnas: {} ({} numéricas)",
                overview.row_count,
                overview.column_count,
                overview.numeric_count()
            )))
            .with(Block::Table(table)),
    ]
}

fn table_row(table: &mut Table, cells: &[&str]) {
    table.push(cells.iter().map(|c| c.to_string()).collect());
}

fn descriptive_sections(result: &ProfileResult) -> Vec<Section> {
    let mut measures = Table::text(&["Medida", "Función", "Descripción"]);
    for row in [
        ["Media", "stats::mean", "Promedio aritmético"],
        ["Mediana", "stats::median", "Valor central ordenado"],
        ["Moda", "stats::mode", "Valor más frecuente"],
        ["Desviación estándar", "stats::std_dev", "Dispersión promedio"],
        ["Asimetría", "stats::skewness", "Inclinación de la distribución"],
        ["Curtosis", "stats::kurtosis", "Peso de las colas frente a la normal"],
    ] {
        table_row(&mut measures, &row);
    }

    let results = if result.statistics.is_empty() {
        Block::Placeholder(NO_STATS.into())
    } else {
        let headers = std::iter::once(String::new())
            .chain(STATS_HEADERS.iter().map(|h| h.to_string()))
            .collect();
        let mut table = Table::numeric(headers);
        if let Some(last) = table.align.last_mut() {
            *last = Align::Left;
        }
        for s in &result.statistics {
            table.push(vec![
                s.name.clone(),
                stat(s.mean),
                stat(s.median),
                stat(s.mode),
                stat(s.std_dev),
                stat(s.skewness),
                stat(s.kurtosis),
                s.distribution.label().to_string(),
            ]);
        }
        Block::Table(table)
    };

    vec![
        Section::new(2, "📈 Medidas descriptivas")
            .with(Block::Text(
                "Resumen numérico de características principales".into(),
            ))
            .with(Block::Table(measures)),
        Section::new(3, "Resultados obtenidos por columna").with(results),
    ]
}

fn distribution_sections(result: &ProfileResult) -> Vec<Section> {
    let glossary = DISTRIBUTION_GLOSSARY
        .iter()
        .map(|(name, desc)| format!("**{name}**: {desc}"))
        .collect();

    let interpretation = if result.statistics.is_empty() {
        Block::Placeholder(NO_INTERPRETATION.into())
    } else {
        Block::Bullets(
            result
                .statistics
                .iter()
                .map(|s| interpretation_line(&s.name, s.distribution))
                .collect(),
        )
    };

    vec![
        Section::new(2, "📉 Tipos de distribuciones de datos")
            .with(Block::Text(
                "Muestran la forma en que se organizan los valores dentro de un conjunto de datos."
                    .into(),
            ))
            .with(Block::Bullets(glossary)),
        Section::new(3, "🧠 Interpretación automática").with(interpretation),
    ]
}

fn correlation_section(result: &ProfileResult) -> Section {
    let Some(matrix) = &result.correlation else {
        let message = if result.statistics.is_empty() {
            NO_CORRELATION_NONE
        } else {
            NO_CORRELATION_ONE
        };
        return Section::new(2, "📊 Correlaciones").with(Block::Placeholder(message.into()));
    };

    let headers = std::iter::once(String::new())
        .chain(matrix.names.iter().cloned())
        .collect();
    let mut table = Table::numeric(headers);
    for (name, row) in matrix.names.iter().zip(&matrix.values) {
        table.push(
            std::iter::once(name.clone())
                .chain(row.iter().map(|&r| stat(r)))
                .collect(),
        );
    }
    Section::new(2, "📊 Correlaciones (Pearson)").with(Block::Table(table))
}

fn outlier_section(result: &ProfileResult) -> Section {
    let section = Section::new(2, "📉 Outliers (Método IQR)");
    if result.outliers.is_empty() {
        return section.with(Block::Placeholder(NO_OUTLIERS.into()));
    }
    let mut table = Table::numeric(OUTLIER_HEADERS.iter().map(|h| h.to_string()).collect());
    for record in &result.outliers {
        table.push(vec![
            record.column.clone(),
            record.count.to_string(),
            format_number(record.percentage, 2),
        ]);
    }
    section.with(Block::Table(table))
}

fn figures_section(figures_dir: Option<&str>) -> Section {
    let text = match figures_dir {
        Some(dir) => format!("Gráficos guardados en carpeta {dir}"),
        None => "No se generaron gráficos.".to_string(),
    };
    Section {
        level: 2,
        heading: None,
        blocks: vec![Block::Placeholder(text)],
    }
}

// ── Rendering ─────────────────────────────────────────────────────────

/// Turns a [`Report`] into a concrete markup.
pub trait ReportRenderer {
    fn render(&self, report: &Report) -> String;
}

/// GitHub-flavoured markdown with pipe tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        let mut out = format!("# {}\n\n", report.title);
        for section in &report.sections {
            if let Some(heading) = &section.heading {
                let hashes = "#".repeat(usize::from(section.level.max(1)));
                out.push_str(&format!("{hashes} {heading}\n"));
            }
            for block in &section.blocks {
                render_block(&mut out, block);
            }
        }
        // Exactly one trailing newline.
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Text(text) => {
            out.push_str(text);
            out.push_str("\n\n");
        }
        Block::Placeholder(text) => {
            out.push_str(&format!("_{text}_\n\n"));
        }
        Block::Bullets(items) => {
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
            out.push('\n');
        }
        Block::Table(table) => {
            render_table(out, table);
            out.push('\n');
        }
    }
}

fn render_table(out: &mut String, table: &Table) {
    let row = |cells: &[String]| {
        let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
        format!("| {} |\n", cells.join(" | "))
    };
    out.push_str(&row(&table.headers));
    let rule: Vec<String> = (0..table.headers.len())
        .map(|i| match table.align.get(i) {
            Some(Align::Right) => "---:".to_string(),
            _ => ":---".to_string(),
        })
        .collect();
    out.push_str(&format!("|{}|\n", rule.join("|")));
    for r in &table.rows {
        out.push_str(&row(r));
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\n', '\r'], " ")
}

// ── Tests ─────────────────────────────────────────────────────────────
