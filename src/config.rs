//! Run configuration.
//!
//! A [`ProfileConfig`] carries every run-scoped setting (input path,
//! output locations, figure options) into [`pipeline::run`](crate::pipeline::run).
//! It can be loaded from TOML; absent keys take their defaults.
//!
//! ```
//! use eda_report::config::ProfileConfig;
//!
//! let config = ProfileConfig::from_toml_str(r#"
//!     input = "data/sales.csv"
//!     delimiter = ";"
//!     render_figures = false
//! "#).unwrap();
//! assert_eq!(config.delimiter, ';');
//! assert_eq!(config.report_file, "EDA_report.md");
//! assert_eq!(config.figures_path(), std::path::Path::new("eda_output/figs"));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Name of the JSON summary written next to the report.
pub const JSON_FILE: &str = "profile.json";

/// Settings for one profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Table to profile (`.csv`, `.tsv`, `.xlsx`, `.xlsm`, `.xls`, `.ods`).
    pub input: PathBuf,
    /// Directory receiving the report, figures and JSON summary.
    pub output_dir: PathBuf,
    /// Figures directory, relative to `output_dir`.
    pub figures_dir: PathBuf,
    /// Report file name inside `output_dir`.
    pub report_file: String,
    /// Worksheet to read; the first sheet when unset.
    pub sheet: Option<String>,
    /// CSV field delimiter.
    pub delimiter: char,
    /// Render one histogram per numeric column.
    pub render_figures: bool,
    /// Also write the profile as JSON.
    pub write_json: bool,
    /// Figure width in pixels.
    pub figure_width: u32,
    /// Figure height in pixels.
    pub figure_height: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/productos_limpios.xlsx"),
            output_dir: PathBuf::from("eda_output"),
            figures_dir: PathBuf::from("figs"),
            report_file: "EDA_report.md".to_string(),
            sheet: None,
            delimiter: ',',
            render_figures: true,
            write_json: false,
            figure_width: 640,
            figure_height: 480,
        }
    }
}

impl ProfileConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ProfileError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProfileError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Checks settings that would otherwise fail late in the run.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.report_file.trim().is_empty() {
            return Err(ProfileError::Config("report_file must not be empty".into()));
        }
        if self.figure_width == 0 || self.figure_height == 0 {
            return Err(ProfileError::Config(format!(
                "figure size must be non-zero, got {}x{}",
                self.figure_width, self.figure_height
            )));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ProfileError::Config(format!(
                "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Full path of the figures directory.
    pub fn figures_path(&self) -> PathBuf {
        self.output_dir.join(&self.figures_dir)
    }

    /// Full path of the markdown report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    /// Full path of the JSON summary.
    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(JSON_FILE)
    }

    /// Figures directory as referenced from inside the report, with a
    /// trailing slash.
    pub fn figures_label(&self) -> String {
        let label = self.figures_dir.to_string_lossy().replace('\\', "/");
        if label.ends_with('/') {
            label
        } else {
            format!("{label}/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProfileConfig::default();
        assert_eq!(config.input, PathBuf::from("data/productos_limpios.xlsx"));
        assert_eq!(config.report_path(), PathBuf::from("eda_output/EDA_report.md"));
        assert_eq!(config.json_path(), PathBuf::from("eda_output/profile.json"));
        assert_eq!(config.figures_label(), "figs/");
        assert!(config.render_figures);
        assert!(!config.write_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let config = ProfileConfig::from_toml_str("").expect("empty toml");
        assert_eq!(config, ProfileConfig::default());
    }

    #[test]
    fn partial_document_overrides_keys() {
        let config = ProfileConfig::from_toml_str(
            r#"
            output_dir = "out"
            sheet = "Ventas"
            write_json = true
            figure_width = 800
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.sheet.as_deref(), Some("Ventas"));
        assert!(config.write_json);
        assert_eq!(config.figure_width, 800);
        assert_eq!(config.figure_height, 480);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = ProfileConfig::from_toml_str("figure_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ProfileError::Config(_)));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let zero = ProfileConfig {
            figure_height: 0,
            ..ProfileConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ProfileError::Config(_))));

        let unnamed = ProfileConfig {
            report_file: "  ".into(),
            ..ProfileConfig::default()
        };
        assert!(unnamed.validate().is_err());

        let quote = ProfileConfig {
            delimiter: '"',
            ..ProfileConfig::default()
        };
        assert!(quote.validate().is_err());

        let unicode = ProfileConfig {
            delimiter: '§',
            ..ProfileConfig::default()
        };
        assert!(unicode.validate().is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ProfileConfig::from_toml_file("/nonexistent/eda.toml").unwrap_err();
        assert!(matches!(err, ProfileError::Config(ref m) if m.contains("eda.toml")));
    }
}
