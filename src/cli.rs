//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ProfileConfig;
use crate::error::ProfileError;

#[derive(Parser, Debug)]
#[command(name = "eda-report")]
#[command(about = "Exploratory data analysis report for a CSV or spreadsheet table", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Table to profile (.csv, .tsv, .xlsx, .xlsm, .xls, .ods)
    pub input: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the report, figures and JSON summary
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// CSV field delimiter
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Skip histogram figures
    #[arg(long)]
    pub no_figures: bool,

    /// Also write profile.json
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolves the run configuration: defaults, then the config file,
    /// then command-line flags.
    pub fn into_config(self) -> Result<ProfileConfig, ProfileError> {
        let mut config = match &self.config {
            Some(path) => ProfileConfig::from_toml_file(path)?,
            None => ProfileConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(sheet) = self.sheet {
            config.sheet = Some(sheet);
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.no_figures {
            config.render_figures = false;
        }
        if self.json {
            config.write_json = true;
        }

        config.validate()?;
        Ok(config)
    }
}
