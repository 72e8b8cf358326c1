use anyhow::{Context, Result};
use clap::Parser;
use eda_report::cli::Cli;
use eda_report::logging::init_logging;
use eda_report::pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("failed to initialize logging")?;

    let config = cli.into_config().context("invalid configuration")?;
    let summary = pipeline::run(&config)
        .with_context(|| format!("failed to profile {}", config.input.display()))?;

    if !summary.failed_figures.is_empty() {
        tracing::warn!(
            columns = ?summary.failed_figures,
            "some figures could not be rendered"
        );
    }
    println!("✅ EDA completado. Revisa {}", summary.report_path.display());
    Ok(())
}
