mod bootstrap;

use anyhow::{Context, Result};
use stats_core::settings::Settings;
use stats_data::analysis;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("spotify-stats v{} starting", env!("CARGO_PKG_VERSION"));
    for warning in &settings.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!("Settings: {:?}", settings);

    let config = settings.into_run_config()?;
    tracing::info!(
        "Year: {}, day: {}, inputs: {}",
        config.year,
        config
            .day
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        config.input_paths.len()
    );

    // Any missing or malformed input aborts here with a non-zero exit;
    // nothing is printed for a partial history.
    let report = analysis::run(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    stats_report::render(&mut out, &report, config.format).context("Failed to write report")?;

    Ok(())
}
