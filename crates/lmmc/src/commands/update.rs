//! Update command

use anyhow::{Context, Result};
use lmmc_core::{OutputFormat, RuntimeConfig};
use lmmc_update::{UpdateOptions, UpdateOutcome, UpdatePhase, Updater};

use crate::cli::UpdateArgs;
use crate::format::{formatter_for, UpdateReport};
use crate::output;

pub async fn run(
    args: UpdateArgs,
    config: &RuntimeConfig,
    format: OutputFormat,
    interactive: bool,
) -> Result<()> {
    let options = UpdateOptions::from(&args);

    let mut updater = Updater::new(config.clone()).with_progress(interactive);

    let spinner = interactive.then(|| output::spinner("Checking for updates..."));
    if let Some(spinner) = spinner.clone() {
        updater = updater.on_phase(move |phase| match phase {
            UpdatePhase::Downloading | UpdatePhase::Done | UpdatePhase::Failed => {
                spinner.finish_and_clear()
            }
            UpdatePhase::Extracting => output::info("Extracting binary..."),
            UpdatePhase::BackingUp => output::info("Backing up current binary..."),
            UpdatePhase::Installing => output::info("Installing new binary..."),
            UpdatePhase::Checking => {}
        });
    }

    let result = updater.run(&options).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let outcome = result.context("Update failed")?;

    let report = UpdateReport::new(outcome);
    println!("{}", formatter_for(format).format(&report)?);

    if interactive {
        match &report.outcome {
            UpdateOutcome::Updated { .. } => output::success(&report.message()),
            UpdateOutcome::DevBuildSkipped => output::warning(&report.message()),
            UpdateOutcome::Available { .. } => {
                output::info("Run 'lmmc update' without --dry-run to install it")
            }
            UpdateOutcome::AlreadyLatest { .. } => {}
        }
    }

    Ok(())
}
