//! patient-search - FHIR Patient search client
//!
//! Without arguments, searches one family name and lists the matching
//! patients. With a names file, times searches for every name over several
//! passes and reports the average latency per pass.

mod cli;
mod config;
mod logging;
mod output;

use anyhow::Context;
use clap::Parser;
use ferrum_client::{parse_family_names, run_iterations, CacheControl, FhirClient, PatientSearch};
use std::path::Path;
use std::process::ExitCode;

use crate::cli::{Cli, Mode};
use crate::config::Config;

/// Exit status for any failed run
const FAILURE_EXIT_CODE: u8 = 9;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };

    let _logging_guard = match logging::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {e:#}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging writes to stderr from here on
            tracing::error!(error = %format!("{e:#}"), "Run failed");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(cli.config.as_deref(), cli.env_file.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(cli);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

async fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.fhir.base_url,
        "Starting patient search"
    );

    match cli.mode(config) {
        Mode::List { family } => list_patients(config, &family).await,
        Mode::Timing { names_file } => time_searches(config, &names_file).await,
    }
}

async fn list_patients(config: &Config, family: &str) -> anyhow::Result<()> {
    let client =
        FhirClient::with_config(&config.client_config()).context("Failed to create FHIR client")?;

    let (bundle, elapsed) = client
        .search_patients_by_family(family, CacheControl::default())
        .await
        .with_context(|| format!("Patient search for family name '{family}' failed"))?
        .into_parts();

    tracing::info!(
        family,
        total = bundle.total_or_zero(),
        entries = bundle.entry_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Patient search finished"
    );

    let lines = output::patient_lines(&bundle).context("Failed to read search results")?;
    output::write_lines(&mut std::io::stdout().lock(), lines)?;
    Ok(())
}

async fn time_searches(config: &Config, names_file: &Path) -> anyhow::Result<()> {
    let names = parse_family_names(names_file)?;
    tracing::info!(
        path = %names_file.display(),
        count = names.len(),
        "Loaded family names"
    );

    let client_config = config.client_config();
    let reports = run_iterations(&names, &config.iteration_plan(), || {
        FhirClient::with_config(&client_config)
    })
    .await
    .context("Timed search failed")?;

    output::write_lines(
        &mut std::io::stdout().lock(),
        reports.iter().map(output::iteration_line),
    )?;
    Ok(())
}
