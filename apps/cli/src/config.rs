//! Configuration for the patient-search CLI
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `patient-search.toml` in the working directory (or the `--config` file)
//! 3. `PATIENT_SEARCH__*` environment variables, e.g. `PATIENT_SEARCH__FHIR__BASE_URL`
//!    (`./.env`, or the `--env-file` file, is loaded into the environment first;
//!    variables already set win over the file)
//! 4. command-line flags

use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use ferrum_client::{ClientConfig, IterationPlan, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "patient-search";
const ENV_PREFIX: &str = "PATIENT_SEARCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub fhir: FhirConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FhirConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Family name searched when no names file is given
    pub family_name: String,
    /// Names file used when the file argument is blank
    pub names_file: PathBuf,
    pub iterations: u32,
    pub disable_cache_on_final_iteration: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: PathBuf,
    pub file_prefix: String,
    /// daily | hourly | minutely | never
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: PathBuf::from("logs"),
            file_prefix: "patient-search".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let logging = LoggingConfig::default();
    config::Config::builder()
        .set_default("fhir.base_url", DEFAULT_BASE_URL)?
        .set_default("fhir.timeout_seconds", 30)?
        .set_default("search.family_name", "SMITH")?
        .set_default("search.names_file", "SampleClient-FamilyNames.txt")?
        .set_default("search.iterations", 3)?
        .set_default("search.disable_cache_on_final_iteration", true)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.json", logging.json)?
        .set_default("logging.file_enabled", logging.file_enabled)?
        .set_default("logging.file_directory", "logs")?
        .set_default("logging.file_prefix", logging.file_prefix)?
        .set_default("logging.file_rotation", logging.file_rotation)
}

impl Config {
    /// Built-in defaults only.
    #[cfg(test)]
    pub fn defaults() -> anyhow::Result<Self> {
        with_defaults()?
            .build()?
            .try_deserialize()
            .context("Failed to deserialize default configuration")
    }

    /// Load defaults, the config file and the environment.
    ///
    /// Explicitly named files must exist; the default config file and
    /// `./.env` are optional.
    pub fn load(file: Option<&Path>, env_file: Option<&Path>) -> anyhow::Result<Self> {
        load_env_file(env_file)?;

        let builder = with_defaults()?;
        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Apply command-line overrides.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.fhir.base_url = base_url.clone();
        }
        if let Some(family) = &cli.family {
            self.search.family_name = family.clone();
        }
        if let Some(iterations) = cli.iterations {
            self.search.iterations = iterations;
        }
        if cli.keep_cache_on_final {
            self.search.disable_cache_on_final_iteration = false;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if cli.log_json {
            self.logging.json = true;
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fhir.base_url.trim().is_empty() {
            return Err("fhir.base_url must not be empty".to_string());
        }
        if !self.fhir.base_url.starts_with("http://") && !self.fhir.base_url.starts_with("https://")
        {
            return Err(format!(
                "fhir.base_url must be an http(s) URL, got '{}'",
                self.fhir.base_url
            ));
        }
        if self.fhir.timeout_seconds == 0 {
            return Err("fhir.timeout_seconds must be greater than 0".to_string());
        }
        if self.search.iterations == 0 {
            return Err("search.iterations must be at least 1".to_string());
        }
        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(format!(
                "logging.level must be one of off, error, warn, info, debug, trace; got '{}'",
                self.logging.level
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.fhir.base_url.as_str())
            .with_timeout(Duration::from_secs(self.fhir.timeout_seconds))
    }

    pub fn iteration_plan(&self) -> IterationPlan {
        IterationPlan {
            iterations: self.search.iterations,
            disable_cache_on_final: self.search.disable_cache_on_final_iteration,
        }
    }
}

/// Load `.env` (or the given file) into the process environment.
fn load_env_file(env_file: Option<&Path>) -> anyhow::Result<()> {
    let result = match env_file {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    check_env_file(result, env_file.is_some())
}

/// Only a missing default `.env` is tolerated; parse errors always fail.
fn check_env_file(result: Result<PathBuf, dotenvy::Error>, required: bool) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() && !required => Ok(()),
        Err(e) => Err(e).context("Failed to load environment file"),
    }
}
