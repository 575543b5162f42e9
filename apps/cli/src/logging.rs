//! Logging initialization for the patient-search CLI
//!
//! Log records go to stderr (and optionally a rotating file) so stdout only
//! carries search results. `RUST_LOG` overrides the configured level.

use std::fs;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer flushing until the program exits.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize logging from `LoggingConfig`
///
/// Supports JSON or human-readable formats, and file logging with rotation
/// (daily, hourly, minutely, never).
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    // Build environment filter
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    let file_guard = if config.json {
        init_json_logging_with_subscriber(subscriber, config)?
    } else {
        init_human_logging_with_subscriber(subscriber, config)?
    };

    tracing::debug!(
        level = %config.level,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Build environment filter
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(config)))
}

fn default_directives(config: &LoggingConfig) -> String {
    // Keep reqwest/hyper chatter out unless explicitly requested via RUST_LOG
    format!(
        "warn,patient_search={},ferrum_client={},ferrum_models={}",
        config.level, config.level, config.level
    )
}

/// Initialize JSON logging with a pre-configured subscriber
fn init_json_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    let console_layer = fmt::layer()
        .json()
        .with_current_span(true) // Include span fields
        .with_span_list(false) // Full span list is too verbose
        .with_writer(std::io::stderr);

    if config.file_enabled {
        // Console + File logging (JSON)
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        // Console only (JSON)
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

/// Initialize human-readable logging with a pre-configured subscriber
fn init_human_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr); // stdout is reserved for results

    if config.file_enabled {
        // Console + File logging (human-readable)
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false) // No ANSI colors in files
            .with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        // Console only (human-readable)
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

/// Create file appender with rotation
fn create_file_appender(
    config: &LoggingConfig,
) -> anyhow::Result<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    // Create log directory if it doesn't exist
    fs::create_dir_all(&config.file_directory)?;

    // Create rotating file appender; unknown rotations fall back to daily
    let file_appender = match config.file_rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.file_directory, &config.file_prefix),
        "minutely" => {
            tracing_appender::rolling::minutely(&config.file_directory, &config.file_prefix)
        }
        "never" => tracing_appender::rolling::never(
            &config.file_directory,
            format!("{}.log", config.file_prefix),
        ),
        _ => tracing_appender::rolling::daily(&config.file_directory, &config.file_prefix),
    };

    // Use non-blocking writer to avoid blocking on I/O
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}
