//! Error types for fhir-client

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// FHIR client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read family names list {}", path.display())]
    NamesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search failed with status {status}: {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid response: {0}")]
    Model(#[from] ferrum_models::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
