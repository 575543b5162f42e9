//! FHIR REST Client
//!
//! This crate provides an async client for searching `Patient` resources on a
//! FHIR server and for timing repeated searches against the server's
//! response cache.
//!
//! # Examples
//!
//! ## Search by family name
//!
//! ```rust,no_run
//! use ferrum_client::{CacheControl, FhirClient, PatientSearch};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FhirClient::new()?;
//! let timed = client
//!     .search_patients_by_family("SMITH", CacheControl::default())
//!     .await?;
//! println!("{} matches in {}ms", timed.value.total_or_zero(), timed.elapsed_millis());
//! # Ok(())
//! # }
//! ```
//!
//! ## Time a list of names
//!
//! ```rust,no_run
//! use ferrum_client::{run_iterations, ClientConfig, FhirClient, IterationPlan};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let names = vec!["Peart".to_string(), "Lee".to_string()];
//! let reports = run_iterations(&names, &IterationPlan::default(), || {
//!     FhirClient::with_config(&config)
//! })
//! .await?;
//! for report in reports {
//!     println!("{}: {}ms", report.iteration, report.average_millis);
//! }
//! # Ok(())
//! # }
//! ```
//!
pub mod cache_control;
pub mod client;
pub mod error;
pub mod names;
pub mod search;
pub mod timing;

pub use cache_control::CacheControl;
pub use client::{ClientConfig, FhirClient, PatientSearch, Timed, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use names::{family_names_from_str, parse_family_names};
pub use search::PatientSearchParams;
pub use timing::{response_times, run_iterations, IterationPlan, IterationReport, ResponseTimes};

// Re-export model types for convenience
pub use ferrum_models::{Bundle, HumanName, Patient};
