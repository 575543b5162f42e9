//! FHIR data models
//!
//! This crate provides strongly-typed Rust structures for the FHIR resources
//! returned by patient searches.
//!
//! # Module Organization
//!
//! - `common`: Version-agnostic models that work across FHIR R4, R4B, and R5
//!
//! # Design Philosophy
//!
//! - **Version-agnostic core**: Common fields present across all FHIR versions
//! - **Extensible**: `extensions` field captures version-specific or custom properties
//! - **Compatible**: Resources inside a Bundle stay `serde_json::Value` until decoded
//!
//! # Example
//!
//! ```rust
//! use ferrum_models::common::{Bundle, BundleType};
//! use serde_json::json;
//!
//! let bundle_json = json!({
//!     "resourceType": "Bundle",
//!     "type": "searchset",
//!     "total": 1,
//!     "entry": [{
//!         "resource": {
//!             "resourceType": "Patient",
//!             "name": [{"family": "Smith", "given": ["John"]}],
//!             "birthDate": "1970-01-01"
//!         }
//!     }]
//! });
//!
//! let bundle: Bundle = serde_json::from_value(bundle_json).unwrap();
//! assert_eq!(bundle.bundle_type, BundleType::Searchset);
//! let patients = bundle.patients().unwrap();
//! assert_eq!(patients[0].name_lines(), vec!["John Smith 1970-01-01"]);
//! ```

pub mod common;

// Re-export commonly used types
pub use common::*;
