//! FHIR Bundle model
//!
//! Version-agnostic model for search result Bundles (R4, R4B, R5).

use super::error::{Error, Result};
use super::patient::Patient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// FHIR Bundle resource
///
/// A container for a collection of resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Indicates the purpose of this bundle - how it was intended to be used
    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Links related to this Bundle (self, next, previous)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<BundleLink>>,

    /// Entry in the bundle - will have a resource or information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,

    /// Additional content beyond core fields (meta, timestamp, signature, ...)
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

/// Type of Bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    /// Search Results Bundle - Results of a search operation
    Searchset,
    Collection,
}

/// Links related to this Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleLink {
    /// See http://www.iana.org/assignments/link-relations/link-relations.xhtml#link-relations-1
    pub relation: String,

    /// Reference details for the link
    pub url: String,
}

/// Entry in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Full URL for the entry (relative to the base URL, or absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Search-related information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BundleEntrySearch>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Search-related information for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntrySearch {
    /// Why this entry is in the result set
    #[serde(rename = "mode", skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<BundleEntrySearchMode>,

    /// Search ranking (between 0 and 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Why an entry is in the result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleEntrySearchMode {
    /// This resource matched the search specification
    Match,
    /// Returned because it is referred to from another resource in the search set
    Include,
    Outcome,
}

impl BundleEntry {
    /// Resource type of the contained resource, if any
    pub fn resource_type(&self) -> Option<&str> {
        self.resource
            .as_ref()
            .and_then(|r| r.get("resourceType"))
            .and_then(Value::as_str)
    }
}

impl Bundle {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: None,
            bundle_type,
            total: None,
            link: None,
            entry: None,
            extensions: HashMap::new(),
        }
    }

    /// Parse from raw JSON bytes as returned by a FHIR server
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bundle: Bundle = serde_json::from_slice(bytes)?;
        if bundle.resource_type != "Bundle" {
            return Err(Error::InvalidResource(format!(
                "expected Bundle, got {}",
                bundle.resource_type
            )));
        }
        Ok(bundle)
    }

    /// Check if this is a search result bundle
    pub fn is_searchset(&self) -> bool {
        matches!(self.bundle_type, BundleType::Searchset)
    }

    /// Total number of matches, treating an absent total as zero
    pub fn total_or_zero(&self) -> u32 {
        self.total.unwrap_or(0)
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or(&[])
    }

    /// Decode every `Patient` resource in the bundle.
    ///
    /// Entries holding other resource types (e.g. an `OperationOutcome` with
    /// search mode `outcome`) are skipped.
    pub fn patients(&self) -> Result<Vec<Patient>> {
        self.entries()
            .iter()
            .filter(|e| e.resource_type() == Some("Patient"))
            .filter_map(|e| e.resource.as_ref())
            .map(Patient::from_value)
            .collect()
    }
}
