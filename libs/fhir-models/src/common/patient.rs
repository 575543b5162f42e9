//! FHIR Patient model
//!
//! Only the demographic fields needed for name listings are typed; everything
//! else is kept in `extensions`.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// FHIR Patient resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Resource type - always "Patient"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// A name associated with the patient
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    /// The date of birth for the individual (YYYY, YYYY-MM or YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Patient".to_string()
}

/// Name of a human - parts and usage
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    /// usual | official | temp | nickname | anonymous | old | maiden
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,

    /// Text representation of the full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Family name (often called 'Surname')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Given names (not always 'first'). Includes middle names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl HumanName {
    /// The first given name; any further given names are middle names.
    pub fn first_given(&self) -> Option<&str> {
        self.given.first().map(String::as_str)
    }
}

impl Patient {
    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        let patient: Patient = serde_json::from_value(value.clone())?;
        if patient.resource_type != "Patient" {
            return Err(Error::InvalidResource(format!(
                "expected Patient, got {}",
                patient.resource_type
            )));
        }
        Ok(patient)
    }

    /// One `"<first given> <family> <birthDate>"` line per name.
    ///
    /// Missing parts are rendered as empty strings so every line keeps its
    /// three space-separated fields.
    pub fn name_lines(&self) -> Vec<String> {
        let birth_date = self.birth_date.as_deref().unwrap_or("");
        self.name
            .iter()
            .map(|name| {
                format!(
                    "{} {} {}",
                    name.first_given().unwrap_or(""),
                    name.family.as_deref().unwrap_or(""),
                    birth_date
                )
            })
            .collect()
    }
}
