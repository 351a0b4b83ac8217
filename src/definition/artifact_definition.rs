
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{is_known_label, is_supported_os};
use crate::definition::source_type::SourceType;
use crate::error::{CatalogError, Result};

/// A single collection source of an artifact definition.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceDefinition {
    #[serde(rename = "type")]
    pub type_indicator: SourceType,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_os: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returned_types: Vec<String>,
}

impl SourceDefinition {
    pub fn new(type_indicator: SourceType, attributes: Map<String, Value>) -> Self {
        Self {
            type_indicator,
            attributes,
            supported_os: Vec::new(),
            conditions: Vec::new(),
            returned_types: Vec::new(),
        }
    }

    pub fn type_indicator(&self) -> &'static str {
        self.type_indicator.as_str()
    }
}

/// A parsed forensic artifact definition.
///
/// This is the value the catalog reconciles. Its canonical JSON form is
/// what gets stored as the artifact's `data` and what export re-reads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArtifactDefinition {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub sources: Vec<SourceDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_os: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ArtifactDefinition {
    /// Build a minimal definition; callers fill in the remaining fields.
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            sources: Vec::new(),
            labels: Vec::new(),
            supported_os: Vec::new(),
            conditions: Vec::new(),
            provides: Vec::new(),
            urls: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// Check the definition against the catalog vocabulary and the
    /// per-source-type attribute requirements.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid("missing name"));
        }

        if self.doc.trim().is_empty() {
            return Err(CatalogError::invalid(format!("{} missing description", self.name)));
        }

        if self.sources.is_empty() {
            return Err(CatalogError::invalid(format!("{} missing sources", self.name)));
        }

        if let Some(label) = self.labels.iter().find(|label| !is_known_label(label)) {
            return Err(CatalogError::invalid(format!("{} undefined label: {}", self.name, label)));
        }

        check_supported_os(&self.name, &self.supported_os)?;

        for source in &self.sources {
            check_supported_os(&self.name, &source.supported_os)?;

            for attribute in source.type_indicator.required_attributes() {
                if !source.attributes.contains_key(*attribute) {
                    return Err(CatalogError::invalid(format!(
                        "{} {} source missing attribute: {}",
                        self.name, source.type_indicator, attribute
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize to the canonical JSON stored as an artifact's `data`.
    pub fn to_canonical_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CatalogError::invalid(e.to_string()))
    }

    /// Parse a definition back out of a stored `data` blob.
    pub fn from_canonical_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| CatalogError::invalid(e.to_string()))
    }
}

fn check_supported_os(name: &str, supported_os: &[String]) -> Result<()> {
    match supported_os.iter().find(|os| !is_supported_os(os)) {
        Some(os) => Err(CatalogError::invalid(format!(
            "{} undefined supported operating system: {}",
            name, os
        ))),
        None => Ok(()),
    }
}
