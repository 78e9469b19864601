//! Metric document: the XML report shared with the other metric producers
//! and the master report.
//!
//! ```xml
//! <ldi>
//!   <element name="Model.Sub">
//!     <uses provider="Model.Other" strength="2"/>
//!     <property name="coverage.m1">12.0000</property>
//!   </element>
//! </ldi>
//! ```

pub mod merge;

use std::path::Path;

use archcov_core::errors::DocumentError;
use serde::{Deserialize, Serialize};

use crate::coverage::ReportedNode;

pub use merge::{merge_documents, merge_into_master, read_dependency_map, seed_document, MergeStats};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "ldi")]
pub struct MetricDocument {
    #[serde(rename = "element", default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "uses", default)]
    pub uses: Vec<Uses>,
    #[serde(rename = "property", default)]
    pub properties: Vec<Property>,
}

/// Directed usage edge towards `provider`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uses {
    #[serde(rename = "@provider")]
    pub provider: String,
    /// Kept as text: other producers may omit it or write non-numeric values.
    #[serde(rename = "@strength", default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl Uses {
    pub fn new(provider: impl Into<String>, strength: u64) -> Self {
        Self {
            provider: provider.into(),
            strength: Some(strength.to_string()),
        }
    }

    /// Numeric strength; missing, malformed or negative values count as 0.
    pub fn strength_value(&self) -> u64 {
        self.strength
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn uses_of(&self, provider: &str) -> Option<&Uses> {
        self.uses.iter().find(|u| u.provider.trim() == provider)
    }
}

impl MetricDocument {
    /// Build a model's document from its reported nodes, keeping their order.
    pub fn from_report(reported: &[ReportedNode<'_>], property_name: &str) -> Self {
        let elements = reported
            .iter()
            .map(|r| Element {
                name: r.element_name.clone(),
                uses: r
                    .qualified_uses()
                    .into_iter()
                    .map(|(provider, strength)| Uses::new(provider, u64::from(strength)))
                    .collect(),
                properties: vec![Property {
                    name: property_name.to_string(),
                    value: format!("{:.4}", r.node.coverage),
                }],
            })
            .collect();
        Self { elements }
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, DocumentError> {
        quick_xml::de::from_str(content).map_err(|e| DocumentError::parse(path, e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::read(path, e))?;
        Self::parse(path, &content)
    }

    /// Like [`MetricDocument::read`], but a missing file is an empty document.
    pub fn read_or_empty(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::read(path)
    }

    /// Serialize with an XML declaration and two-space indentation.
    /// `path` is only used for error reporting.
    pub fn to_xml(&self, path: &Path) -> Result<String, DocumentError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| DocumentError::parse(path, e.to_string()))?;
        Ok(format!("{XML_DECLARATION}{body}\n"))
    }

    /// Write the document, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        let xml = self.to_xml(path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::write(parent, e))?;
        }
        std::fs::write(path, xml).map_err(|e| DocumentError::write(path, e))
    }
}
