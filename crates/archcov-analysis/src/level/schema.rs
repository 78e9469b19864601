//! Serde mirror of the level-file and interface-descriptor XML schemas.
//! Only the elements the analysis reads are declared; everything else is skipped.

use serde::Deserialize;

/// `<P Name="...">value</P>` property tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlP {
    #[serde(rename = "@Name", default)]
    pub name: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<PortCounts in=".." out=".." trigger=".."/>` on a composite block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlPortCounts {
    #[serde(rename = "@in", default)]
    pub inputs: Option<String>,
    #[serde(rename = "@out", default)]
    pub outputs: Option<String>,
    #[serde(rename = "@trigger", default)]
    pub trigger: Option<String>,
}

impl XmlPortCounts {
    /// True when none of the in/out/trigger counts is declared.
    pub fn is_blank(&self) -> bool {
        [&self.inputs, &self.outputs, &self.trigger]
            .iter()
            .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlBlock {
    #[serde(rename = "@BlockType", default)]
    pub block_type: String,
    #[serde(rename = "@Name", default)]
    pub name: String,
    #[serde(rename = "@SID", default)]
    pub sid: String,
    #[serde(rename = "PortCounts", default)]
    pub port_counts: Option<XmlPortCounts>,
    #[serde(rename = "P", default)]
    pub properties: Vec<XmlP>,
}

/// Wiring sub-structure; branches nest arbitrarily deep.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlBranch {
    #[serde(rename = "P", default)]
    pub properties: Vec<XmlP>,
    #[serde(rename = "Branch", default)]
    pub branches: Vec<XmlBranch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlLine {
    #[serde(rename = "P", default)]
    pub properties: Vec<XmlP>,
    #[serde(rename = "Branch", default)]
    pub branches: Vec<XmlBranch>,
}

/// Root `<System>` element of one level file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlSystem {
    #[serde(rename = "Block", default)]
    pub blocks: Vec<XmlBlock>,
    #[serde(rename = "Line", default)]
    pub lines: Vec<XmlLine>,
}

/// One function entry of the interface descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlFunction {
    #[serde(rename = "P", default)]
    pub properties: Vec<XmlP>,
}

/// Root of `graphicalInterface.xml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlGraphicalInterface {
    #[serde(rename = "RequireFunction", default)]
    pub requires: Vec<XmlFunction>,
    #[serde(rename = "ProvideFunction", default)]
    pub provides: Vec<XmlFunction>,
}

/// Value of the first `P` with the given name.
pub fn property<'a>(properties: &'a [XmlP], name: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.value.as_str())
}
