//! Records produced by port and connectivity synthesis for one level.

use crate::level::{INPORT, OUTPORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Inport,
    Outport,
}

impl PortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inport => INPORT,
            Self::Outport => OUTPORT,
        }
    }

    pub fn from_block_type(block_type: &str) -> Option<Self> {
        match block_type {
            INPORT => Some(Self::Inport),
            OUTPORT => Some(Self::Outport),
            _ => None,
        }
    }
}

/// Where a port comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// A real `Inport`/`Outport` block wired to its owner (sender-receiver).
    Structural,
    /// Declared through the model's interface descriptor (client-server).
    Interface,
}

impl PortKind {
    /// Tag written to the ledger's `PortType=` field.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Structural => "S-R",
            Self::Interface => "C-S",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "S-R" => Some(Self::Structural),
            "C-S" => Some(Self::Interface),
            _ => None,
        }
    }
}

/// A port attached to exactly one emitted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub name: String,
    pub direction: PortDirection,
    pub sid: String,
    pub kind: PortKind,
    /// Synthesized from a block-to-block wire rather than a port block.
    pub is_virtual: bool,
}

/// Derived usage strength from one composite to another at the same level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemStrength {
    pub source_sid: String,
    pub target_sid: String,
    pub target_name: String,
    pub value: u32,
}

/// One selected block with everything attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedBlock {
    pub level: u32,
    pub name: String,
    pub block_type: String,
    pub sid: String,
    pub parent_name: Option<String>,
    /// Sorted by target name, then target id.
    pub strengths: Vec<SubsystemStrength>,
    pub ports: Vec<PortRecord>,
}

/// Everything one level contributes to the ledger, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelEmission {
    pub level: u32,
    pub model_name: String,
    pub blocks: Vec<EmittedBlock>,
}

impl LevelEmission {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn port_count(&self) -> usize {
        self.blocks.iter().map(|b| b.ports.len()).sum()
    }
}
