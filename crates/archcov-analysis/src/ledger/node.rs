//! Whole-model node list consumed by the coverage calculator.

use std::collections::BTreeMap;

use crate::synthesis::{EmittedBlock, PortKind};

/// One emitted block with its aggregates.
///
/// Port counts and `uses` come from the ledger; `child_count`,
/// `child_port_sum`, `effective_port_count` and `coverage` are filled by the
/// coverage calculator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerNode {
    pub level: u32,
    pub name: String,
    pub sid: String,
    pub block_type: String,
    /// Owner of this node's level; only recorded at level 2 and deeper.
    pub parent_name: Option<String>,
    /// All ports, virtual and interface ports included.
    pub port_count: u32,
    pub interface_port_count: u32,
    pub child_count: u32,
    pub child_port_sum: u32,
    pub effective_port_count: f64,
    pub coverage: f64,
    /// Provider name → accumulated strength. Ordered by provider.
    pub uses: BTreeMap<String, u32>,
}

impl LedgerNode {
    pub fn new(level: u32, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add `strength` to `provider`; empty providers and zero strengths are ignored.
    pub fn add_use(&mut self, provider: &str, strength: u32) {
        if provider.is_empty() || strength == 0 {
            return;
        }
        *self.uses.entry(provider.to_string()).or_insert(0) += strength;
    }

    pub fn count_port(&mut self, kind: PortKind) {
        self.port_count += 1;
        if kind == PortKind::Interface {
            self.interface_port_count += 1;
        }
    }

    pub fn structural_port_count(&self) -> u32 {
        self.port_count.saturating_sub(self.interface_port_count)
    }
}

impl From<&EmittedBlock> for LedgerNode {
    fn from(block: &EmittedBlock) -> Self {
        let mut node = LedgerNode {
            level: block.level,
            name: block.name.clone(),
            sid: block.sid.clone(),
            block_type: block.block_type.clone(),
            parent_name: recorded_parent(block.level, block.parent_name.as_deref()),
            ..Default::default()
        };
        for strength in &block.strengths {
            node.add_use(&strength.target_name, strength.value);
        }
        for port in &block.ports {
            node.count_port(recorded_kind(block.level, port.kind));
        }
        node
    }
}

/// Port kinds are only tagged at level 1; deeper ports read back as structural.
pub(crate) fn recorded_kind(level: u32, kind: PortKind) -> PortKind {
    if level == 1 {
        kind
    } else {
        PortKind::Structural
    }
}

/// Parent names are only meaningful below the top level.
pub(crate) fn recorded_parent(level: u32, parent: Option<&str>) -> Option<String> {
    parent
        .filter(|p| level >= 2 && !p.is_empty())
        .map(str::to_string)
}
