//! Level filter: decides which blocks of a level are emitted.
//!
//! - Level 1: composite blocks, minus stubs whose `Ports` property is empty or
//!   absent, or whose `PortCounts` descriptor is declared but blank.
//! - Level 2: every composite block.
//! - Level 3+: every block that is not a leaf `Inport`/`Outport`.

use super::schema::XmlBlock;
use super::{is_port_type, normalize_name, LevelFile, SUBSYSTEM};

/// A block chosen for emission at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedBlock {
    pub sid: String,
    pub name: String,
    pub block_type: String,
    pub level: u32,
    /// Name of the block owning this level; `None` at level 1.
    pub parent_name: Option<String>,
}

impl SelectedBlock {
    pub fn is_composite(&self) -> bool {
        self.block_type == SUBSYSTEM
    }
}

/// Select the blocks of interest in `file`, in file order.
pub fn select_blocks(file: &LevelFile, level: u32, parent_name: Option<&str>) -> Vec<SelectedBlock> {
    file.system
        .blocks
        .iter()
        .filter(|b| accepts(b, level))
        .map(|b| SelectedBlock {
            sid: b.sid.clone(),
            name: normalize_name(&b.name),
            block_type: b.block_type.clone(),
            level,
            parent_name: parent_name.map(str::to_string),
        })
        .collect()
}

fn accepts(block: &XmlBlock, level: u32) -> bool {
    match level {
        0 | 1 => block.block_type == SUBSYSTEM && !is_stub_composite(block),
        2 => block.block_type == SUBSYSTEM,
        _ => !is_port_type(&block.block_type),
    }
}

/// Uninitialized composites injected by the model export: no usable port list,
/// or a port-count descriptor with nothing in it.
fn is_stub_composite(block: &XmlBlock) -> bool {
    let ports: Vec<&str> = block
        .properties
        .iter()
        .filter(|p| p.name == "Ports")
        .map(|p| p.value.trim())
        .collect();

    if ports.is_empty() || ports.iter().any(|v| v.is_empty() || *v == "[]") {
        return true;
    }

    block.port_counts.as_ref().is_some_and(|pc| pc.is_blank())
}
