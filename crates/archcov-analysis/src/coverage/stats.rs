//! Per-model coverage summary text.

use std::fmt::Write as _;
use std::path::Path;

use archcov_core::errors::DocumentError;

use super::max_level;
use crate::ledger::LedgerNode;

/// One line per node above the deepest level, sorted by (level, name).
pub fn render_summary(nodes: &[LedgerNode]) -> String {
    let deepest = max_level(nodes);
    let mut rows: Vec<&LedgerNode> = nodes.iter().filter(|n| n.level < deepest).collect();
    rows.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));

    let mut out = String::new();
    for n in rows {
        let next = n.level + 1;
        let _ = if n.level == 1 {
            writeln!(
                out,
                "[L1] Name: {}\tL1Ports(Weighted)={:.1}\tL2Count={}\tL2Ports={}",
                n.name, n.effective_port_count, n.child_count, n.child_port_sum
            )
        } else {
            writeln!(
                out,
                "[L{lv}] Name: {}\tL{lv}Ports={}\tL{next}Count={}\tL{next}Ports={}",
                n.name,
                n.port_count,
                n.child_count,
                n.child_port_sum,
                lv = n.level,
            )
        };
    }
    out
}

pub fn write_summary(path: &Path, nodes: &[LedgerNode]) -> Result<(), DocumentError> {
    std::fs::write(path, render_summary(nodes)).map_err(|e| DocumentError::write(path, e))
}
