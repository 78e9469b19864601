//! Coverage metric over a model's node list.
//!
//! For a node at level `l < M` (`M` = deepest level present), its direct
//! children are the level `l + 1` nodes whose parent name equals its name.
//! Coverage is `own × child_count × child_port_sum`, where `own` is the
//! weighted port count at level 1 and the raw port count elsewhere; it is 0
//! when there are no children or they carry no ports. Level `M` is never
//! reported.

pub mod naming;
pub mod stats;

use archcov_core::config::AnalysisConfig;
use archcov_core::types::collections::FxHashMap;

use crate::ledger::LedgerNode;

pub use naming::{qualify_provider, replace_root_segment, HierarchyIndex};

/// Deepest level present, 0 for an empty list.
pub fn max_level(nodes: &[LedgerNode]) -> u32 {
    nodes.iter().map(|n| n.level).max().unwrap_or(0)
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageCalculator {
    interface_port_weight: f64,
}

impl Default for CoverageCalculator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl CoverageCalculator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            interface_port_weight: config.effective_interface_port_weight(),
        }
    }

    /// Level-1 nodes weigh interface ports; other levels use the raw count.
    pub fn effective_port_count(&self, node: &LedgerNode) -> f64 {
        if node.level == 1 {
            f64::from(node.structural_port_count())
                + f64::from(node.interface_port_count) * self.interface_port_weight
        } else {
            f64::from(node.port_count)
        }
    }

    /// Fill effective port counts, child aggregates and coverage in place.
    pub fn compute(&self, nodes: &mut [LedgerNode]) {
        let deepest = max_level(nodes);

        let mut children: FxHashMap<(u32, String), (u32, u32)> = FxHashMap::default();
        for node in nodes.iter() {
            if let Some(parent) = &node.parent_name {
                let entry = children.entry((node.level, parent.clone())).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += node.port_count;
            }
        }

        for node in nodes.iter_mut() {
            node.effective_port_count = self.effective_port_count(node);
            node.child_count = 0;
            node.child_port_sum = 0;
            node.coverage = 0.0;

            if node.level >= deepest {
                continue;
            }
            let Some(&(count, port_sum)) = children.get(&(node.level + 1, node.name.clone())) else {
                continue;
            };
            node.child_count = count;
            node.child_port_sum = port_sum;
            if count == 0 || port_sum == 0 {
                continue;
            }

            let own = if node.level == 1 {
                node.effective_port_count
            } else {
                f64::from(node.port_count)
            };
            node.coverage = own * f64::from(count) * f64::from(port_sum);
        }
    }
}

/// A node selected for output with its resolved names.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedNode<'a> {
    pub node: &'a LedgerNode,
    /// Dotted chain of ancestor names.
    pub path: String,
    /// `path` with its first segment replaced by the model name.
    pub element_name: String,
}

impl ReportedNode<'_> {
    /// Uses entries with providers qualified against this element, by provider.
    pub fn qualified_uses(&self) -> Vec<(String, u32)> {
        self.node
            .uses
            .iter()
            .filter(|(provider, strength)| !provider.trim().is_empty() && **strength > 0)
            .map(|(provider, strength)| (qualify_provider(&self.element_name, provider), *strength))
            .collect()
    }
}

/// Nodes above the deepest level, named and sorted by (level, path).
pub fn reported_nodes<'a>(nodes: &'a [LedgerNode], model_name: &str) -> Vec<ReportedNode<'a>> {
    let deepest = max_level(nodes);
    let index = HierarchyIndex::new(nodes);

    let mut reported: Vec<ReportedNode<'a>> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.level < deepest)
        .map(|(i, node)| {
            let path = index.path_of(i);
            let element_name = replace_root_segment(&path, model_name);
            ReportedNode {
                node,
                path,
                element_name,
            }
        })
        .collect();

    reported.sort_by(|a, b| {
        a.node
            .level
            .cmp(&b.node.level)
            .then_with(|| a.path.cmp(&b.path))
    });
    reported
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(level: u32, name: &str, parent: Option<&str>, ports: u32) -> LedgerNode {
        LedgerNode {
            port_count: ports,
            parent_name: parent.map(str::to_string),
            ..LedgerNode::new(level, name)
        }
    }

    #[test]
    fn test_children_are_matched_by_parent_name_one_level_down() {
        let mut nodes = vec![
            node(1, "A", None, 2),
            node(2, "B", Some("A"), 3),
            node(2, "C", Some("A"), 1),
            node(2, "D", Some("Other"), 9),
            node(3, "E", Some("A"), 5),
        ];
        CoverageCalculator::default().compute(&mut nodes);

        assert_eq!(nodes[0].child_count, 2);
        assert_eq!(nodes[0].child_port_sum, 4);
        assert_eq!(nodes[0].coverage, 2.0 * 2.0 * 4.0);
        // deepest level is never given a coverage
        assert_eq!(nodes[4].coverage, 0.0);
    }

    #[test]
    fn test_reported_nodes_skip_deepest_level() {
        let nodes = vec![
            node(1, "A", None, 1),
            node(2, "B", Some("A"), 1),
        ];
        let reported = reported_nodes(&nodes, "Model");
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].element_name, "Model");
    }
}
