//! Subsystem-to-subsystem strength via target reachability.
//!
//! From each target-eligible composite, every first-hop neighbor is expanded
//! through non-target blocks until target composites are hit. Each reached
//! target (other than the source) gains the first-hop wire multiplicity.
//! Expansion stops at the first target on every path; target → target chains
//! do not propagate.

use archcov_core::types::collections::{FxHashMap, FxHashSet};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::level::Edge;

/// Wiring graph of one level; edge weight is the number of parallel wires.
pub struct WireGraph<'a> {
    graph: DiGraphMap<&'a str, u32>,
}

impl<'a> WireGraph<'a> {
    /// Build from edges whose both endpoints satisfy `is_block`.
    pub fn build(edges: &'a [Edge], is_block: impl Fn(&str) -> bool) -> Self {
        let mut graph = DiGraphMap::new();
        for edge in edges {
            let (src, dst) = (edge.src_sid.as_str(), edge.dst_sid.as_str());
            if !is_block(src) || !is_block(dst) {
                continue;
            }
            if let Some(count) = graph.edge_weight_mut(src, dst) {
                *count += 1;
            } else {
                graph.add_edge(src, dst, 1);
            }
        }
        Self { graph }
    }

    /// Distinct successors of `node` with their wire multiplicity, in first-seen order.
    pub fn first_hops(&self, node: &'a str) -> Vec<(&'a str, u32)> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        self.graph
            .edges(node)
            .map(|(_, dst, count)| (dst, *count))
            .collect()
    }

    fn successors(&self, node: &'a str) -> Vec<&'a str> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        self.graph.neighbors_directed(node, Direction::Outgoing).collect()
    }
}

/// Memoized "which targets can this node reach" search.
///
/// `in_progress` marks nodes on the current DFS stack; revisiting one yields
/// the empty set, which breaks cycles. Results are cached once a node finishes.
pub struct TargetReachability<'g, 'a, F> {
    graph: &'g WireGraph<'a>,
    is_target: F,
    memo: FxHashMap<&'a str, FxHashSet<&'a str>>,
    in_progress: FxHashSet<&'a str>,
}

impl<'g, 'a, F> TargetReachability<'g, 'a, F>
where
    F: Fn(&str) -> bool,
{
    pub fn new(graph: &'g WireGraph<'a>, is_target: F) -> Self {
        Self {
            graph,
            is_target,
            memo: FxHashMap::default(),
            in_progress: FxHashSet::default(),
        }
    }

    /// Targets reachable from `node` through zero or more non-target hops.
    pub fn reach(&mut self, node: &'a str) -> FxHashSet<&'a str> {
        if (self.is_target)(node) {
            return std::iter::once(node).collect();
        }
        if let Some(cached) = self.memo.get(node) {
            return cached.clone();
        }
        if !self.in_progress.insert(node) {
            return FxHashSet::default();
        }

        let mut reached = FxHashSet::default();
        for next in self.graph.successors(node) {
            reached.extend(self.reach(next));
        }

        self.in_progress.remove(node);
        self.memo.insert(node, reached.clone());
        reached
    }
}

/// Strength from every source in `sources` to each target it reaches.
///
/// Returns `source → (target → strength)`. Self-loops are never reported.
pub fn subsystem_strengths<'a>(
    graph: &WireGraph<'a>,
    sources: impl IntoIterator<Item = &'a str>,
    is_target: impl Fn(&str) -> bool,
) -> FxHashMap<&'a str, FxHashMap<&'a str, u32>> {
    let mut search = TargetReachability::new(graph, &is_target);
    let mut strengths: FxHashMap<&'a str, FxHashMap<&'a str, u32>> = FxHashMap::default();

    for source in sources {
        if !is_target(source) {
            continue;
        }
        for (neighbor, multiplicity) in graph.first_hops(source) {
            for target in search.reach(neighbor) {
                if target == source {
                    continue;
                }
                *strengths
                    .entry(source)
                    .or_default()
                    .entry(target)
                    .or_insert(0) += multiplicity;
            }
        }
    }

    strengths
}
