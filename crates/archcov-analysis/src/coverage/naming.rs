//! Hierarchical element names.

use archcov_core::types::collections::FxHashMap;

use crate::ledger::LedgerNode;

/// Lookup of nodes by `(level, name)`; later duplicates win.
pub struct HierarchyIndex<'a> {
    nodes: &'a [LedgerNode],
    by_level_name: FxHashMap<(u32, &'a str), usize>,
}

impl<'a> HierarchyIndex<'a> {
    pub fn new(nodes: &'a [LedgerNode]) -> Self {
        let by_level_name = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| ((n.level, n.name.as_str()), i))
            .collect();
        Self {
            nodes,
            by_level_name,
        }
    }

    /// Dotted chain from the top-most reachable ancestor down to node `index`.
    /// The chain ends at level 1, at a node without a parent, or where the
    /// parent is missing one level up.
    pub fn path_of(&self, index: usize) -> String {
        let nodes = self.nodes;
        let mut chain: Vec<&str> = Vec::new();
        let mut current = &nodes[index];
        loop {
            chain.push(&current.name);
            let parent = match (&current.parent_name, current.level) {
                (Some(parent), level) if level > 1 => parent.as_str(),
                _ => break,
            };
            match self.by_level_name.get(&(current.level - 1, parent)) {
                Some(&next) => current = &nodes[next],
                None => break,
            }
        }
        chain.reverse();
        chain.join(".")
    }
}

/// Replace the first dot-separated segment of `path` with `root`.
/// A blank `root` leaves the path unchanged.
pub fn replace_root_segment(path: &str, root: &str) -> String {
    let root = root.trim();
    if root.is_empty() {
        return path.to_string();
    }
    match path.find('.') {
        Some(dot) => format!("{root}{}", &path[dot..]),
        None => root.to_string(),
    }
}

/// Qualify a short provider name with the parent scope of `element_name`.
/// Dotted providers are already absolute and pass through.
pub fn qualify_provider(element_name: &str, provider: &str) -> String {
    let provider = provider.trim();
    if provider.is_empty() || provider.contains('.') {
        return provider.to_string();
    }
    match element_name.rfind('.') {
        Some(dot) => format!("{}.{provider}", &element_name[..dot]),
        None => provider.to_string(),
    }
}
