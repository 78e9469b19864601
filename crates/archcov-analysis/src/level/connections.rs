//! Connection graph extraction: wiring statements → flat `src → dst` edge list.
//!
//! A line declares one `Src` endpoint, at most one direct `Dst`, and any number
//! of nested `Branch` sub-structures, each of which may carry its own `Dst`.

use std::path::Path;

use archcov_core::errors::DocumentError;

use super::schema::{property, XmlBranch, XmlLine, XmlP};
use super::LevelFile;

/// One wire between two blocks of the same level file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub src_sid: String,
    pub dst_sid: String,
}

impl Edge {
    pub fn new(src_sid: impl Into<String>, dst_sid: impl Into<String>) -> Self {
        Self {
            src_sid: src_sid.into(),
            dst_sid: dst_sid.into(),
        }
    }
}

/// Read a level file and return every edge it declares.
pub fn extract_edges(path: &Path) -> Result<Vec<Edge>, DocumentError> {
    Ok(LevelFile::load(path)?.edges())
}

/// Flatten wiring statements into edges, one per declared destination.
/// Lines without a source endpoint contribute nothing.
pub fn collect_edges(lines: &[XmlLine]) -> Vec<Edge> {
    let mut edges = Vec::new();

    for line in lines {
        let Some(src_sid) = property(&line.properties, "Src")
            .map(sid_from_endpoint)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };

        push_destinations(src_sid, &line.properties, &mut edges);
        for branch in &line.branches {
            collect_branch(src_sid, branch, &mut edges);
        }
    }

    edges
}

fn collect_branch(src_sid: &str, branch: &XmlBranch, edges: &mut Vec<Edge>) {
    push_destinations(src_sid, &branch.properties, edges);
    for child in &branch.branches {
        collect_branch(src_sid, child, edges);
    }
}

fn push_destinations(src_sid: &str, properties: &[XmlP], edges: &mut Vec<Edge>) {
    for p in properties.iter().filter(|p| p.name == "Dst") {
        let dst_sid = sid_from_endpoint(&p.value);
        if !dst_sid.is_empty() {
            edges.push(Edge::new(src_sid, dst_sid));
        }
    }
}

/// `"39#out:1"` → `"39"`, `"202#trigger"` → `"202"`, `"7"` → `"7"`.
///
/// Everything from the first `#` on is the port suffix. An endpoint that
/// starts with `#` has no block id and is kept whole.
pub fn sid_from_endpoint(endpoint: &str) -> &str {
    let endpoint = endpoint.trim();
    match endpoint.find('#') {
        Some(idx) if idx > 0 => &endpoint[..idx],
        _ => endpoint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_port_suffix() {
        assert_eq!(sid_from_endpoint("39#out:1"), "39");
        assert_eq!(sid_from_endpoint(" 66#in:3 "), "66");
        assert_eq!(sid_from_endpoint("202#trigger"), "202");
        assert_eq!(sid_from_endpoint("7"), "7");
    }

    #[test]
    fn test_splits_on_first_hash_only() {
        assert_eq!(sid_from_endpoint("12#12"), "12");
        assert_eq!(sid_from_endpoint("5#out:1#x"), "5");
    }

    #[test]
    fn test_empty_endpoint_is_empty() {
        assert_eq!(sid_from_endpoint("   "), "");
    }
}
