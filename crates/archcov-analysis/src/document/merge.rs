//! Folding documents into the master report, and seeding a master report
//! from a dependency map.

use std::collections::BTreeMap;
use std::path::Path;

use archcov_core::errors::DocumentError;
use archcov_core::types::collections::FxHashMap;
use serde::Deserialize;
use tracing::info;

use super::{Element, MetricDocument, Uses};

/// What a merge changed in the master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub elements_added: usize,
    pub properties_added: usize,
    pub uses_added: usize,
    pub uses_strengthened: usize,
}

/// Fold `incoming` into `master`, keyed by element name.
///
/// Properties are only added when absent; existing values are never
/// overwritten. A `uses` entry for a provider already present adds its
/// strength, otherwise it is appended.
pub fn merge_documents(master: &mut MetricDocument, incoming: &MetricDocument) -> MergeStats {
    let mut stats = MergeStats::default();
    let mut index: FxHashMap<String, usize> = master
        .elements
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.clone(), i))
        .collect();

    for source in &incoming.elements {
        let position = match index.get(&source.name) {
            Some(&i) => i,
            None => {
                master.elements.push(Element::new(source.name.clone()));
                stats.elements_added += 1;
                let i = master.elements.len() - 1;
                index.insert(source.name.clone(), i);
                i
            }
        };
        let target = &mut master.elements[position];

        for property in &source.properties {
            if target.property(&property.name).is_none() {
                target.properties.push(property.clone());
                stats.properties_added += 1;
            }
        }

        for (provider, strength) in summed_uses(&source.uses) {
            match target.uses.iter_mut().find(|u| u.provider.trim() == provider) {
                Some(existing) => {
                    let total = existing.strength_value().saturating_add(strength);
                    existing.strength = Some(total.to_string());
                    stats.uses_strengthened += 1;
                }
                None => {
                    target.uses.push(Uses::new(provider, strength));
                    stats.uses_added += 1;
                }
            }
        }
    }

    stats
}

/// Strength per provider in first-seen order; blank providers and zero sums drop out.
fn summed_uses(uses: &[Uses]) -> Vec<(&str, u64)> {
    let mut order: Vec<(&str, u64)> = Vec::new();
    for u in uses {
        let provider = u.provider.trim();
        if provider.is_empty() {
            continue;
        }
        match order.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, total)) => *total = total.saturating_add(u.strength_value()),
            None => order.push((provider, u.strength_value())),
        }
    }
    order.retain(|(_, total)| *total > 0);
    order
}

/// Merge `incoming` into the master report at `master_path`.
/// A missing master starts out empty.
pub fn merge_into_master(
    master_path: &Path,
    incoming: &MetricDocument,
) -> Result<MergeStats, DocumentError> {
    let mut master = MetricDocument::read_or_empty(master_path)?;
    let stats = merge_documents(&mut master, incoming);
    master.write(master_path)?;
    info!(
        master = %master_path.display(),
        elements_added = stats.elements_added,
        properties_added = stats.properties_added,
        "merged into master report"
    );
    Ok(stats)
}

/// One dependency of a component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyEntry {
    pub target: String,
    #[serde(default)]
    pub strength: Option<u64>,
}

/// Component → dependencies, as exchanged with the other metric producers.
pub type DependencyMap = BTreeMap<String, Vec<DependencyEntry>>;

pub fn read_dependency_map(path: &Path) -> Result<DependencyMap, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::read(path, e))?;
    serde_json::from_str(&content).map_err(|e| DocumentError::parse(path, e.to_string()))
}

/// Master report skeleton: one element per component (sorted), one `uses`
/// per dependency, strength defaulting to 1.
pub fn seed_document(dependencies: &DependencyMap) -> MetricDocument {
    let elements = dependencies
        .iter()
        .map(|(component, targets)| Element {
            name: component.clone(),
            uses: targets
                .iter()
                .map(|d| Uses::new(d.target.clone(), d.strength.unwrap_or(1)))
                .collect(),
            properties: Vec::new(),
        })
        .collect();
    MetricDocument { elements }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_incoming_providers_are_summed_before_merging() {
        let uses = vec![
            Uses::new("A", 1),
            Uses::new(" A ", 2),
            Uses {
                provider: "B".into(),
                strength: Some("oops".into()),
            },
        ];
        assert_eq!(summed_uses(&uses), vec![("A", 3)]);
    }
}
