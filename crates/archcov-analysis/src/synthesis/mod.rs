//! Port & connectivity synthesis for one level.
//!
//! Given the blocks the level filter selected, attaches the port blocks wired
//! to each of them, derives subsystem-to-subsystem strengths (level 2 and
//! deeper) and, at level 1, appends the model's interface ports. The result is
//! a [`LevelEmission`] that owns everything attributed to each block.

pub mod reachability;
pub mod types;

use archcov_core::config::AnalysisConfig;
use archcov_core::types::collections::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::level::schema::XmlBlock;
use crate::level::{load_interface_ports, normalize_name, Edge, LevelFile, SelectedBlock, SUBSYSTEM};

use self::reachability::{subsystem_strengths, WireGraph};
pub use self::types::{
    EmittedBlock, LevelEmission, PortDirection, PortKind, PortRecord, SubsystemStrength,
};

/// Builds a [`LevelEmission`] from a parsed level file and its selection.
#[derive(Debug, Clone, Default)]
pub struct PortSynthesizer {
    virtual_ports: bool,
}

impl PortSynthesizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            virtual_ports: config.effective_virtual_ports(),
        }
    }

    /// Synthesize ports and strengths for `selected`, in selection order.
    pub fn synthesize(
        &self,
        file: &LevelFile,
        level: u32,
        model_name: &str,
        selected: &[SelectedBlock],
    ) -> LevelEmission {
        let blocks: FxHashMap<&str, &XmlBlock> = file
            .system
            .blocks
            .iter()
            .map(|b| (b.sid.as_str(), b))
            .collect();
        let port_blocks = collect_port_blocks(file);
        let selected_sids: FxHashSet<&str> = selected.iter().map(|b| b.sid.as_str()).collect();
        let edges = file.edges();

        let mut attached = attach_ports(&edges, &port_blocks, &selected_sids);
        if self.virtual_ports {
            attach_virtual_ports(&edges, &blocks, &port_blocks, &selected_sids, &mut attached);
        }

        let mut strengths = if level >= 2 {
            level_strengths(&edges, &blocks, &selected_sids)
        } else {
            FxHashMap::default()
        };

        let mut emission = LevelEmission {
            level,
            model_name: model_name.to_string(),
            blocks: Vec::with_capacity(selected.len()),
        };
        for block in selected {
            if !blocks.contains_key(block.sid.as_str()) {
                continue;
            }
            emission.blocks.push(EmittedBlock {
                level,
                name: block.name.clone(),
                block_type: block.block_type.clone(),
                sid: block.sid.clone(),
                parent_name: block.parent_name.clone(),
                strengths: strengths.remove(block.sid.as_str()).unwrap_or_default(),
                ports: attached.remove(block.sid.as_str()).unwrap_or_default(),
            });
        }

        if level == 1 {
            self.append_interface_ports(file, &mut emission);
        }

        debug!(
            file = %file.path.display(),
            level,
            blocks = emission.blocks.len(),
            ports = emission.port_count(),
            "level synthesized"
        );
        emission
    }

    /// Interface ports belong to the last level-1 block; failures only degrade the result.
    fn append_interface_ports(&self, file: &LevelFile, emission: &mut LevelEmission) {
        let Some(owner) = emission.blocks.last_mut() else {
            return;
        };
        let Some(model_dir) = file.model_dir() else {
            warn!(file = %file.path.display(), "no model directory; interface ports skipped");
            return;
        };
        match load_interface_ports(model_dir) {
            Ok(ports) => owner.ports.extend(ports),
            Err(e) => warn!(error = %e, "interface descriptor unavailable; continuing without interface ports"),
        }
    }
}

fn collect_port_blocks(file: &LevelFile) -> FxHashMap<&str, PortRecord> {
    file.system
        .blocks
        .iter()
        .filter_map(|b| {
            let direction = PortDirection::from_block_type(&b.block_type)?;
            Some((
                b.sid.as_str(),
                PortRecord {
                    name: normalize_name(&b.name),
                    direction,
                    sid: b.sid.clone(),
                    kind: PortKind::Structural,
                    is_virtual: false,
                },
            ))
        })
        .collect()
}

/// Port → selected block attaches to the destination, selected block → port to
/// the source. Each port is attached at most once per owner.
fn attach_ports<'a>(
    edges: &'a [Edge],
    port_blocks: &FxHashMap<&str, PortRecord>,
    selected: &FxHashSet<&str>,
) -> FxHashMap<&'a str, Vec<PortRecord>> {
    let mut attached: FxHashMap<&str, Vec<PortRecord>> = FxHashMap::default();
    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();

    for edge in edges {
        let (src, dst) = (edge.src_sid.as_str(), edge.dst_sid.as_str());
        if let Some(port) = port_blocks.get(src) {
            if selected.contains(dst) && seen.insert((dst, src)) {
                attached.entry(dst).or_default().push(port.clone());
            }
        }
        if let Some(port) = port_blocks.get(dst) {
            if selected.contains(src) && seen.insert((src, dst)) {
                attached.entry(src).or_default().push(port.clone());
            }
        }
    }

    attached
}

/// Direct block-to-block wires touching a selected block become virtual ports
/// named `src->dst`, suffixed `_n` when the same pair is wired more than once.
fn attach_virtual_ports<'a>(
    edges: &'a [Edge],
    blocks: &FxHashMap<&str, &XmlBlock>,
    port_blocks: &FxHashMap<&str, PortRecord>,
    selected: &FxHashSet<&str>,
    attached: &mut FxHashMap<&'a str, Vec<PortRecord>>,
) {
    let block_pair = |edge: &'a Edge| -> Option<(&'a str, &'a str)> {
        let (src, dst) = (edge.src_sid.as_str(), edge.dst_sid.as_str());
        let both_blocks = blocks.contains_key(src) && blocks.contains_key(dst);
        let any_port = port_blocks.contains_key(src) || port_blocks.contains_key(dst);
        (both_blocks && !any_port).then_some((src, dst))
    };

    let mut pair_totals: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    for pair in edges.iter().filter_map(block_pair) {
        *pair_totals.entry(pair).or_insert(0) += 1;
    }

    let mut pair_index: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    for (src, dst) in edges.iter().filter_map(block_pair) {
        let index = pair_index.entry((src, dst)).or_insert(0);
        *index += 1;

        let (src_name, dst_name) = (normalize_name(&blocks[src].name), normalize_name(&blocks[dst].name));
        let name = if pair_totals[&(src, dst)] > 1 {
            format!("{src_name}->{dst_name}_{index}")
        } else {
            format!("{src_name}->{dst_name}")
        };
        let virtual_port = |direction| PortRecord {
            name: name.clone(),
            direction,
            sid: format!("{src}->{dst}"),
            kind: PortKind::Structural,
            is_virtual: true,
        };

        if selected.contains(src) {
            attached.entry(src).or_default().push(virtual_port(PortDirection::Outport));
        }
        if selected.contains(dst) {
            attached.entry(dst).or_default().push(virtual_port(PortDirection::Inport));
        }
    }
}

/// Strengths between selected composites, keyed by source id and sorted by
/// target name then target id.
fn level_strengths<'a>(
    edges: &'a [Edge],
    blocks: &FxHashMap<&str, &XmlBlock>,
    selected: &FxHashSet<&str>,
) -> FxHashMap<&'a str, Vec<SubsystemStrength>> {
    let is_target = |sid: &str| {
        selected.contains(sid) && blocks.get(sid).is_some_and(|b| b.block_type == SUBSYSTEM)
    };

    let graph = WireGraph::build(edges, |sid| blocks.contains_key(sid));
    let sources: Vec<&'a str> = graph_sources(edges, &is_target);
    let raw = subsystem_strengths(&graph, sources, is_target);

    raw.into_iter()
        .map(|(source, targets)| {
            let mut list: Vec<SubsystemStrength> = targets
                .into_iter()
                .filter_map(|(target, value)| {
                    let block = blocks.get(target)?;
                    Some(SubsystemStrength {
                        source_sid: source.to_string(),
                        target_sid: target.to_string(),
                        target_name: normalize_name(&block.name),
                        value,
                    })
                })
                .collect();
            list.sort_by(|a, b| {
                a.target_name
                    .cmp(&b.target_name)
                    .then_with(|| a.target_sid.cmp(&b.target_sid))
            });
            (source, list)
        })
        .collect()
}

/// Distinct wire sources that are target-eligible, borrowed from the edge list.
fn graph_sources<'a>(edges: &'a [Edge], is_target: impl Fn(&str) -> bool) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    edges
        .iter()
        .map(|e| e.src_sid.as_str())
        .filter(|sid| is_target(sid) && seen.insert(*sid))
        .collect()
}
