//! Textual ledger encoding.
//!
//! ```text
//! [L<level>] Name: <name>\tBlockType=<type>\tSID=<id>[\tFatherNode=<parent>]
//! \t[L<level> Connect] Name:<provider>\tSID=<id>\tstrength=<int>
//! \t[L<level>[ virtual] Port] Name:<name>\tBlockType=<Inport|Outport>\tSID=<id>[\tPortType=<S-R|C-S>]
//! ```
//!
//! An un-indented line opens a node; indented lines belong to the most recent
//! node only when their level tag matches its level. `PortType` is written at
//! level 1 only.

use std::fmt::Write as _;
use std::path::Path;

use archcov_core::errors::DocumentError;

use super::node::{recorded_parent, LedgerNode};
use crate::synthesis::{LevelEmission, PortKind};

/// Encode one level's emission as ledger text.
pub fn encode_level(emission: &LevelEmission) -> String {
    let mut out = String::new();
    for block in &emission.blocks {
        let _ = write!(
            out,
            "[L{}] Name: {}\tBlockType={}\tSID={}",
            block.level, block.name, block.block_type, block.sid
        );
        if let Some(parent) = recorded_parent(block.level, block.parent_name.as_deref()) {
            let _ = write!(out, "\tFatherNode={parent}");
        }
        out.push('\n');

        for strength in &block.strengths {
            let _ = writeln!(
                out,
                "\t[L{} Connect] Name:{}\tSID={}\tstrength={}",
                block.level, strength.target_name, strength.target_sid, strength.value
            );
        }

        for port in &block.ports {
            let label = if port.is_virtual { "virtual Port" } else { "Port" };
            let _ = write!(
                out,
                "\t[L{} {}] Name:{}\tBlockType={}\tSID={}",
                block.level,
                label,
                port.name,
                port.direction.as_str(),
                port.sid
            );
            if block.level == 1 {
                let _ = write!(out, "\tPortType={}", port.kind.tag());
            }
            out.push('\n');
        }
    }
    out
}

/// Read and decode a ledger file.
pub fn read_ledger(path: &Path) -> Result<Vec<LedgerNode>, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|e| DocumentError::read(path, e))?;
    decode(path, &text)
}

/// Decode ledger text into nodes, in ledger order. `path` is used for error reporting.
pub fn decode(path: &Path, text: &str) -> Result<Vec<LedgerNode>, DocumentError> {
    let mut nodes: Vec<LedgerNode> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let fail = |message: String| DocumentError::parse(path, format!("line {line_no}: {message}"));

        let record = parse_line(raw).map_err(fail)?;
        match record {
            Record::Block(node) => nodes.push(node),
            Record::Connect {
                level,
                provider,
                strength,
            } => {
                if let Some(current) = nodes.last_mut().filter(|n| n.level == level) {
                    current.add_use(&provider, strength);
                }
            }
            Record::Port { level, kind } => {
                if let Some(current) = nodes.last_mut().filter(|n| n.level == level) {
                    current.count_port(kind);
                }
            }
        }
    }

    Ok(nodes)
}

enum Record {
    Block(LedgerNode),
    Connect {
        level: u32,
        provider: String,
        strength: u32,
    },
    Port {
        level: u32,
        kind: PortKind,
    },
}

fn parse_line(raw: &str) -> Result<Record, String> {
    let indented = raw.starts_with('\t');
    let line = raw.trim_start_matches('\t');

    let (header, rest) = line
        .strip_prefix('[')
        .and_then(|l| l.split_once(']'))
        .ok_or_else(|| format!("expected '[L<level> ...]' header in {line:?}"))?;
    let mut words = header.split_whitespace();
    let level = words
        .next()
        .and_then(|w| w.strip_prefix('L'))
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| format!("bad level tag '[{header}]'"))?;
    let kind: Vec<&str> = words.collect();

    let fields = Fields::parse(rest)?;

    match (indented, kind.as_slice()) {
        (false, []) => {
            let mut node = LedgerNode::new(level, fields.name);
            node.block_type = fields.get("BlockType").unwrap_or_default().to_string();
            node.sid = fields.get("SID").unwrap_or_default().to_string();
            node.parent_name = recorded_parent(level, fields.get("FatherNode"));
            Ok(Record::Block(node))
        }
        (true, ["Connect"]) => {
            let strength = match fields.get("strength") {
                Some(v) => v
                    .parse::<i64>()
                    .map_err(|_| format!("strength '{v}' is not an integer"))?,
                None => 0,
            };
            Ok(Record::Connect {
                level,
                provider: fields.name.to_string(),
                strength: u32::try_from(strength.max(0)).map_err(|_| "strength out of range".to_string())?,
            })
        }
        (true, ["Port"]) | (true, ["virtual", "Port"]) => {
            let kind = match fields.get("PortType") {
                Some(tag) => PortKind::from_tag(tag).ok_or_else(|| format!("unknown port type '{tag}'"))?,
                None => PortKind::Structural,
            };
            Ok(Record::Port { level, kind })
        }
        _ => Err(format!("unrecognized ledger record '[{header}]'")),
    }
}

/// `Name:<name>` followed by tab-separated `key=value` pairs.
struct Fields<'a> {
    name: &'a str,
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Fields<'a> {
    fn parse(rest: &'a str) -> Result<Self, String> {
        let mut parts = rest.split('\t');
        let name = parts
            .next()
            .map(str::trim_start)
            .and_then(|p| p.strip_prefix("Name:"))
            .ok_or_else(|| "missing 'Name:' field".to_string())?
            .trim();

        let mut pairs = Vec::new();
        for part in parts.filter(|p| !p.trim().is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| format!("field '{part}' is not key=value"))?;
            pairs.push((key.trim(), value.trim()));
        }
        Ok(Self { name, pairs })
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str(text: &str) -> Vec<LedgerNode> {
        decode(Path::new("ledger.txt"), text).unwrap()
    }

    #[test]
    fn test_indented_lines_attach_to_matching_level_only() {
        let nodes = decode_str(
            "[L2] Name: B\tBlockType=SubSystem\tSID=7\tFatherNode=A\n\
             \t[L2 Port] Name:In1\tBlockType=Inport\tSID=1\n\
             \t[L3 Port] Name:Stray\tBlockType=Inport\tSID=2\n\
             \t[L2 virtual Port] Name:B->C\tBlockType=Outport\tSID=7->8\n",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].port_count, 2);
        assert_eq!(nodes[0].parent_name.as_deref(), Some("A"));
    }

    #[test]
    fn test_duplicate_providers_accumulate() {
        let nodes = decode_str(
            "[L2] Name: B\tBlockType=SubSystem\tSID=7\tFatherNode=A\n\
             \t[L2 Connect] Name:C\tSID=8\tstrength=2\n\
             \t[L2 Connect] Name:C\tSID=8\tstrength=3\n\
             \t[L2 Connect] Name:D\tSID=9\tstrength=0\n",
        );
        assert_eq!(nodes[0].uses.get("C"), Some(&5));
        assert!(!nodes[0].uses.contains_key("D"));
    }

    #[test]
    fn test_level_one_interface_ports_are_counted() {
        let nodes = decode_str(
            "[L1] Name: A\tBlockType=SubSystem\tSID=3\n\
             \t[L1 Port] Name:In1\tBlockType=Inport\tSID=4\tPortType=S-R\n\
             \t[L1 Port] Name:Read\tBlockType=Inport\tSID=unknown\tPortType=C-S\n",
        );
        assert_eq!(nodes[0].port_count, 2);
        assert_eq!(nodes[0].interface_port_count, 1);
        assert_eq!(nodes[0].parent_name, None);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let err = decode(
            Path::new("ledger.txt"),
            "[L1] Name: A\tBlockType=SubSystem\tSID=3\nthis is not a ledger line\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = decode(
            Path::new("ledger.txt"),
            "[L1] Name: A\tSID=3\n\t[L1 Connect] Name:B\tSID=4\tstrength=many\n",
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }
}
