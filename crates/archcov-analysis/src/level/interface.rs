//! Interface descriptor: model-wide ports declared outside the wiring.
//!
//! `<model>/simulink/graphicalInterface.xml` lists `RequireFunction` entries
//! (consumed → `Inport`) and `ProvideFunction` entries (offered → `Outport`).

use std::path::{Path, PathBuf};

use archcov_core::errors::DocumentError;

use super::normalize_name;
use super::schema::{property, XmlFunction, XmlGraphicalInterface};
use crate::synthesis::types::{PortDirection, PortKind, PortRecord};

/// Id recorded for interface ports, which have no block in any level file.
pub const INTERFACE_PORT_SID: &str = "unknown";

/// Location of the interface descriptor inside a model directory.
pub fn interface_descriptor_path(model_dir: &Path) -> PathBuf {
    model_dir.join("simulink").join("graphicalInterface.xml")
}

/// Read the model's interface descriptor and return its ports, requires first.
pub fn load_interface_ports(model_dir: &Path) -> Result<Vec<PortRecord>, DocumentError> {
    let path = interface_descriptor_path(model_dir);
    let content = std::fs::read_to_string(&path).map_err(|e| DocumentError::read(&path, e))?;
    parse_interface_ports(&path, &content)
}

pub fn parse_interface_ports(path: &Path, content: &str) -> Result<Vec<PortRecord>, DocumentError> {
    let gi: XmlGraphicalInterface =
        quick_xml::de::from_str(content).map_err(|e| DocumentError::parse(path, e.to_string()))?;

    let requires = gi
        .requires
        .iter()
        .filter_map(|f| interface_port(f, PortDirection::Inport));
    let provides = gi
        .provides
        .iter()
        .filter_map(|f| interface_port(f, PortDirection::Outport));

    Ok(requires.chain(provides).collect())
}

fn interface_port(function: &XmlFunction, direction: PortDirection) -> Option<PortRecord> {
    let name = normalize_name(property(&function.properties, "Name")?);
    if name.is_empty() {
        return None;
    }
    Some(PortRecord {
        name,
        direction,
        sid: INTERFACE_PORT_SID.to_string(),
        kind: PortKind::Interface,
        is_virtual: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_become_inports_and_provides_outports() {
        let xml = r#"<GraphicalInterface>
            <ProvideFunction><P Name="Name">GetSpeed</P></ProvideFunction>
            <RequireFunction><P Name="Name">  Read
                Sensor </P></RequireFunction>
            <RequireFunction><P Name="Other">x</P></RequireFunction>
        </GraphicalInterface>"#;

        let ports = parse_interface_ports(Path::new("gi.xml"), xml).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "Read Sensor");
        assert_eq!(ports[0].direction, PortDirection::Inport);
        assert_eq!(ports[1].name, "GetSpeed");
        assert_eq!(ports[1].direction, PortDirection::Outport);
        assert!(ports.iter().all(|p| p.kind == PortKind::Interface));
    }

    #[test]
    fn test_missing_descriptor_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_interface_ports(dir.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
