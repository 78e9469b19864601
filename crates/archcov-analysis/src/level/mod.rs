//! Level files: one XML document per hierarchy level of a model.
//!
//! Layout: `<model>/simulink/systems/system_root.xml` is level 1; every
//! composite block `<sid>` that owns a deeper level has `system_<sid>.xml`
//! in the same directory.

pub mod connections;
pub mod interface;
pub mod schema;
pub mod selection;

use std::path::{Path, PathBuf};

use archcov_core::errors::DocumentError;

use self::schema::XmlSystem;

pub use connections::{extract_edges, Edge};
pub use interface::load_interface_ports;
pub use selection::{select_blocks, SelectedBlock};

/// Block type of composite (subsystem-like) blocks.
pub const SUBSYSTEM: &str = "SubSystem";
/// Block type of leaf input ports.
pub const INPORT: &str = "Inport";
/// Block type of leaf output ports.
pub const OUTPORT: &str = "Outport";

/// File name of the top hierarchy level.
pub const ROOT_LEVEL_FILE: &str = "system_root.xml";

/// File name of the level owned by composite block `sid`.
pub fn level_file_name(sid: &str) -> String {
    format!("system_{sid}.xml")
}

/// Trim and collapse inner whitespace runs (newlines included) to one space.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Top level file of the model rooted at `model_dir`.
pub fn root_level_path(model_dir: &Path) -> PathBuf {
    model_dir.join("simulink").join("systems").join(ROOT_LEVEL_FILE)
}

/// Model root of a level file at `<model>/simulink/systems/<file>`.
pub fn model_dir_of(level_file: &Path) -> Option<&Path> {
    level_file.parent()?.parent()?.parent()
}

/// Model name: base name of [`model_dir_of`].
pub fn model_name_of(level_file: &Path) -> Option<String> {
    model_dir_of(level_file)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
}

pub fn is_port_type(block_type: &str) -> bool {
    block_type == INPORT || block_type == OUTPORT
}

/// A parsed level file: its raw block list, wiring, and location.
#[derive(Debug, Clone)]
pub struct LevelFile {
    pub path: PathBuf,
    pub system: XmlSystem,
}

impl LevelFile {
    /// Read and parse a level file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::read(path, e))?;
        Self::parse(path, &content)
    }

    /// Parse level XML that was already read; `path` is used for error reporting.
    pub fn parse(path: &Path, content: &str) -> Result<Self, DocumentError> {
        let system: XmlSystem =
            quick_xml::de::from_str(content).map_err(|e| DocumentError::parse(path, e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            system,
        })
    }

    /// Directory holding this file and its sibling level files.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Model name: the directory two levels above the file's directory
    /// (`<model>/simulink/systems/<file>`).
    pub fn model_name(&self) -> Option<String> {
        model_name_of(&self.path)
    }

    /// Model root directory (`<model>`), if the file sits at the expected depth.
    pub fn model_dir(&self) -> Option<&Path> {
        model_dir_of(&self.path)
    }

    /// Flat edge list of this level's wiring.
    pub fn edges(&self) -> Vec<Edge> {
        connections::collect_edges(&self.system.lines)
    }
}
