//! Per-model ledger: the hand-off between per-level emission and
//! whole-model coverage computation.
//!
//! Emissions are kept in memory in traversal order and turned into
//! [`LedgerNode`]s directly. The textual form (see [`codec`]) is an optional
//! debug dump written one level at a time.

pub mod codec;
pub mod node;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use archcov_core::errors::DocumentError;
use tracing::debug;

pub use self::node::LedgerNode;
use crate::synthesis::LevelEmission;

/// Receives level emissions in walker order.
pub trait LevelSink {
    fn record(&mut self, emission: LevelEmission) -> Result<(), DocumentError>;
}

/// In-memory ledger with an optional text dump on disk.
#[derive(Debug, Default)]
pub struct Ledger {
    emissions: Vec<LevelEmission>,
    dump: Option<PathBuf>,
}

impl Ledger {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Ledger that also appends its text form to `path`. Any previous file is
    /// truncated so stale output never survives a new run.
    pub fn with_dump(path: &Path) -> Result<Self, DocumentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::write(parent, e))?;
        }
        std::fs::File::create(path).map_err(|e| DocumentError::write(path, e))?;
        Ok(Self {
            emissions: Vec::new(),
            dump: Some(path.to_path_buf()),
        })
    }

    pub fn dump_path(&self) -> Option<&Path> {
        self.dump.as_deref()
    }

    pub fn emissions(&self) -> &[LevelEmission] {
        &self.emissions
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.iter().all(LevelEmission::is_empty)
    }

    /// Flatten every recorded block into a node, in ledger order.
    pub fn nodes(&self) -> Vec<LedgerNode> {
        self.emissions
            .iter()
            .flat_map(|e| e.blocks.iter())
            .map(LedgerNode::from)
            .collect()
    }

    fn append_text(path: &Path, text: &str) -> Result<(), DocumentError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DocumentError::write(path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| DocumentError::write(path, e))
    }
}

impl LevelSink for Ledger {
    fn record(&mut self, emission: LevelEmission) -> Result<(), DocumentError> {
        if let Some(path) = &self.dump {
            let text = codec::encode_level(&emission);
            if !text.is_empty() {
                Self::append_text(path, &text)?;
            }
            debug!(path = %path.display(), level = emission.level, bytes = text.len(), "ledger level appended");
        }
        self.emissions.push(emission);
        Ok(())
    }
}
