//! Output locations and artifact toggles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the per-model textual ledgers and summaries.
    pub ledger_dir: Option<PathBuf>,
    /// Directory receiving the per-model metric documents.
    pub document_dir: Option<PathBuf>,
    /// Master report that per-model documents are merged into.
    pub master_report: Option<PathBuf>,
    /// Dump the textual ledger next to the documents. Default: true.
    pub write_ledger: Option<bool>,
    /// Write the per-model coverage summary. Default: true.
    pub write_stats: Option<bool>,
}

impl OutputConfig {
    pub fn effective_write_ledger(&self) -> bool {
        self.write_ledger.unwrap_or(true)
    }

    pub fn effective_write_stats(&self) -> bool {
        self.write_stats.unwrap_or(true)
    }

    /// The ledger directory, or `NotInitialized` if it was never configured.
    pub fn require_ledger_dir(&self) -> Result<&Path, ConfigError> {
        self.ledger_dir
            .as_deref()
            .ok_or_else(|| ConfigError::NotInitialized {
                field: "output.ledger_dir".to_string(),
            })
    }

    /// The document directory, or `NotInitialized` if it was never configured.
    pub fn require_document_dir(&self) -> Result<&Path, ConfigError> {
        self.document_dir
            .as_deref()
            .ok_or_else(|| ConfigError::NotInitialized {
                field: "output.document_dir".to_string(),
            })
    }
}
