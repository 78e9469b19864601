//! Pipeline errors and non-fatal error collection.

use std::path::PathBuf;

use super::error_code::ArchcovErrorCode;
use super::{ConfigError, DocumentError};

/// Errors that can occur while analysing one model.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Branch at {file} aborted: {source}")]
    Branch {
        file: PathBuf,
        #[source]
        source: DocumentError,
    },
}

impl ArchcovErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Document(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Branch { source, .. } => source.error_code(),
        }
    }
}

/// Result of a run that accumulates non-fatal errors.
/// Allows partial results to be returned when some branches fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
