//! Errors raised while reading, parsing, or writing model documents
//! (level XML files, interface descriptors, ledgers, metric documents).

use std::path::{Path, PathBuf};

use super::error_code::{self, ArchcovErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

impl ArchcovErrorCode for DocumentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => error_code::DOCUMENT_READ_ERROR,
            Self::Parse { .. } => error_code::DOCUMENT_PARSE_ERROR,
            Self::Write { .. } => error_code::DOCUMENT_WRITE_ERROR,
        }
    }
}
