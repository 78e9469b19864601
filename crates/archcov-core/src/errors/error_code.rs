//! Stable machine-readable error codes.

pub const DOCUMENT_READ_ERROR: &str = "DOCUMENT_READ_ERROR";
pub const DOCUMENT_PARSE_ERROR: &str = "DOCUMENT_PARSE_ERROR";
pub const DOCUMENT_WRITE_ERROR: &str = "DOCUMENT_WRITE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_NOT_INITIALIZED: &str = "CONFIG_NOT_INITIALIZED";

/// Every archcov error maps to one of the codes above.
pub trait ArchcovErrorCode {
    fn error_code(&self) -> &'static str;
}
