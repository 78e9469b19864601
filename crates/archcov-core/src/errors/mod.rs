//! Error handling for archcov.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod document_error;
pub mod error_code;
pub mod pipeline_error;

pub use config_error::ConfigError;
pub use document_error::DocumentError;
pub use error_code::ArchcovErrorCode;
pub use pipeline_error::{PipelineError, PipelineResult};
