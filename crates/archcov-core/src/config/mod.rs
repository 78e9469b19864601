//! Configuration system for archcov.
//! TOML-based, 3-layer resolution: CLI > env > project > defaults.

pub mod analysis_config;
pub mod archcov_config;
pub mod output_config;

pub use analysis_config::{AnalysisConfig, BranchPolicy};
pub use archcov_config::{ArchcovConfig, CliOverrides};
pub use output_config::OutputConfig;
