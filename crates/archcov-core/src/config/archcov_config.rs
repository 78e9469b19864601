//! Top-level archcov configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisConfig, BranchPolicy, OutputConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "archcov.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`ARCHCOV_*`)
/// 3. Project config (`archcov.toml` in project root, or an explicit file)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArchcovConfig {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_depth: Option<u32>,
    pub branch_policy: Option<BranchPolicy>,
    pub ledger_dir: Option<PathBuf>,
    pub document_dir: Option<PathBuf>,
    pub master_report: Option<PathBuf>,
}

impl ArchcovConfig {
    /// Load configuration, reading `archcov.toml` from `root` when present.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        let file = project_config_path
            .exists()
            .then_some(project_config_path.as_path());
        Self::load_layers(file, cli_overrides)
    }

    /// Load configuration from an explicit config file. The file must exist.
    pub fn load_file(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load_layers(Some(path), cli_overrides)
    }

    fn load_layers(
        file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = file {
            Self::merge_toml_file(&mut config, path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        debug!(
            file = ?file,
            max_depth = config.analysis.effective_max_depth(),
            branch_policy = ?config.analysis.effective_branch_policy(),
            "configuration resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ArchcovConfig) -> Result<(), ConfigError> {
        if config.analysis.max_depth == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.max_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(weight) = config.analysis.interface_port_weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.interface_port_weight".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ArchcovConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: ArchcovConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut ArchcovConfig, other: &ArchcovConfig) {
        // Analysis
        if other.analysis.max_depth.is_some() {
            base.analysis.max_depth = other.analysis.max_depth;
        }
        if other.analysis.interface_port_weight.is_some() {
            base.analysis.interface_port_weight = other.analysis.interface_port_weight;
        }
        if other.analysis.metric_id.is_some() {
            base.analysis.metric_id = other.analysis.metric_id;
        }
        if other.analysis.branch_policy.is_some() {
            base.analysis.branch_policy = other.analysis.branch_policy;
        }
        if other.analysis.virtual_ports.is_some() {
            base.analysis.virtual_ports = other.analysis.virtual_ports;
        }

        // Output
        if other.output.ledger_dir.is_some() {
            base.output.ledger_dir = other.output.ledger_dir.clone();
        }
        if other.output.document_dir.is_some() {
            base.output.document_dir = other.output.document_dir.clone();
        }
        if other.output.master_report.is_some() {
            base.output.master_report = other.output.master_report.clone();
        }
        if other.output.write_ledger.is_some() {
            base.output.write_ledger = other.output.write_ledger;
        }
        if other.output.write_stats.is_some() {
            base.output.write_stats = other.output.write_stats;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ARCHCOV_MAX_DEPTH`, `ARCHCOV_LEDGER_DIR`, etc.
    fn apply_env_overrides(config: &mut ArchcovConfig) {
        if let Ok(val) = std::env::var("ARCHCOV_MAX_DEPTH") {
            if let Ok(v) = val.parse::<u32>() {
                config.analysis.max_depth = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARCHCOV_INTERFACE_PORT_WEIGHT") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.interface_port_weight = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARCHCOV_METRIC_ID") {
            if let Ok(v) = val.parse::<u32>() {
                config.analysis.metric_id = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARCHCOV_BRANCH_POLICY") {
            if let Ok(v) = val.parse::<BranchPolicy>() {
                config.analysis.branch_policy = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARCHCOV_VIRTUAL_PORTS") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.virtual_ports = Some(v);
            }
        }
        if let Some(val) = std::env::var_os("ARCHCOV_LEDGER_DIR") {
            config.output.ledger_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = std::env::var_os("ARCHCOV_DOCUMENT_DIR") {
            config.output.document_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = std::env::var_os("ARCHCOV_MASTER_REPORT") {
            config.output.master_report = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ARCHCOV_WRITE_LEDGER") {
            if let Ok(v) = val.parse::<bool>() {
                config.output.write_ledger = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARCHCOV_WRITE_STATS") {
            if let Ok(v) = val.parse::<bool>() {
                config.output.write_stats = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ArchcovConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_depth {
            config.analysis.max_depth = Some(v);
        }
        if let Some(v) = cli.branch_policy {
            config.analysis.branch_policy = Some(v);
        }
        if let Some(ref v) = cli.ledger_dir {
            config.output.ledger_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.document_dir {
            config.output.document_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.master_report {
            config.output.master_report = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
