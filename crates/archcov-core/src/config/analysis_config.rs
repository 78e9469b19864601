//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// What the walker does when one branch of the hierarchy fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BranchPolicy {
    /// Record the failure, keep visiting sibling branches.
    #[default]
    Isolate,
    /// Abort the whole model run on the first failure.
    FailFast,
}

impl std::str::FromStr for BranchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "isolate" => Ok(Self::Isolate),
            "fail_fast" => Ok(Self::FailFast),
            other => Err(format!("unknown branch policy '{other}'")),
        }
    }
}

/// Configuration for the hierarchy analysis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Deepest hierarchy level visited. Default: 3.
    pub max_depth: Option<u32>,
    /// Weight of an interface port in the level-1 effective port count. Default: 1.2.
    pub interface_port_weight: Option<f64>,
    /// Metric number used in the emitted property name (`coverage.m<n>`). Default: 1.
    pub metric_id: Option<u32>,
    /// Branch failure handling. Default: isolate.
    pub branch_policy: Option<BranchPolicy>,
    /// Synthesize virtual ports for direct block-to-block wires. Default: false.
    pub virtual_ports: Option<bool>,
}

impl AnalysisConfig {
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(3)
    }

    pub fn effective_interface_port_weight(&self) -> f64 {
        self.interface_port_weight.unwrap_or(1.2)
    }

    pub fn effective_metric_id(&self) -> u32 {
        self.metric_id.unwrap_or(1)
    }

    pub fn effective_branch_policy(&self) -> BranchPolicy {
        self.branch_policy.unwrap_or_default()
    }

    pub fn effective_virtual_ports(&self) -> bool {
        self.virtual_ports.unwrap_or(false)
    }

    /// Name of the coverage property written to metric documents.
    pub fn coverage_property(&self) -> String {
        format!("coverage.m{}", self.effective_metric_id())
    }
}
