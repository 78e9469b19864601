//! Per-model pipeline: walk → coverage → document → master merge.
//!
//! Every run starts by removing the model's previous ledger, document and
//! summary, so a failed run never leaves stale output behind. Under a
//! fail-fast policy the document still covers the levels emitted before the
//! failure.

use std::path::{Path, PathBuf};

use archcov_core::config::ArchcovConfig;
use archcov_core::errors::{ConfigError, DocumentError, PipelineError, PipelineResult};
use tracing::{debug, info, warn};

use crate::coverage::{reported_nodes, stats, CoverageCalculator};
use crate::document::{merge_into_master, MergeStats, MetricDocument};
use crate::ledger::{Ledger, LedgerNode};
use crate::level::root_level_path;
use crate::walker::{TreeWalker, WalkSummary};

/// In-memory result of analysing one model.
#[derive(Debug, Clone, Default)]
pub struct ModelAnalysis {
    pub model_name: String,
    /// Every emitted node with coverage aggregates filled in.
    pub nodes: Vec<LedgerNode>,
    pub document: MetricDocument,
    pub walk: WalkSummary,
}

/// A model run that also wrote its artifacts.
#[derive(Debug, Clone, Default)]
pub struct ModelReport {
    pub analysis: ModelAnalysis,
    pub document_path: Option<PathBuf>,
    pub ledger_path: Option<PathBuf>,
    pub stats_path: Option<PathBuf>,
    pub merge: Option<MergeStats>,
}

/// Artifact locations of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub ledger: Option<PathBuf>,
    pub stats: Option<PathBuf>,
    pub document: PathBuf,
}

impl ModelPaths {
    pub fn resolve(config: &ArchcovConfig, model_name: &str) -> Result<Self, ConfigError> {
        let output = &config.output;
        let document = output
            .require_document_dir()?
            .join(format!("{model_name}.ldi.xml"));

        let ledger = if output.effective_write_ledger() {
            Some(output.require_ledger_dir()?.join(format!("{model_name}.txt")))
        } else {
            None
        };
        let stats = if output.effective_write_stats() {
            let metric = config.analysis.effective_metric_id();
            Some(
                output
                    .require_ledger_dir()?
                    .join(format!("{model_name}_m{metric}.txt")),
            )
        } else {
            None
        };

        Ok(Self {
            ledger,
            stats,
            document,
        })
    }
}

pub struct Pipeline<'c> {
    config: &'c ArchcovConfig,
    walker: TreeWalker,
    calculator: CoverageCalculator,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c ArchcovConfig) -> Self {
        Self {
            config,
            walker: TreeWalker::new(&config.analysis),
            calculator: CoverageCalculator::new(&config.analysis),
        }
    }

    /// Analyse a model without writing anything.
    pub fn analyze(&self, model_dir: &Path) -> PipelineResult<ModelAnalysis> {
        let mut ledger = Ledger::in_memory();
        self.analyze_into(model_dir, &mut ledger)
    }

    fn analyze_into(&self, model_dir: &Path, ledger: &mut Ledger) -> PipelineResult<ModelAnalysis> {
        let model_name = model_name(model_dir);
        let walked = self.walker.walk(&root_level_path(model_dir), ledger);

        let mut nodes = ledger.nodes();
        self.calculator.compute(&mut nodes);
        let document = {
            let reported = reported_nodes(&nodes, &model_name);
            MetricDocument::from_report(&reported, &self.config.analysis.coverage_property())
        };

        PipelineResult {
            data: ModelAnalysis {
                model_name,
                nodes,
                document,
                walk: walked.data,
            },
            errors: walked.errors,
        }
    }

    /// Analyse a model and write its document, summary and ledger dump,
    /// then merge the document into the master report when one is configured.
    pub fn run_model(&self, model_dir: &Path) -> PipelineResult<ModelReport> {
        let name = model_name(model_dir);
        info!(model = %name, dir = %model_dir.display(), "model analysis started");

        let mut result = PipelineResult::<ModelReport>::default();
        let paths = match ModelPaths::resolve(self.config, &name) {
            Ok(paths) => paths,
            Err(e) => {
                result.add_error(e.into());
                return result;
            }
        };

        let mut ledger = match self.start_fresh(&paths) {
            Ok(ledger) => ledger,
            Err(e) => {
                result.add_error(e);
                return result;
            }
        };

        let analysis = self.analyze_into(model_dir, &mut ledger);
        result.errors.extend(analysis.errors);
        let analysis = analysis.data;
        result.data.ledger_path = ledger.dump_path().map(Path::to_path_buf);

        match analysis.document.write(&paths.document) {
            Ok(()) => result.data.document_path = Some(paths.document.clone()),
            Err(e) => result.errors.push(e.into()),
        }

        if let Some(stats_path) = &paths.stats {
            match stats::write_summary(stats_path, &analysis.nodes) {
                Ok(()) => result.data.stats_path = Some(stats_path.clone()),
                Err(e) => result.errors.push(e.into()),
            }
        }

        if let Some(master) = &self.config.output.master_report {
            match merge_into_master(master, &analysis.document) {
                Ok(stats) => result.data.merge = Some(stats),
                Err(e) => result.errors.push(e.into()),
            }
        }

        info!(
            model = %name,
            levels = analysis.walk.levels_visited,
            elements = analysis.document.elements.len(),
            errors = result.error_count(),
            "model analysis finished"
        );
        result.data.analysis = analysis;
        result
    }

    /// Run every model found under `build_dir`, in name order.
    pub fn run_build_dir(
        &self,
        build_dir: &Path,
    ) -> Result<Vec<PipelineResult<ModelReport>>, DocumentError> {
        let models = discover_models(build_dir)?;
        if models.is_empty() {
            warn!(dir = %build_dir.display(), "no models found");
        }
        Ok(models.iter().map(|dir| self.run_model(dir)).collect())
    }

    /// Remove the previous run's artifacts and open a ledger for this one.
    fn start_fresh(&self, paths: &ModelPaths) -> Result<Ledger, PipelineError> {
        remove_stale(&paths.document)?;
        if let Some(stats) = &paths.stats {
            remove_stale(stats)?;
        }
        if let Some(dir) = &self.config.output.ledger_dir {
            std::fs::create_dir_all(dir).map_err(|e| DocumentError::write(dir, e))?;
        }
        match &paths.ledger {
            Some(path) => Ok(Ledger::with_dump(path)?),
            None => Ok(Ledger::in_memory()),
        }
    }
}

/// Model directories under `build_dir` (those with a root level file), sorted by name.
pub fn discover_models(build_dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
    let entries = std::fs::read_dir(build_dir).map_err(|e| DocumentError::read(build_dir, e))?;

    let mut models = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DocumentError::read(build_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if root_level_path(&path).is_file() {
            models.push(path);
        } else {
            debug!(dir = %path.display(), "skipped: no root level file");
        }
    }
    models.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(models)
}

fn model_name(model_dir: &Path) -> String {
    model_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn remove_stale(path: &Path) -> Result<(), DocumentError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DocumentError::write(path, e)),
    }
}
