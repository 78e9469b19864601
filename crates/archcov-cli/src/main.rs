use std::path::{Path, PathBuf};
use std::process::ExitCode;

use archcov_analysis::document::{read_dependency_map, seed_document};
use archcov_analysis::Pipeline;
use archcov_core::config::{ArchcovConfig, BranchPolicy, CliOverrides};
use archcov_core::errors::{ArchcovErrorCode, DocumentError};
use archcov_core::tracing_setup::{init_tracing, init_tracing_with_filter};
use clap::{Parser, Subcommand};
use tracing::{error, info};

/// Architectural-coupling coverage for hierarchical block-diagram models
#[derive(Parser, Debug)]
#[command(name = "archcov", version, about = "Architectural-coupling coverage analysis")]
struct Cli {
    /// Log filter directive (overrides $ARCHCOV_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse every unpacked model under a build directory
    Analyze {
        /// Directory holding one sub-directory per model
        build_dir: PathBuf,

        /// Configuration file (defaults to archcov.toml in the build directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Deepest hierarchy level to visit
        #[arg(long)]
        max_depth: Option<u32>,

        /// Branch failure handling: isolate | fail-fast
        #[arg(long)]
        branch_policy: Option<BranchPolicy>,

        /// Directory for ledgers and coverage summaries
        #[arg(long)]
        ledger_dir: Option<PathBuf>,

        /// Directory for per-model metric documents
        #[arg(long)]
        document_dir: Option<PathBuf>,

        /// Master report to merge every model document into
        #[arg(long)]
        master: Option<PathBuf>,
    },

    /// Create a master report from a dependency map (JSON)
    Seed {
        /// Component → [{ "target": .., "strength": .. }] map
        dependencies: PathBuf,
        /// Master report to (over)write
        master: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match &cli.log {
        Some(filter) => init_tracing_with_filter(filter),
        None => init_tracing(),
    }

    match cli.command {
        Commands::Analyze {
            build_dir,
            config,
            max_depth,
            branch_policy,
            ledger_dir,
            document_dir,
            master,
        } => {
            let overrides = CliOverrides {
                max_depth,
                branch_policy,
                ledger_dir,
                document_dir,
                master_report: master,
            };
            analyze(&build_dir, config.as_deref(), &overrides)
        }
        Commands::Seed {
            dependencies,
            master,
        } => match seed(&dependencies, &master) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(code = e.error_code(), "{e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn analyze(build_dir: &Path, config_file: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    let config = match config_file {
        Some(path) => ArchcovConfig::load_file(path, Some(overrides)),
        None => ArchcovConfig::load(build_dir, Some(overrides)),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::new(&config);
    let results = match pipeline.run_build_dir(build_dir) {
        Ok(results) => results,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    for result in &results {
        let report = &result.data;
        for e in &result.errors {
            error!(model = %report.analysis.model_name, code = e.error_code(), "{e}");
        }
        if !result.is_clean() {
            failed += 1;
        }
        if let Some(path) = &report.document_path {
            info!(
                model = %report.analysis.model_name,
                document = %path.display(),
                elements = report.analysis.document.elements.len(),
                "document written"
            );
        }
    }

    info!(models = results.len(), failed, "analysis complete");
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn seed(dependencies: &Path, master: &Path) -> Result<(), DocumentError> {
    let map = read_dependency_map(dependencies)?;
    let document = seed_document(&map);
    document.write(master)?;
    info!(
        master = %master.display(),
        elements = document.elements.len(),
        "master report seeded"
    );
    Ok(())
}
