//! Depth-bounded walk over a model's level files.
//!
//! Level `d` is selected and synthesized, then, while `d < max_depth` and the
//! level selected anything, each selected block owning a `system_<sid>.xml`
//! is visited at `d + 1` with that block's name as parent. Levels are handed
//! to the sink strictly in depth-first, file order.

use std::ops::ControlFlow;
use std::path::Path;

use archcov_core::config::{AnalysisConfig, BranchPolicy};
use archcov_core::errors::{DocumentError, PipelineError, PipelineResult};
use tracing::{debug, warn};

use crate::ledger::LevelSink;
use crate::level::{level_file_name, model_name_of, select_blocks, LevelFile};
use crate::synthesis::PortSynthesizer;

/// Counters describing one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub levels_visited: usize,
    pub blocks_emitted: usize,
    pub deepest_level: u32,
    /// Set when a fail-fast policy stopped the walk early.
    pub aborted: bool,
}

pub struct TreeWalker {
    synthesizer: PortSynthesizer,
    max_depth: u32,
    policy: BranchPolicy,
}

struct Visit<'a> {
    model_name: &'a str,
    depth: u32,
    parent: Option<&'a str>,
}

impl TreeWalker {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            synthesizer: PortSynthesizer::new(config),
            max_depth: config.effective_max_depth(),
            policy: config.effective_branch_policy(),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Walk the hierarchy rooted at `root_file`, feeding every level to `sink`.
    ///
    /// Branch failures are collected in the result; under
    /// [`BranchPolicy::FailFast`] the first one stops the walk.
    pub fn walk(&self, root_file: &Path, sink: &mut impl LevelSink) -> PipelineResult<WalkSummary> {
        let mut result = PipelineResult::<WalkSummary>::default();
        let model_name = model_name_of(root_file).unwrap_or_default();

        let visit = Visit {
            model_name: &model_name,
            depth: 1,
            parent: None,
        };
        if self.visit(root_file, visit, sink, &mut result).is_break() {
            result.data.aborted = true;
        }
        result
    }

    fn visit(
        &self,
        path: &Path,
        at: Visit<'_>,
        sink: &mut impl LevelSink,
        result: &mut PipelineResult<WalkSummary>,
    ) -> ControlFlow<()> {
        if at.depth > self.max_depth {
            return ControlFlow::Continue(());
        }

        let file = match LevelFile::load(path) {
            Ok(file) => file,
            Err(e) => return self.branch_failed(path, e, result),
        };

        let selected = select_blocks(&file, at.depth, at.parent);
        debug!(
            file = %path.display(),
            depth = at.depth,
            selected = selected.len(),
            "level visited"
        );

        let emission = self
            .synthesizer
            .synthesize(&file, at.depth, at.model_name, &selected);
        result.data.levels_visited += 1;
        result.data.blocks_emitted += emission.blocks.len();
        result.data.deepest_level = result.data.deepest_level.max(at.depth);

        if let Err(e) = sink.record(emission) {
            // Ledger order can no longer be trusted.
            result.add_error(PipelineError::Document(e));
            return ControlFlow::Break(());
        }

        if selected.is_empty() || at.depth >= self.max_depth {
            return ControlFlow::Continue(());
        }

        for block in &selected {
            let child = file.dir().join(level_file_name(&block.sid));
            if !child.is_file() {
                continue;
            }
            let next = Visit {
                model_name: at.model_name,
                depth: at.depth + 1,
                parent: Some(block.name.as_str()),
            };
            self.visit(&child, next, sink, result)?;
        }

        ControlFlow::Continue(())
    }

    fn branch_failed(
        &self,
        path: &Path,
        error: DocumentError,
        result: &mut PipelineResult<WalkSummary>,
    ) -> ControlFlow<()> {
        warn!(file = %path.display(), error = %error, "branch aborted");
        result.add_error(PipelineError::Branch {
            file: path.to_path_buf(),
            source: error,
        });
        match self.policy {
            BranchPolicy::Isolate => ControlFlow::Continue(()),
            BranchPolicy::FailFast => ControlFlow::Break(()),
        }
    }
}
