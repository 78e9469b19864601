//! # archcov-analysis
//!
//! Architectural-coupling analysis over hierarchically decomposed block-diagram
//! models: level extraction, block selection, port and strength synthesis,
//! the node ledger, coverage computation, and metric documents.

pub mod coverage;
pub mod document;
pub mod ledger;
pub mod level;
pub mod pipeline;
pub mod synthesis;
pub mod walker;

pub use coverage::CoverageCalculator;
pub use document::MetricDocument;
pub use ledger::{Ledger, LedgerNode, LevelSink};
pub use pipeline::{discover_models, ModelAnalysis, ModelReport, Pipeline};
pub use walker::{TreeWalker, WalkSummary};
