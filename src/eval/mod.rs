//! Evaluation loop and per-split reporting.

pub mod evaluator;
pub mod report;

pub use evaluator::{evaluate, SplitOutcome};
pub use report::SplitReport;
