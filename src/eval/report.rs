//! Per-split console report.
//!
//! Formats the evaluation outcome of one split as the fixed block printed
//! after each run: accuracies, loss, micro-averaged precision/recall/F1,
//! and the raw confusion matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::eval::evaluator::SplitOutcome;
use crate::utils::metrics::Metrics;
use crate::NUM_CLASSES;

/// Report for one evaluated split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// Top-1 accuracy in percent
    pub top1_accuracy: f64,
    /// Top-2 accuracy in percent
    pub top2_accuracy: f64,
    /// Sample-weighted mean cross-entropy loss
    pub mean_loss: f64,
    /// Classification metrics derived from the label sequences
    pub metrics: Metrics,
}

impl SplitReport {
    /// Build a report from a completed evaluation
    pub fn from_outcome(outcome: &SplitOutcome) -> Self {
        Self {
            top1_accuracy: outcome.top1_accuracy(),
            top2_accuracy: outcome.top2_accuracy(),
            mean_loss: outcome.mean_loss,
            metrics: Metrics::from_sequences(&outcome.y_true, &outcome.y_pred, NUM_CLASSES),
        }
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "Top 1 Accuracy: {:.6} %", self.top1_accuracy)?;
        writeln!(f, "Top 2 Accuracy: {:.6} %", self.top2_accuracy)?;
        writeln!(f, "Loss: {:.6}", self.mean_loss)?;
        writeln!(f, "Precision: {:.6}", self.metrics.micro_precision)?;
        writeln!(f, "Recall: {:.6}", self.metrics.micro_recall)?;
        writeln!(f, "F1 Score: {:.6}", self.metrics.micro_f1)?;
        write!(f, "Confusion Matrix:\n{}", self.metrics.confusion_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> SplitOutcome {
        SplitOutcome {
            y_true: vec![0, 1, 2, 3],
            y_pred: vec![0, 1, 2, 2],
            total: 4,
            top1_correct: 3,
            top2_correct: 4,
            mean_loss: 0.52,
        }
    }

    #[test]
    fn test_report_values() {
        let report = SplitReport::from_outcome(&outcome());

        assert!((report.top1_accuracy - 75.0).abs() < 1e-9);
        assert!((report.top2_accuracy - 100.0).abs() < 1e-9);
        // Micro precision equals accuracy for single-label classification
        assert!((report.metrics.micro_precision - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_report_format() {
        let report = SplitReport::from_outcome(&outcome());
        let text = format!("{report}");

        assert!(text.starts_with(&"-".repeat(50)));
        assert!(text.contains("Top 1 Accuracy: 75.000000 %"));
        assert!(text.contains("Top 2 Accuracy: 100.000000 %"));
        assert!(text.contains("Loss: 0.520000"));
        assert!(text.contains("F1 Score: 0.750000"));
        assert!(text.contains("Confusion Matrix:"));
    }
}
