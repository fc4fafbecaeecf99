//! Metrics Module for Model Evaluation
//!
//! Provides the classification metrics printed in each split report:
//! - Confusion matrix (raw counts and row-normalized)
//! - Micro-averaged precision, recall, F1
//! - Per-class precision, recall, F1, support

use serde::{Deserialize, Serialize};

/// Confusion Matrix for multi-class classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Number of classes
    pub num_classes: usize,

    /// Matrix data (row = actual, column = predicted),
    /// stored as a flat vector in row-major order
    pub matrix: Vec<usize>,
}

impl ConfusionMatrix {
    /// Create a new empty confusion matrix
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            matrix: vec![0; num_classes * num_classes],
        }
    }

    /// Create a confusion matrix from parallel label sequences
    pub fn from_sequences(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Self {
        let mut cm = Self::new(num_classes);
        for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
            cm.add(actual, predicted);
        }
        cm
    }

    /// Add a single prediction to the matrix
    pub fn add(&mut self, actual: usize, predicted: usize) {
        if actual < self.num_classes && predicted < self.num_classes {
            self.matrix[actual * self.num_classes + predicted] += 1;
        }
    }

    /// Get the count at (actual, predicted)
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        if actual < self.num_classes && predicted < self.num_classes {
            self.matrix[actual * self.num_classes + predicted]
        } else {
            0
        }
    }

    /// Total sample count
    pub fn total(&self) -> usize {
        self.matrix.iter().sum()
    }

    /// Diagonal sum (correct predictions)
    pub fn correct(&self) -> usize {
        (0..self.num_classes).map(|i| self.get(i, i)).sum()
    }

    /// Row sums (actual class counts)
    pub fn row_sums(&self) -> Vec<usize> {
        (0..self.num_classes)
            .map(|row| (0..self.num_classes).map(|col| self.get(row, col)).sum())
            .collect()
    }

    /// Column sums (predicted class counts)
    pub fn col_sums(&self) -> Vec<usize> {
        (0..self.num_classes)
            .map(|col| (0..self.num_classes).map(|row| self.get(row, col)).sum())
            .collect()
    }

    /// Row-normalized matrix: each row is the prediction distribution of
    /// its true class. Rows for classes with no samples are zero-filled.
    pub fn normalize_rows(&self) -> Vec<Vec<f64>> {
        let row_sums = self.row_sums();
        (0..self.num_classes)
            .map(|row| {
                let sum = row_sums[row] as f64;
                (0..self.num_classes)
                    .map(|col| {
                        if sum > 0.0 {
                            self.get(row, col) as f64 / sum
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl std::fmt::Display for ConfusionMatrix {
    /// Raw counts, one bracketed row per true class
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .matrix
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for row in 0..self.num_classes {
            let open = if row == 0 { "[[" } else { " [" };
            write!(f, "{open}")?;
            for col in 0..self.num_classes {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", self.get(row, col))?;
            }
            let close = if row == self.num_classes - 1 { "]]" } else { "]" };
            writeln!(f, "{close}")?;
        }
        Ok(())
    }
}

/// Per-class metrics derived from a confusion matrix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class index
    pub class_idx: usize,

    /// True positives
    pub true_positives: usize,

    /// False positives
    pub false_positives: usize,

    /// False negatives
    pub false_negatives: usize,

    /// Precision = TP / (TP + FP)
    pub precision: f64,

    /// Recall = TP / (TP + FN)
    pub recall: f64,

    /// F1 = 2 * (precision * recall) / (precision + recall)
    pub f1: f64,

    /// Support = number of actual samples of this class
    pub support: usize,
}

impl ClassMetrics {
    /// Calculate metrics for one class from a confusion matrix
    pub fn from_confusion_matrix(cm: &ConfusionMatrix, class_idx: usize) -> Self {
        let true_positives = cm.get(class_idx, class_idx);

        let false_positives: usize = (0..cm.num_classes)
            .filter(|&i| i != class_idx)
            .map(|i| cm.get(i, class_idx))
            .sum();

        let false_negatives: usize = (0..cm.num_classes)
            .filter(|&i| i != class_idx)
            .map(|i| cm.get(class_idx, i))
            .sum();

        let support = true_positives + false_negatives;

        let precision = if true_positives + false_positives > 0 {
            true_positives as f64 / (true_positives + false_positives) as f64
        } else {
            0.0
        };

        let recall = if support > 0 {
            true_positives as f64 / support as f64
        } else {
            0.0
        };

        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            class_idx,
            true_positives,
            false_positives,
            false_negatives,
            precision,
            recall,
            f1,
            support,
        }
    }
}

/// Metrics computed from the collected label sequences of one split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Total number of samples evaluated
    pub total_samples: usize,

    /// Micro-averaged precision (pooled TP / (TP + FP))
    pub micro_precision: f64,

    /// Micro-averaged recall (pooled TP / (TP + FN))
    pub micro_recall: f64,

    /// Micro-averaged F1-score
    pub micro_f1: f64,

    /// Per-class metrics
    pub per_class: Vec<ClassMetrics>,

    /// Confusion matrix (raw counts)
    pub confusion_matrix: ConfusionMatrix,
}

impl Metrics {
    /// Compute metrics from parallel true/predicted label sequences
    pub fn from_sequences(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Self {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "label sequences must have the same length"
        );

        let confusion_matrix = ConfusionMatrix::from_sequences(y_true, y_pred, num_classes);

        let per_class: Vec<ClassMetrics> = (0..num_classes)
            .map(|idx| ClassMetrics::from_confusion_matrix(&confusion_matrix, idx))
            .collect();

        // Micro averaging pools the counts across classes before dividing
        let tp: usize = per_class.iter().map(|m| m.true_positives).sum();
        let fp: usize = per_class.iter().map(|m| m.false_positives).sum();
        let fn_: usize = per_class.iter().map(|m| m.false_negatives).sum();

        let micro_precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let micro_recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let micro_f1 = if micro_precision + micro_recall > 0.0 {
            2.0 * micro_precision * micro_recall / (micro_precision + micro_recall)
        } else {
            0.0
        };

        Self {
            total_samples: y_true.len(),
            micro_precision,
            micro_recall,
            micro_f1,
            per_class,
            confusion_matrix,
        }
    }
}
