//! Dataset module for FER2013 data handling
//!
//! This module provides functionality for:
//! - Parsing the `fer2013.csv` source file
//! - Partitioning rows into train/validation/test splits via the `Usage` column
//! - Deterministic test-time crops (center crop and ten-crop)
//! - Batching samples into Burn tensors
//!
//! ## Label encoding
//!
//! FER2013 encodes seven emotions (0=Angry, 1=Disgust, 2=Fear, 3=Happy,
//! 4=Sad, 5=Surprise, 6=Neutral). This harness evaluates the four-class
//! subset the checkpoint was trained on; rows outside it are skipped at
//! load time. `EMOTIONS` is the single source of truth for class order —
//! the loader, the reporter, and the heat-map axes all index into it, so
//! axis labels cannot drift from the label encoding.

pub mod batcher;
pub mod crops;
pub mod fer2013;

// Re-export main types for convenience
pub use batcher::{FerBatch, FerBatcher, FerImages};
pub use crops::{center_crop, ten_crop};
pub use fer2013::{Fer2013, FerItem, SplitDataset};

use crate::NUM_CLASSES;

/// Class names, index-aligned with the labels produced by the loader
pub const EMOTIONS: [&str; NUM_CLASSES] = ["Angry", "Happy", "Sad", "Neutral"];

/// FER2013 emotion codes retained by the loader, in class order
pub const FER_EMOTION_CODES: [u8; NUM_CLASSES] = [0, 3, 4, 6];

/// Get the class name for a given label index
pub fn class_name(label: usize) -> Option<&'static str> {
    EMOTIONS.get(label).copied()
}

/// Get the label index for a given class name
pub fn class_index(name: &str) -> Option<usize> {
    EMOTIONS.iter().position(|&n| n == name)
}

/// Map a raw FER2013 emotion code to a class label, if it is in the subset
pub fn label_from_code(code: u8) -> Option<usize> {
    FER_EMOTION_CODES.iter().position(|&c| c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name(0), Some("Angry"));
        assert_eq!(class_name(3), Some("Neutral"));
        assert_eq!(class_name(4), None);
    }

    #[test]
    fn test_class_index() {
        assert_eq!(class_index("Happy"), Some(1));
        assert_eq!(class_index("Sad"), Some(2));
        assert_eq!(class_index("Disgust"), None);
    }

    #[test]
    fn test_label_from_code() {
        assert_eq!(label_from_code(0), Some(0)); // Angry
        assert_eq!(label_from_code(3), Some(1)); // Happy
        assert_eq!(label_from_code(4), Some(2)); // Sad
        assert_eq!(label_from_code(6), Some(3)); // Neutral
        assert_eq!(label_from_code(1), None); // Disgust is dropped
        assert_eq!(label_from_code(5), None); // Surprise is dropped
    }
}
