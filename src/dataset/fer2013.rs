//! FER2013 CSV loading and split provider.
//!
//! The dataset ships as a single `fer2013.csv` with three columns:
//! `emotion` (integer code), `pixels` (2304 space-separated grayscale
//! values for a 48x48 image), and `Usage` (`Training`, `PublicTest`, or
//! `PrivateTest`). The `Usage` column defines the three evaluation splits.

use std::path::Path;

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use super::label_from_code;
use crate::utils::error::{FerEvalError, Result};
use crate::IMAGE_SIZE;

/// One raw row of `fer2013.csv`
#[derive(Debug, Deserialize)]
struct FerRecord {
    emotion: u8,
    pixels: String,
    #[serde(rename = "Usage")]
    usage: String,
}

/// A single FER2013 sample ready for batching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FerItem {
    /// 48x48 grayscale image, row-major, values in [0, 1]
    pub pixels: Vec<f32>,
    /// Class label in [0, NUM_CLASSES)
    pub label: usize,
}

impl FerItem {
    fn from_record(record: &FerRecord, label: usize) -> Result<Self> {
        let pixels: Vec<f32> = record
            .pixels
            .split_ascii_whitespace()
            .map(|v| {
                v.parse::<f32>()
                    .map(|p| p / 255.0)
                    .map_err(|e| FerEvalError::Dataset(format!("bad pixel value '{v}': {e}")))
            })
            .collect::<Result<_>>()?;

        if pixels.len() != IMAGE_SIZE * IMAGE_SIZE {
            return Err(FerEvalError::Dataset(format!(
                "expected {} pixels per row, got {}",
                IMAGE_SIZE * IMAGE_SIZE,
                pixels.len()
            )));
        }

        Ok(Self { pixels, label })
    }
}

/// The identity of a data split
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// Short header printed before a split's report
    pub fn header(&self) -> &'static str {
        match self {
            Split::Train => "Train",
            Split::Val => "Val",
            Split::Test => "Test",
        }
    }

    /// Human-readable set name used in plot titles and file names
    pub fn set_name(&self) -> &'static str {
        match self {
            Split::Train => "Training Set",
            Split::Val => "Val Set",
            Split::Test => "Test Set",
        }
    }
}

/// An in-memory evaluation split implementing Burn's `Dataset` trait
#[derive(Clone, Debug, Default)]
pub struct SplitDataset {
    items: Vec<FerItem>,
}

impl SplitDataset {
    /// Create a split from pre-loaded items
    pub fn new(items: Vec<FerItem>) -> Self {
        Self { items }
    }

    /// Samples per class, indexed by label
    pub fn class_distribution(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        for item in &self.items {
            if item.label < num_classes {
                counts[item.label] += 1;
            }
        }
        counts
    }
}

impl Dataset<FerItem> for SplitDataset {
    fn get(&self, index: usize) -> Option<FerItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// The three FER2013 splits, loaded once from disk
#[derive(Clone, Debug)]
pub struct Fer2013 {
    pub train: SplitDataset,
    pub val: SplitDataset,
    pub test: SplitDataset,
}

impl Fer2013 {
    /// Parse `fer2013.csv` and partition rows by the `Usage` column.
    ///
    /// Rows whose emotion code is outside the evaluated subset are
    /// skipped; an unknown `Usage` value is a fatal error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FerEvalError::PathNotFound(path.to_path_buf()));
        }

        let mut reader = csv::Reader::from_path(path)?;

        let mut train = Vec::new();
        let mut val = Vec::new();
        let mut test = Vec::new();

        for record in reader.deserialize() {
            let record: FerRecord = record?;

            let Some(label) = label_from_code(record.emotion) else {
                continue;
            };
            let item = FerItem::from_record(&record, label)?;

            match record.usage.as_str() {
                "Training" => train.push(item),
                "PublicTest" => val.push(item),
                "PrivateTest" => test.push(item),
                other => {
                    return Err(FerEvalError::Dataset(format!(
                        "unknown Usage value '{other}'"
                    )))
                }
            }
        }

        tracing::info!(
            train = train.len(),
            val = val.len(),
            test = test.len(),
            "loaded FER2013 splits"
        );

        Ok(Self {
            train: SplitDataset::new(train),
            val: SplitDataset::new(val),
            test: SplitDataset::new(test),
        })
    }

    /// Iterate the splits in evaluation order
    pub fn splits(&self) -> [(Split, &SplitDataset); 3] {
        [
            (Split::Train, &self.train),
            (Split::Val, &self.val),
            (Split::Test, &self.test),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pixel_row(value: u8) -> String {
        vec![value.to_string(); IMAGE_SIZE * IMAGE_SIZE].join(" ")
    }

    fn write_csv(rows: &[(u8, u8, &str)]) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let path = std::env::temp_dir().join(format!(
            "fer_eval_test_{}_{}.csv",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "emotion,pixels,Usage").unwrap();
        for (emotion, value, usage) in rows {
            writeln!(file, "{},{},{}", emotion, pixel_row(*value), usage).unwrap();
        }
        path
    }

    #[test]
    fn test_load_partitions_by_usage() {
        let path = write_csv(&[
            (0, 10, "Training"),
            (3, 20, "Training"),
            (4, 30, "PublicTest"),
            (6, 40, "PrivateTest"),
        ]);

        let splits = Fer2013::load(&path).unwrap();
        assert_eq!(splits.train.len(), 2);
        assert_eq!(splits.val.len(), 1);
        assert_eq!(splits.test.len(), 1);

        let item = splits.train.get(0).unwrap();
        assert_eq!(item.label, 0);
        assert_eq!(item.pixels.len(), IMAGE_SIZE * IMAGE_SIZE);
        assert!((item.pixels[0] - 10.0 / 255.0).abs() < 1e-6);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_skips_out_of_subset_emotions() {
        // Disgust (1), Fear (2), Surprise (5) are not evaluated
        let path = write_csv(&[
            (1, 0, "Training"),
            (2, 0, "Training"),
            (5, 0, "Training"),
            (3, 0, "Training"),
        ]);

        let splits = Fer2013::load(&path).unwrap();
        assert_eq!(splits.train.len(), 1);
        assert_eq!(splits.train.get(0).unwrap().label, 1); // Happy

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_unknown_usage() {
        let path = write_csv(&[(0, 0, "Mystery")]);
        assert!(Fer2013::load(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = Fer2013::load(Path::new("/nonexistent/fer2013.csv")).unwrap_err();
        assert!(matches!(err, FerEvalError::PathNotFound(_)));
    }

    #[test]
    fn test_class_distribution() {
        let items = vec![
            FerItem { pixels: vec![0.0], label: 0 },
            FerItem { pixels: vec![0.0], label: 0 },
            FerItem { pixels: vec![0.0], label: 3 },
        ];
        let split = SplitDataset::new(items);
        assert_eq!(split.class_distribution(4), vec![2, 0, 0, 1]);
    }
}
