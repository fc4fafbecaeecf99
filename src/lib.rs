//! # FER2013 Evaluation Harness
//!
//! A Rust library for evaluating trained facial-expression classifiers
//! against the FER2013 dataset using the Burn framework.
//!
//! ## Features
//!
//! - **Three-split evaluation** over the Training / PublicTest / PrivateTest
//!   partitions of `fer2013.csv`
//! - **Test-time augmentation** via deterministic ten-crop score ensembling
//! - **Top-k accuracy**, loss, and micro-averaged precision/recall/F1
//! - **Confusion-matrix heat-maps** rendered to PNG with plotters
//!
//! ## Modules
//!
//! - `dataset`: FER2013 CSV parsing, split provider, crops, and batching
//! - `model`: classifier architectures and checkpoint restore
//! - `eval`: the evaluation loop and per-split reporting
//! - `utils`: errors, logging, metrics, and heat-map rendering
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fer_eval::backend::{default_device, DefaultBackend};
//! use fer_eval::dataset::Fer2013;
//! use fer_eval::model::{load_model, Arch};
//!
//! let device = default_device();
//! let model = load_model::<DefaultBackend>(Arch::ResNet18, "best_checkpoint".as_ref(), &device)?;
//! let splits = Fer2013::load("fer2013.csv".as_ref())?;
//! // ... evaluate each split
//! ```

pub mod backend;
pub mod dataset;
pub mod eval;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::batcher::{FerBatch, FerBatcher, FerImages};
pub use dataset::fer2013::{Fer2013, FerItem, SplitDataset};
pub use dataset::{class_index, class_name, EMOTIONS};
pub use eval::evaluator::{evaluate, SplitOutcome};
pub use eval::report::SplitReport;
pub use model::{load_model, Arch, EmotionModel};
pub use utils::error::{FerEvalError, Result};
pub use utils::metrics::{ConfusionMatrix, Metrics};

/// Number of emotion classes evaluated (Angry, Happy, Sad, Neutral)
pub const NUM_CLASSES: usize = 4;

/// FER2013 source image size (48x48 grayscale)
pub const IMAGE_SIZE: usize = 48;

/// Crop size fed to the model
pub const CROP_SIZE: usize = 40;

/// Number of crops in the ten-crop ensemble
pub const N_CROPS: usize = 10;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
