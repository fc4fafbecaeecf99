//! Classifier architectures and checkpoint restore.
//!
//! The architecture is selected by name on the command line, constructed
//! with random weights, and then overwritten from a Burn record file
//! produced at training time.

pub mod cnn;
pub mod resnet;

use std::path::Path;
use std::str::FromStr;

use burn::prelude::*;
use burn::record::CompactRecorder;

pub use cnn::{EmotionCnn, EmotionCnnConfig};
pub use resnet::{EmotionResNet, EmotionResNetConfig};

use crate::utils::error::{FerEvalError, Result};

/// Architecture identifier parsed from the `--arch` flag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arch {
    /// Residual network with basic blocks (default)
    ResNet18,
    /// Small convolutional baseline
    SimpleCnn,
}

impl FromStr for Arch {
    type Err = FerEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "resnet18" => Ok(Arch::ResNet18),
            "simplecnn" | "simple_cnn" => Ok(Arch::SimpleCnn),
            _ => Err(FerEvalError::UnknownArch(s.to_string())),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arch::ResNet18 => write!(f, "ResNet18"),
            Arch::SimpleCnn => write!(f, "SimpleCnn"),
        }
    }
}

/// A loaded classifier, ready for inference
pub enum EmotionModel<B: Backend> {
    ResNet18(EmotionResNet<B>),
    SimpleCnn(EmotionCnn<B>),
}

impl<B: Backend> EmotionModel<B> {
    /// Forward pass: `[n, 1, crop, crop]` -> logits `[n, num_classes]`
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        match self {
            EmotionModel::ResNet18(model) => model.forward(x),
            EmotionModel::SimpleCnn(model) => model.forward(x),
        }
    }
}

/// Construct an architecture and restore its weights from a checkpoint.
///
/// The checkpoint must be a Burn `CompactRecorder` record saved from the
/// same architecture; any mismatch is fatal.
pub fn load_model<B: Backend>(
    arch: Arch,
    checkpoint: &Path,
    device: &B::Device,
) -> Result<EmotionModel<B>> {
    let recorder = CompactRecorder::new();
    let map_err = |e: burn::record::RecorderError| {
        FerEvalError::Checkpoint(checkpoint.to_path_buf(), format!("{e:?}"))
    };

    match arch {
        Arch::ResNet18 => {
            let model = EmotionResNetConfig::new().init(device);
            let model = model
                .load_file(checkpoint.to_path_buf(), &recorder, device)
                .map_err(map_err)?;
            Ok(EmotionModel::ResNet18(model))
        }
        Arch::SimpleCnn => {
            let model = EmotionCnnConfig::new().init(device);
            let model = model
                .load_file(checkpoint.to_path_buf(), &recorder, device)
                .map_err(map_err)?;
            Ok(EmotionModel::SimpleCnn(model))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_parsing() {
        assert_eq!("ResNet18".parse::<Arch>().unwrap(), Arch::ResNet18);
        assert_eq!("resnet18".parse::<Arch>().unwrap(), Arch::ResNet18);
        assert_eq!("SimpleCnn".parse::<Arch>().unwrap(), Arch::SimpleCnn);
        assert!("VGG16".parse::<Arch>().is_err());
    }

    #[test]
    fn test_load_model_missing_checkpoint() {
        use burn::backend::NdArray;

        let device = Default::default();
        let result = load_model::<NdArray<f32>>(
            Arch::SimpleCnn,
            Path::new("/nonexistent/checkpoint"),
            &device,
        );

        assert!(matches!(result, Err(FerEvalError::Checkpoint(_, _))));
    }
}
