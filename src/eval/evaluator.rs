//! The evaluation loop.
//!
//! Walks one split in fixed-size batches, runs the classifier (optionally
//! ensembling scores across ten crops per image), and accumulates loss,
//! top-k correctness, and the full true/predicted label sequences.

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::prelude::*;

use crate::dataset::batcher::{FerBatcher, FerImages};
use crate::dataset::fer2013::SplitDataset;
use crate::model::EmotionModel;
use crate::utils::error::{FerEvalError, Result};

/// Aggregate result of evaluating one split
#[derive(Clone, Debug)]
pub struct SplitOutcome {
    /// Ground-truth labels in iteration order
    pub y_true: Vec<usize>,
    /// Arg-max predicted labels in iteration order
    pub y_pred: Vec<usize>,
    /// Number of samples evaluated
    pub total: usize,
    /// Samples whose true label was the highest-scored class
    pub top1_correct: usize,
    /// Samples whose true label was among the two highest-scored classes
    pub top2_correct: usize,
    /// Sample-weighted mean cross-entropy loss
    pub mean_loss: f64,
}

impl SplitOutcome {
    /// Top-1 accuracy in percent
    pub fn top1_accuracy(&self) -> f64 {
        100.0 * self.top1_correct as f64 / self.total as f64
    }

    /// Top-2 accuracy in percent
    pub fn top2_accuracy(&self) -> f64 {
        100.0 * self.top2_correct as f64 / self.total as f64
    }
}

/// Average per-crop scores into one score vector per image.
///
/// Runs the model once on the flattened `[batch * n_crops]` input and
/// averages the resulting logits across the crop axis with equal weight.
pub(crate) fn crop_scores<B: Backend>(
    model: &EmotionModel<B>,
    images: Tensor<B, 5>,
) -> Tensor<B, 2> {
    let [batch, crops, channels, height, width] = images.dims();
    let flat = images.reshape([batch * crops, channels, height, width]);
    let logits = model.forward(flat);
    let classes = logits.dims()[1];

    logits
        .reshape([batch, crops, classes])
        .sum_dim(1)
        .reshape([batch, classes])
        .div_scalar(crops as f32)
}

/// Indices of the highest and second-highest scores in a row
fn top_two(scores: &[f32]) -> (usize, usize) {
    let mut first = 0;
    let mut second = if scores.len() > 1 { 1 } else { 0 };
    if scores.len() > 1 && scores[1] > scores[0] {
        (first, second) = (1, 0);
    }
    for (i, &value) in scores.iter().enumerate().skip(2) {
        if value > scores[first] {
            second = first;
            first = i;
        } else if value > scores[second] {
            second = i;
        }
    }
    (first, second)
}

/// Evaluate a model over one split.
///
/// Iterates the split in `batch_size` chunks, computes cross-entropy
/// loss and top-1/top-2 correctness, and records the true and predicted
/// label sequences in iteration order. The mean loss weights each batch
/// by its sample count, so uneven trailing batches do not skew it.
pub fn evaluate<B: Backend>(
    model: &EmotionModel<B>,
    dataset: &SplitDataset,
    batcher: &FerBatcher,
    batch_size: usize,
    split_name: &str,
    device: &B::Device,
) -> Result<SplitOutcome> {
    let len = dataset.len();
    if len == 0 {
        return Err(FerEvalError::EmptySplit(split_name.to_string()));
    }

    let loss_fn = CrossEntropyLossConfig::new().init(device);

    let mut y_true = Vec::with_capacity(len);
    let mut y_pred = Vec::with_capacity(len);
    let mut top1_correct = 0usize;
    let mut top2_correct = 0usize;
    let mut loss_sum = 0.0f64;

    for start in (0..len).step_by(batch_size) {
        let end = (start + batch_size).min(len);
        let items: Vec<_> = (start..end).filter_map(|i| dataset.get(i)).collect();
        let n = items.len();

        let batch = batcher.batch(items, device);

        let scores = match batch.images {
            FerImages::Plain(images) => model.forward(images),
            FerImages::Crops(images) => crop_scores(model, images),
        };
        let num_classes = scores.dims()[1];

        let batch_loss: f64 = loss_fn
            .forward(scores.clone(), batch.targets.clone())
            .into_scalar()
            .elem();
        loss_sum += batch_loss * n as f64;

        let rows: Vec<f32> = scores
            .into_data()
            .to_vec()
            .map_err(|e| FerEvalError::Tensor(format!("{e:?}")))?;
        let labels: Vec<i64> = batch
            .targets
            .into_data()
            .to_vec()
            .map_err(|e| FerEvalError::Tensor(format!("{e:?}")))?;

        for (row, &label) in rows.chunks(num_classes).zip(labels.iter()) {
            let label = label as usize;
            let (first, second) = top_two(row);

            if first == label {
                top1_correct += 1;
            }
            if first == label || second == label {
                top2_correct += 1;
            }

            y_pred.push(first);
            y_true.push(label);
        }
    }

    Ok(SplitOutcome {
        y_true,
        y_pred,
        total: len,
        top1_correct,
        top2_correct,
        mean_loss: loss_sum / len as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::dataset::fer2013::FerItem;
    use crate::model::EmotionCnnConfig;
    use crate::{CROP_SIZE, IMAGE_SIZE, N_CROPS, NUM_CLASSES};

    type TestBackend = NdArray<f32>;

    fn test_model(device: &<TestBackend as Backend>::Device) -> EmotionModel<TestBackend> {
        EmotionModel::SimpleCnn(EmotionCnnConfig::new().init(device))
    }

    fn test_split(n: usize) -> SplitDataset {
        let items = (0..n)
            .map(|i| FerItem {
                pixels: (0..IMAGE_SIZE * IMAGE_SIZE)
                    .map(|p| ((p + i * 7) % 256) as f32 / 255.0)
                    .collect(),
                label: i % NUM_CLASSES,
            })
            .collect();
        SplitDataset::new(items)
    }

    #[test]
    fn test_top_two() {
        assert_eq!(top_two(&[0.1, 0.5, 0.3, 0.2]), (1, 2));
        assert_eq!(top_two(&[0.9, 0.1, 0.2, 0.3]), (0, 3));
        assert_eq!(top_two(&[0.1, 0.2]), (1, 0));
    }

    #[test]
    fn test_outcome_shapes_and_ranges() {
        let device = Default::default();
        let model = test_model(&device);
        let split = test_split(10);
        let batcher = FerBatcher::new(false);

        let outcome = evaluate(&model, &split, &batcher, 4, "Test", &device).unwrap();

        assert_eq!(outcome.total, 10);
        assert_eq!(outcome.y_true.len(), 10);
        assert_eq!(outcome.y_pred.len(), 10);
        assert!(outcome.y_pred.iter().all(|&p| p < NUM_CLASSES));
        assert!(outcome.top1_correct <= outcome.top2_correct);
        assert!(outcome.mean_loss.is_finite());
    }

    #[test]
    fn test_empty_split_is_an_error() {
        let device = Default::default();
        let model = test_model(&device);
        let split = SplitDataset::new(vec![]);
        let batcher = FerBatcher::new(false);

        let err = evaluate(&model, &split, &batcher, 4, "Val", &device).unwrap_err();
        assert!(matches!(err, FerEvalError::EmptySplit(_)));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let device = Default::default();
        let model = test_model(&device);
        let split = test_split(9);
        let batcher = FerBatcher::new(true);

        let a = evaluate(&model, &split, &batcher, 4, "Test", &device).unwrap();
        let b = evaluate(&model, &split, &batcher, 4, "Test", &device).unwrap();

        assert_eq!(a.y_pred, b.y_pred);
        assert_eq!(a.top1_correct, b.top1_correct);
        assert_eq!(a.mean_loss, b.mean_loss);
    }

    #[test]
    fn test_identical_crops_match_single_pass() {
        // Averaging over identical crops must reproduce the plain path.
        let device = Default::default();
        let model = test_model(&device);

        let image: Vec<f32> = (0..CROP_SIZE * CROP_SIZE)
            .map(|p| (p % 256) as f32 / 255.0)
            .collect();
        let mut repeated = Vec::new();
        for _ in 0..N_CROPS {
            repeated.extend_from_slice(&image);
        }

        let crops = Tensor::<TestBackend, 5>::from_floats(
            TensorData::new(repeated, [1, N_CROPS, 1, CROP_SIZE, CROP_SIZE]),
            &device,
        );
        let plain = Tensor::<TestBackend, 4>::from_floats(
            TensorData::new(image, [1, 1, CROP_SIZE, CROP_SIZE]),
            &device,
        );

        let ensembled: Vec<f32> = crop_scores(&model, crops).into_data().to_vec().unwrap();
        let single: Vec<f32> = model.forward(plain).into_data().to_vec().unwrap();

        for (a, b) in ensembled.iter().zip(single.iter()) {
            assert!((a - b).abs() < 1e-5, "{a} vs {b}");
        }
    }
}
