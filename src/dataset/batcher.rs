//! Burn batcher for FER2013 evaluation batches.
//!
//! Converts a slice of [`FerItem`]s into device tensors. Depending on the
//! test-time augmentation setting the image tensor is either a plain
//! 4-D batch of center crops or a 5-D batch of ten-crop ensembles.

use burn::data::dataloader::batcher::Batcher;
use burn::prelude::*;

use super::crops::{center_crop, ten_crop};
use super::fer2013::FerItem;
use crate::{CROP_SIZE, IMAGE_SIZE, N_CROPS};

/// Image tensor of an evaluation batch
#[derive(Clone, Debug)]
pub enum FerImages<B: Backend> {
    /// Center crops, shape `[batch, 1, crop, crop]`
    Plain(Tensor<B, 4>),
    /// Ten-crop ensembles, shape `[batch, n_crops, 1, crop, crop]`
    Crops(Tensor<B, 5>),
}

/// A batch of FER2013 samples
#[derive(Clone, Debug)]
pub struct FerBatch<B: Backend> {
    pub images: FerImages<B>,
    /// Labels, shape `[batch]`
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> FerBatch<B> {
    /// Number of samples in the batch
    pub fn len(&self) -> usize {
        self.targets.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Batcher producing either plain or multi-crop evaluation batches
#[derive(Clone, Debug)]
pub struct FerBatcher {
    ncrop: bool,
}

impl FerBatcher {
    /// Create a batcher; `ncrop` enables the ten-crop ensemble
    pub fn new(ncrop: bool) -> Self {
        Self { ncrop }
    }

    /// Whether this batcher emits multi-crop batches
    pub fn is_ncrop(&self) -> bool {
        self.ncrop
    }
}

impl<B: Backend> Batcher<B, FerItem, FerBatch<B>> for FerBatcher {
    fn batch(&self, items: Vec<FerItem>, device: &B::Device) -> FerBatch<B> {
        let batch_size = items.len();

        let images = if self.ncrop {
            let mut data = Vec::with_capacity(batch_size * N_CROPS * CROP_SIZE * CROP_SIZE);
            for item in &items {
                for crop in ten_crop(&item.pixels, IMAGE_SIZE, CROP_SIZE) {
                    data.extend_from_slice(&crop);
                }
            }
            let tensor = Tensor::<B, 5>::from_floats(
                TensorData::new(data, [batch_size, N_CROPS, 1, CROP_SIZE, CROP_SIZE]),
                device,
            );
            FerImages::Crops(tensor)
        } else {
            let mut data = Vec::with_capacity(batch_size * CROP_SIZE * CROP_SIZE);
            for item in &items {
                data.extend_from_slice(&center_crop(&item.pixels, IMAGE_SIZE, CROP_SIZE));
            }
            let tensor = Tensor::<B, 4>::from_floats(
                TensorData::new(data, [batch_size, 1, CROP_SIZE, CROP_SIZE]),
                device,
            );
            FerImages::Plain(tensor)
        };

        let targets_data: Vec<i64> = items.iter().map(|item| item.label as i64).collect();
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets_data, [batch_size]),
            device,
        );

        FerBatch { images, targets }
    }
}
