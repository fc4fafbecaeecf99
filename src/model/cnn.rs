//! Small convolutional baseline for 40x40 grayscale crops.
//!
//! Three conv blocks with max-pooling, global average pooling and a
//! two-layer classifier head. Useful as a fast sanity-check model next
//! to the residual network.

use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::NUM_CLASSES;

/// A conv block: Conv2d, BatchNorm, ReLU, and optional MaxPool
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
    relu: Relu,
    pool: Option<MaxPool2d>,
}

impl<B: Backend> ConvBlock<B> {
    fn new(in_channels: usize, out_channels: usize, with_pool: bool, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);
        let pool = if with_pool {
            Some(MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init())
        } else {
            None
        };

        Self {
            conv,
            bn,
            relu: Relu::new(),
            pool,
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.relu.forward(self.bn.forward(self.conv.forward(x)));
        match &self.pool {
            Some(pool) => pool.forward(x),
            None => x,
        }
    }
}

/// Baseline CNN configuration
#[derive(Config, Debug)]
pub struct EmotionCnnConfig {
    /// Number of output classes
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,
    /// Number of input channels (1 for grayscale)
    #[config(default = 1)]
    pub in_channels: usize,
    /// Base number of convolutional filters
    #[config(default = 32)]
    pub base_filters: usize,
    /// Dropout rate in the classifier head
    #[config(default = 0.3)]
    pub dropout_rate: f64,
}

impl EmotionCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionCnn<B> {
        let base = self.base_filters;

        EmotionCnn {
            conv1: ConvBlock::new(self.in_channels, base, true, device), // 40 -> 20
            conv2: ConvBlock::new(base, base * 2, true, device),         // 20 -> 10
            conv3: ConvBlock::new(base * 2, base * 4, false, device),
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc: LinearConfig::new(base * 4, 128).init(device),
            dropout: DropoutConfig::new(self.dropout_rate).init(),
            classifier: LinearConfig::new(128, self.num_classes).init(device),
            relu: Relu::new(),
        }
    }
}

/// Convolutional classifier producing logits over the emotion classes
#[derive(Module, Debug)]
pub struct EmotionCnn<B: Backend> {
    conv1: ConvBlock<B>,
    conv2: ConvBlock<B>,
    conv3: ConvBlock<B>,
    global_pool: AdaptiveAvgPool2d,
    fc: Linear<B>,
    dropout: Dropout,
    classifier: Linear<B>,
    relu: Relu,
}

impl<B: Backend> EmotionCnn<B> {
    /// `[n, 1, h, w]` -> logits `[n, num_classes]`
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.conv2.forward(x);
        let x = self.conv3.forward(x);

        let x = self.global_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.relu.forward(self.fc.forward(x));
        let x = self.dropout.forward(x);
        self.classifier.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_cnn_output_shape() {
        let device = Default::default();
        let model = EmotionCnnConfig::new().init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::zeros([3, 1, 40, 40], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [3, NUM_CLASSES]);
    }

    #[test]
    fn test_cnn_custom_classes() {
        let device = Default::default();
        let model = EmotionCnnConfig::new()
            .with_num_classes(7)
            .init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::zeros([1, 1, 40, 40], &device);
        assert_eq!(model.forward(input).dims(), [1, 7]);
    }
}
