//! Residual network for 40x40 grayscale crops.
//!
//! A ResNet-18 layout (two basic blocks per stage, 64/128/256/512
//! filters) with a 3x3 stem and no initial max-pool, which suits the
//! small input resolution better than the ImageNet stem.

use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::NUM_CLASSES;

/// Basic residual block: two 3x3 convolutions with an identity or
/// projection shortcut.
#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    downsample: Option<Downsample<B>>,
    relu: Relu,
}

/// 1x1 projection used when a block changes resolution or width
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> BasicBlock<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);

        let downsample = if stride != 1 || in_channels != out_channels {
            Some(Downsample {
                conv: Conv2dConfig::new([in_channels, out_channels], [1, 1])
                    .with_stride([stride, stride])
                    .with_bias(false)
                    .init(device),
                bn: BatchNormConfig::new(out_channels).init(device),
            })
        } else {
            None
        };

        Self {
            conv1,
            bn1: BatchNormConfig::new(out_channels).init(device),
            conv2,
            bn2: BatchNormConfig::new(out_channels).init(device),
            downsample,
            relu: Relu::new(),
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let shortcut = match &self.downsample {
            Some(down) => down.bn.forward(down.conv.forward(x.clone())),
            None => x.clone(),
        };

        let out = self.relu.forward(self.bn1.forward(self.conv1.forward(x)));
        let out = self.bn2.forward(self.conv2.forward(out));

        self.relu.forward(out + shortcut)
    }
}

/// ResNet-18 configuration
#[derive(Config, Debug)]
pub struct EmotionResNetConfig {
    /// Number of output classes
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,
    /// Input channels (1 for grayscale)
    #[config(default = 1)]
    pub in_channels: usize,
}

impl EmotionResNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionResNet<B> {
        let stem = Conv2dConfig::new([self.in_channels, 64], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);

        let make_stage = |in_ch, out_ch, stride| {
            vec![
                BasicBlock::new(in_ch, out_ch, stride, device),
                BasicBlock::new(out_ch, out_ch, 1, device),
            ]
        };

        EmotionResNet {
            stem,
            stem_bn: BatchNormConfig::new(64).init(device),
            layer1: make_stage(64, 64, 1),
            layer2: make_stage(64, 128, 2),
            layer3: make_stage(128, 256, 2),
            layer4: make_stage(256, 512, 2),
            pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc: LinearConfig::new(512, self.num_classes).init(device),
            relu: Relu::new(),
        }
    }
}

/// Residual classifier producing logits over the emotion classes
#[derive(Module, Debug)]
pub struct EmotionResNet<B: Backend> {
    stem: Conv2d<B>,
    stem_bn: BatchNorm<B, 2>,
    layer1: Vec<BasicBlock<B>>,
    layer2: Vec<BasicBlock<B>>,
    layer3: Vec<BasicBlock<B>>,
    layer4: Vec<BasicBlock<B>>,
    pool: AdaptiveAvgPool2d,
    fc: Linear<B>,
    relu: Relu,
}

impl<B: Backend> EmotionResNet<B> {
    /// `[n, 1, h, w]` -> logits `[n, num_classes]`
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut out = self
            .relu
            .forward(self.stem_bn.forward(self.stem.forward(x)));

        for block in self
            .layer1
            .iter()
            .chain(&self.layer2)
            .chain(&self.layer3)
            .chain(&self.layer4)
        {
            out = block.forward(out);
        }

        let out = self.pool.forward(out);
        let [batch, channels, _, _] = out.dims();
        self.fc.forward(out.reshape([batch, channels]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_resnet_output_shape() {
        let device = Default::default();
        let model = EmotionResNetConfig::new().init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 1, 40, 40], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, NUM_CLASSES]);
    }

    #[test]
    fn test_resnet_single_image() {
        let device = Default::default();
        let model = EmotionResNetConfig::new().init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::ones([1, 1, 40, 40], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, NUM_CLASSES]);
        let values = output.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
