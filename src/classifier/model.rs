use super::PreparedImage;
use crate::{Error, Result};
use candle_core::{D, DType, Device, Module, Tensor};
use candle_nn::{Conv2d, Linear, VarBuilder};
use std::path::Path;
use tracing::info;

/// Anything that can turn a prepared image into per-class probabilities.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Side length, in pixels, the classifier expects its input to have.
    fn input_size(&self) -> u32;

    fn predict(&self, image: &PreparedImage) -> Result<Vec<f32>>;
}

const CONV_FILTERS: [usize; 3] = [32, 64, 128];
const DENSE_UNITS: usize = 128;

/// Three conv/pool blocks followed by two dense layers, softmax on top.
///
/// Tensor names in the weights file: `conv{1,2,3}.{weight,bias}` and
/// `fc{1,2}.{weight,bias}`. Conv kernels are OIHW and the flatten before
/// `fc1` runs over channel-major (CHW) features.
struct SkinNet {
    convs: Vec<Conv2d>,
    fc1: Linear,
    fc2: Linear,
}

impl SkinNet {
    fn new(vb: VarBuilder, image_size: usize, num_classes: usize) -> Result<Self> {
        let mut convs = Vec::with_capacity(CONV_FILTERS.len());
        let mut in_channels = 3;
        for (i, &filters) in CONV_FILTERS.iter().enumerate() {
            convs.push(candle_nn::conv2d(
                in_channels,
                filters,
                3,
                Default::default(),
                vb.pp(format!("conv{}", i + 1)),
            )?);
            in_channels = filters;
        }

        let side = feature_side(image_size)?;
        let fc1 = candle_nn::linear(in_channels * side * side, DENSE_UNITS, vb.pp("fc1"))?;
        let fc2 = candle_nn::linear(DENSE_UNITS, num_classes, vb.pp("fc2"))?;

        Ok(Self { convs, fc1, fc2 })
    }
}

impl Module for SkinNet {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        // NHWC in, NCHW for the convolutions.
        let mut xs = xs.permute((0, 3, 1, 2))?.contiguous()?;
        for conv in &self.convs {
            xs = conv.forward(&xs)?.relu()?.max_pool2d(2)?;
        }
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        let logits = self.fc2.forward(&xs)?;
        candle_nn::ops::softmax(&logits, D::Minus1)
    }
}

/// Spatial size left after the conv/pool stack (valid 3x3 conv, 2x2 pool).
fn feature_side(image_size: usize) -> Result<usize> {
    let mut side = image_size;
    for _ in CONV_FILTERS {
        if side < 4 {
            return Err(Error::classifier(format!(
                "Image size {image_size} is too small for the network"
            )));
        }
        side = (side - 2) / 2;
    }
    Ok(side)
}

pub struct CandleClassifier {
    net: SkinNet,
    device: Device,
    image_size: u32,
}

impl CandleClassifier {
    /// Loads the weights once; the instance is then shared by every request.
    pub fn load(path: impl AsRef<Path>, image_size: u32, num_classes: usize) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)?;
        info!(
            "Loaded {} tensors from classifier weights {}",
            tensors.len(),
            path.display()
        );
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        Self::from_var_builder(vb, image_size, num_classes)
    }

    pub fn from_var_builder(vb: VarBuilder, image_size: u32, num_classes: usize) -> Result<Self> {
        let device = vb.device().clone();
        let net = SkinNet::new(vb, image_size as usize, num_classes)?;
        Ok(Self {
            net,
            device,
            image_size,
        })
    }
}

impl Classifier for CandleClassifier {
    fn input_size(&self) -> u32 {
        self.image_size
    }

    fn predict(&self, image: &PreparedImage) -> Result<Vec<f32>> {
        if image.size != self.image_size {
            return Err(Error::classifier(format!(
                "Expected a {0}x{0} image, got {1}x{1}",
                self.image_size, image.size
            )));
        }

        let side = image.size as usize;
        let input = Tensor::from_vec(image.pixels.clone(), (1, side, side, 3), &self.device)?;
        let probabilities = self.net.forward(&input)?.squeeze(0)?.to_vec1::<f32>()?;
        Ok(probabilities)
    }
}
