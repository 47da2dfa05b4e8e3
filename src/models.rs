//! The recognized model and loss forms.
//!
//! These are the concrete [`Model`] / [`Loss`] implementations the
//! configuration surface exposes; the trainer itself never depends on
//! them, only on the traits.

use crate::error::TrainError;
use crate::ops::{elementwise_abs_diff, elementwise_square, elementwise_sub, matmul, mean};
use crate::tensors::{Ten64, Tensor};
use crate::train::{Loss, Model};

/// Three-parameter polynomial `y = p0 * t^2 + p1 * t + p2` over a 1-D
/// tensor of `t` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadratic;

impl Model for Quadratic {
    fn predict(&self, params: &Ten64, inputs: &Ten64) -> Result<Ten64, TrainError> {
        let [a, b, c] = params.data[..] else {
            return Err(TrainError::Predict(format!(
                "quadratic model takes 3 parameters, got {}",
                params.len()
            )));
        };
        let data = inputs.data.iter().map(|t| a * t * t + b * t + c).collect();
        Ok(Tensor::new(inputs.shape.clone(), data))
    }
}

/// Per-pixel weighted sum with a bias: one weight per pixel plus a final
/// bias parameter, applied to a batch of flattened images.
///
/// `inputs` is `(samples, pixels)`, `params` is `pixels + 1` long; the
/// output is one score per sample. The weighted sum goes through the naive
/// [`matmul`], so a `(samples, pixels)` batch costs exactly
/// `samples * pixels` multiply-adds per prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelLinear;

impl Model for PixelLinear {
    fn predict(&self, params: &Ten64, inputs: &Ten64) -> Result<Ten64, TrainError> {
        let [samples, pixels] = inputs.shape[..] else {
            return Err(TrainError::Predict(format!(
                "pixel-linear model expects (samples, pixels) inputs, got {:?}",
                inputs.shape
            )));
        };
        if params.len() != pixels + 1 {
            return Err(TrainError::Predict(format!(
                "pixel-linear model takes {} parameters for {pixels} pixels, got {}",
                pixels + 1,
                params.len()
            )));
        }
        let weights = Tensor::new(vec![pixels, 1], params.data[..pixels].to_vec());
        let bias = params.data[pixels];
        let scores = matmul(inputs, &weights)?;
        let data = scores.data.iter().map(|s| s + bias).collect();
        Ok(Tensor::new(vec![samples], data))
    }
}

/// Mean squared error: `mean((outputs - targets)^2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MseLoss;

impl Loss for MseLoss {
    fn loss(&self, outputs: &Ten64, targets: &Ten64) -> Result<f64, TrainError> {
        let diff = elementwise_sub(outputs, targets)?;
        Ok(mean(&elementwise_square(&diff))?)
    }
}

/// Mean absolute error: `mean(|outputs - targets|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaeLoss;

impl Loss for MaeLoss {
    fn loss(&self, outputs: &Ten64, targets: &Ten64) -> Result<f64, TrainError> {
        Ok(mean(&elementwise_abs_diff(outputs, targets)?)?)
    }
}

/// Selects the prediction shape for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelForm {
    #[default]
    Quadratic,
    LinearPerPixel,
}

impl Model for ModelForm {
    fn predict(&self, params: &Ten64, inputs: &Ten64) -> Result<Ten64, TrainError> {
        match self {
            Self::Quadratic => Quadratic.predict(params, inputs),
            Self::LinearPerPixel => PixelLinear.predict(params, inputs),
        }
    }
}

/// Selects the loss for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LossForm {
    #[default]
    Mse,
    Mae,
}

impl Loss for LossForm {
    fn loss(&self, outputs: &Ten64, targets: &Ten64) -> Result<f64, TrainError> {
        match self {
            Self::Mse => MseLoss.loss(outputs, targets),
            Self::Mae => MaeLoss.loss(outputs, targets),
        }
    }
}
