//! Pixel-similarity baseline classifier.
//!
//! The simplest two-class digit classifier: compute the elementwise mean
//! image of each class from its training samples, then label an unseen
//! image with whichever class mean it is closer to in mean absolute
//! distance. No trained state; everything is a pure function of the two
//! class means and the samples.

use crate::error::TensorError;
use crate::ops::{mean_absolute_distance, mean_over_axes};
use crate::tensors::Ten64;

/// The two class labels of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    A,
    B,
}

/// Elementwise mean over the sample axis of a `(rows, cols, samples)`
/// stack, yielding the `(rows, cols)` class mean image.
///
/// Fails with [`TensorError::EmptyInput`] on a zero-sample stack.
pub fn compute_class_mean(samples: &Ten64) -> Result<Ten64, TensorError> {
    if samples.shape.len() != 3 {
        return Err(TensorError::NotAStack {
            shape: samples.shape.clone(),
        });
    }
    mean_over_axes(samples, &[2])
}

/// Labels `image` with whichever class mean it is nearer to.
///
/// Returns [`Class::A`] when
/// `mad(image, mean_a) < mad(image, mean_b)`, else [`Class::B`]. The
/// comparison is strict, so an exact tie classifies as `Class::B`; this
/// tie-break is observable and deliberately preserved.
pub fn classify(image: &Ten64, mean_a: &Ten64, mean_b: &Ten64) -> Result<Class, TensorError> {
    let dist_a = mean_absolute_distance(image, mean_a)?;
    let dist_b = mean_absolute_distance(image, mean_b)?;
    Ok(if dist_a < dist_b { Class::A } else { Class::B })
}

/// Classifies every sample of a `(rows, cols, samples)` stack, one label
/// per sample.
pub fn classify_stack(
    stack: &Ten64,
    mean_a: &Ten64,
    mean_b: &Ten64,
) -> Result<Vec<Class>, TensorError> {
    let [_, _, samples] = stack.shape[..] else {
        return Err(TensorError::NotAStack {
            shape: stack.shape.clone(),
        });
    };
    let mut labels = Vec::with_capacity(samples);
    for idx in 0..samples {
        let image = stack.sample(idx)?;
        labels.push(classify(&image, mean_a, mean_b)?);
    }
    Ok(labels)
}

/// Fraction of `predictions` equal to `expected`.
///
/// An empty prediction list has accuracy 0.0. For the other class the
/// expected accuracy is one minus the fraction predicted as this one.
pub fn accuracy(predictions: &[Class], expected: Class) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let hits = predictions.iter().filter(|&&p| p == expected).count();
    hits as f64 / predictions.len() as f64
}
