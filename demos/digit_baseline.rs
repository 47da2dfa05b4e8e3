//! Two-class pixel baseline on synthetic digits.
//!
//! Builds two classes of noisy 8x8 "digit" images (one bright on the left
//! half, one on the right), scores the nearest-class-mean baseline on a
//! held-out split, then trains a per-pixel linear model on the same data
//! and compares.

use pixelgrad::baseline::{Class, accuracy, classify_stack, compute_class_mean};
use pixelgrad::models::{MseLoss, PixelLinear};
use pixelgrad::tensors::{Ten64, Tensor};
use pixelgrad::train::{FiniteDifference, SgdTrainer, TrainConfig};

const ROWS: usize = 8;
const COLS: usize = 8;

/// A (ROWS, COLS, samples) stack of noisy images bright on one half.
fn synthetic_stack(samples: usize, bright_left: bool) -> Ten64 {
    let mut data = vec![0.0; ROWS * COLS * samples];
    for r in 0..ROWS {
        for c in 0..COLS {
            let bright = (c < COLS / 2) == bright_left;
            for i in 0..samples {
                let base = if bright { 0.8 } else { 0.1 };
                let noise = rand::random::<f64>() * 0.2 - 0.1;
                data[(r * COLS + c) * samples + i] = (base + noise).clamp(0.0, 1.0);
            }
        }
    }
    Tensor::new(vec![ROWS, COLS, samples], data)
}

/// Flattens a stack into the (samples, pixels) batch the linear model eats.
fn flatten(stack: &Ten64) -> Ten64 {
    let samples = stack.shape[2];
    let pixels = ROWS * COLS;
    let mut data = Vec::with_capacity(samples * pixels);
    for i in 0..samples {
        let image = stack.sample(i).expect("stack is 3-D");
        data.extend(image.data);
    }
    Tensor::new(vec![samples, pixels], data)
}

fn main() {
    env_logger::init();

    let train_a = synthetic_stack(30, true);
    let train_b = synthetic_stack(30, false);
    let valid_a = synthetic_stack(10, true);
    let valid_b = synthetic_stack(10, false);

    // Nearest-class-mean baseline.
    let mean_a = compute_class_mean(&train_a).expect("class A training set is non-empty");
    let mean_b = compute_class_mean(&train_b).expect("class B training set is non-empty");
    let preds_a = classify_stack(&valid_a, &mean_a, &mean_b).expect("validation stack is 3-D");
    let preds_b = classify_stack(&valid_b, &mean_a, &mean_b).expect("validation stack is 3-D");
    println!(
        "baseline accuracy: class A {:.2}, class B {:.2}",
        accuracy(&preds_a, Class::A),
        accuracy(&preds_b, Class::B)
    );

    // Per-pixel linear model: class A scores toward 1.0, class B toward 0.0.
    let mut inputs = flatten(&train_a);
    let flat_b = flatten(&train_b);
    let n_a = inputs.shape[0];
    let n_b = flat_b.shape[0];
    inputs = Tensor::new(
        vec![n_a + n_b, ROWS * COLS],
        inputs.data.into_iter().chain(flat_b.data).collect(),
    );
    let targets = Tensor::new(
        vec![n_a + n_b],
        (0..n_a + n_b).map(|i| if i < n_a { 1.0 } else { 0.0 }).collect(),
    );

    let init: Vec<f64> = (0..ROWS * COLS + 1)
        .map(|_| rand::random::<f64>() * 0.02 - 0.01)
        .collect();
    let mut trainer = SgdTrainer::new(
        Tensor::new(vec![ROWS * COLS + 1], init),
        TrainConfig {
            learning_rate: 0.05,
            epochs: 40,
        },
    );
    let report = trainer
        .fit(
            &PixelLinear,
            &MseLoss,
            &FiniteDifference::default(),
            &inputs,
            &targets,
        )
        .expect("training failed");

    println!(
        "linear model mse: {:.4} -> {:.4} over {} epochs",
        report.initial_loss().unwrap_or(f64::NAN),
        report.final_loss().unwrap_or(f64::NAN),
        report.epoch_losses.len()
    );
}
