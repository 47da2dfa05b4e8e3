//! Elementwise operations, reductions, and the naive matrix multiply.
//!
//! Everything here is a pure function over [`Ten64`] values; the one
//! exception is [`sgd`], which mutates a parameter tensor in place.
//!
//! ## Determinism
//!
//! `matmul` distributes output rows across threads with `rayon`, but each
//! row's accumulation runs in the documented scalar order (columns middle,
//! shared dimension innermost), so rounding is reproducible per row for a
//! fixed input. Whole-tensor reductions are serial and accumulate in
//! row-major order.

use rayon::prelude::*;

use crate::error::TensorError;
use crate::tensors::{Ten64, Tensor, WithGrad};

fn check_same_shape(a: &Ten64, b: &Ten64) -> Result<(), TensorError> {
    if a.shape != b.shape {
        return Err(TensorError::ShapeMismatch {
            left: a.shape.clone(),
            right: b.shape.clone(),
        });
    }
    Ok(())
}

/// Elementwise `a - b` for two same-shape tensors.
pub fn elementwise_sub(a: &Ten64, b: &Ten64) -> Result<Ten64, TensorError> {
    check_same_shape(a, b)?;
    let data = a.data.iter().zip(&b.data).map(|(x, y)| x - y).collect();
    Ok(Tensor::new(a.shape.clone(), data))
}

/// Elementwise `|a - b|` for two same-shape tensors.
pub fn elementwise_abs_diff(a: &Ten64, b: &Ten64) -> Result<Ten64, TensorError> {
    check_same_shape(a, b)?;
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| (x - y).abs())
        .collect();
    Ok(Tensor::new(a.shape.clone(), data))
}

/// Elementwise `a^2`.
pub fn elementwise_square(a: &Ten64) -> Ten64 {
    let data = a.data.iter().map(|x| x * x).collect();
    Tensor::new(a.shape.clone(), data)
}

/// Mean over all elements of `a`.
pub fn mean(a: &Ten64) -> Result<f64, TensorError> {
    if a.is_empty() {
        return Err(TensorError::EmptyInput { axis: None });
    }
    Ok(a.data.iter().sum::<f64>() / a.len() as f64)
}

/// Averages over the given axes, which are removed from the result shape.
///
/// Reducing axis 2 of a `(rows, cols, samples)` stack yields a
/// `(rows, cols)` tensor; reducing every axis yields a rank-0 scalar
/// tensor. Duplicate axes in `axes` are harmless.
pub fn mean_over_axes(a: &Ten64, axes: &[usize]) -> Result<Ten64, TensorError> {
    let rank = a.shape.len();
    let mut reduce = vec![false; rank];
    for &axis in axes {
        if axis >= rank {
            return Err(TensorError::AxisOutOfBounds { axis, rank });
        }
        reduce[axis] = true;
    }

    let mut count = 1usize;
    for (axis, dim) in a.shape.iter().enumerate() {
        if reduce[axis] {
            if *dim == 0 {
                return Err(TensorError::EmptyInput { axis: Some(axis) });
            }
            count *= dim;
        }
    }

    let out_shape: Vec<usize> = a
        .shape
        .iter()
        .zip(&reduce)
        .filter(|&(_, &r)| !r)
        .map(|(&d, _)| d)
        .collect();
    let out_len: usize = out_shape.iter().product();

    // Row-major strides over the surviving axes only.
    let mut out_strides = vec![0usize; rank];
    let mut stride = 1;
    for axis in (0..rank).rev() {
        if !reduce[axis] {
            out_strides[axis] = stride;
            stride *= a.shape[axis];
        }
    }

    let mut sums = vec![0.0f64; out_len];
    let mut index = vec![0usize; rank];
    for &v in &a.data {
        let flat: usize = index.iter().zip(&out_strides).map(|(i, s)| i * s).sum();
        sums[flat] += v;
        for axis in (0..rank).rev() {
            index[axis] += 1;
            if index[axis] < a.shape[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    for s in &mut sums {
        *s /= count as f64;
    }
    Ok(Tensor::new(out_shape, sums))
}

/// Mean absolute distance `mean(|a - b|)` between two same-shape tensors.
///
/// Returns a single scalar; zero exactly when `a == b` elementwise. For
/// per-sample distances over a stack, slice the sample axis first (see
/// [`crate::baseline::classify_stack`]).
pub fn mean_absolute_distance(a: &Ten64, b: &Ten64) -> Result<f64, TensorError> {
    mean(&elementwise_abs_diff(a, b)?)
}

/// Root mean squared distance `sqrt(mean((a - b)^2))` between two
/// same-shape tensors.
///
/// Like [`mean_absolute_distance`] this is zero exactly when `a == b`
/// elementwise; neither distance bounds the other in general.
pub fn root_mean_squared_distance(a: &Ten64, b: &Ten64) -> Result<f64, TensorError> {
    Ok(mean(&elementwise_square(&elementwise_sub(a, b)?))?.sqrt())
}

/// Multiplies two 2-D tensors: `a` (m×k) · `b` (k×n), returning m×n.
///
/// The kernel is the deliberately naive triple loop: output rows outermost,
/// columns middle, the shared dimension innermost, accumulating into a
/// zeroed buffer. No blocking, no SIMD; the cost is exactly
/// [`matmul_multiply_adds`]`(m, k, n)` scalar multiply-adds. Rows are
/// distributed with `rayon`, which leaves each row's accumulation order
/// untouched.
pub fn matmul(a: &Ten64, b: &Ten64) -> Result<Ten64, TensorError> {
    let [m, k] = a.shape[..] else {
        return Err(TensorError::NotAMatrix {
            shape: a.shape.clone(),
        });
    };
    let [rows, n] = b.shape[..] else {
        return Err(TensorError::NotAMatrix {
            shape: b.shape.clone(),
        });
    };
    if k != rows {
        return Err(TensorError::DimensionMismatch { m, k, rows });
    }
    if m == 0 || n == 0 {
        return Ok(Tensor::new(vec![m, n], Vec::new()));
    }

    let a_data = &a.data;
    let b_data = &b.data;
    let mut out = vec![0.0f64; m * n];
    out.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        for j in 0..n {
            let mut sum = 0.0;
            for l in 0..k {
                sum += a_data[i * k + l] * b_data[l * n + j];
            }
            row[j] = sum;
        }
    });

    Ok(Tensor::new(vec![m, n], out))
}

/// Scalar multiply-add count of the naive kernel for an (m×k)·(k×n)
/// product.
pub const fn matmul_multiply_adds(m: usize, k: usize, n: usize) -> usize {
    m * k * n
}

/// Performs one in-place stochastic gradient descent step:
/// `param -= lr * grad` for every element, then zeroes the gradient.
///
/// The zeroing is what keeps gradients from one step from leaking into the
/// next; the trainer relies on it. The exclusive borrow means no caller can
/// observe the parameter vector mid-update.
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    for (param, grad) in w.value.data.iter_mut().zip(&w.grad.data) {
        *param -= lr * *grad;
    }
    for grad in &mut w.grad.data {
        *grad = 0.0;
    }
}
