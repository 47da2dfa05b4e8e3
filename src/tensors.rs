//! Core tensor data structures.
//!
//! This module defines the containers the rest of the crate computes with:
//!
//! - `Tensor<T>`: an N-dimensional array with a runtime shape and flat
//!   row-major data
//! - `WithGrad<T>`: a value paired with its gradient, used by the trainer's
//!   parameter vector
//! - the `tensor!` macro for building tensors from nested literals
//!
//! ## Layout conventions
//!
//! - Data is row-major only; the last axis varies fastest.
//! - Image stacks are shaped `(rows, cols, samples)` with the sample axis
//!   last, matching the layout the data-loading collaborator supplies.
//! - Shapes are `Vec<usize>` and enforced at runtime; there is no
//!   broadcasting or shape inference.
//!
//! ## Example
//!
//! ```rust
//! use pixelgrad::tensors::Tensor;
//! let t = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! assert_eq!(t.shape, vec![2, 3]);
//! ```

use crate::error::TensorError;

/// Convenience alias for the `f64` tensors used throughout the crate.
pub type Ten64 = Tensor<f64>;

/// Represents an N-dimensional tensor with a shape and flat row-major data.
///
/// - All elements must be the same type (`T`).
/// - `shape` defines the structure, e.g., `[2, 3]` for a 2×3 matrix.
/// - `data` holds the flattened content in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T> Tensor<T> {
    /// Creates a new tensor with the given shape and flat data.
    ///
    /// # Panics
    /// Panics if the number of elements in `data` does not match the shape product.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Self {
        let shape = shape.into();
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "shape {:?} is incompatible with {} data elements",
            shape,
            data.len()
        );
        Self { shape, data }
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces this tensor's data with another tensor of the same shape.
    ///
    /// The swap commits the full vector at once, so a caller never observes
    /// a partially replaced tensor.
    ///
    /// # Panics
    /// Panics if shapes do not match.
    pub fn update(&mut self, mut other: Tensor<T>) {
        assert_eq!(self.shape, other.shape, "shape mismatch");
        std::mem::swap(&mut self.data, &mut other.data);
    }
}

impl Tensor<f64> {
    /// Creates a zero-filled tensor of the given shape.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Self {
        let shape = shape.into();
        let len: usize = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    /// Creates a zero-filled tensor shaped like `self`.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape.clone())
    }

    /// Extracts sample `idx` from a 3-D image stack shaped
    /// `(rows, cols, samples)`, returning a `(rows, cols)` tensor.
    ///
    /// The sample axis is last, so element `(r, c)` of sample `idx` lives at
    /// flat offset `(r * cols + c) * samples + idx`.
    pub fn sample(&self, idx: usize) -> Result<Ten64, TensorError> {
        let [rows, cols, samples] = self.shape[..] else {
            return Err(TensorError::NotAStack {
                shape: self.shape.clone(),
            });
        };
        if idx >= samples {
            return Err(TensorError::SampleOutOfBounds { idx, samples });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(self.data[(r * cols + c) * samples + idx]);
            }
        }
        Ok(Tensor::new(vec![rows, cols], data))
    }
}

/// A container pairing a value with its gradient.
///
/// The trainer keeps its parameter vector as a `WithGrad<Ten64>`; the
/// gradient slot is overwritten each step and zeroed by the update, never
/// accumulated across steps.
#[derive(Debug, Clone)]
pub struct WithGrad<T> {
    pub value: T,
    pub grad: T,
}

impl WithGrad<Ten64> {
    /// Wraps a tensor with a zero-initialized gradient of the same shape.
    pub fn new(value: Ten64) -> Self {
        let grad = value.zeros_like();
        Self { value, grad }
    }
}

/// Defines a tensor from nested literal arrays.
///
/// Supports arbitrary dimensionality as long as sublists are uniform in shape.
///
/// # Example
/// ```
/// use pixelgrad::tensor;
/// let t = tensor!([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(t.shape, vec![2, 2]);
/// ```
#[macro_export]
macro_rules! tensor {
    ($lit:literal) => {
        $crate::tensors::Tensor::new(Vec::<usize>::new(), vec![$lit])
    };

    ([ $( $inner:tt ),+ $(,)? ]) => {{
        let children = vec![ $( tensor!($inner) ),+ ];
        let first_shape = &children[0].shape;
        assert!(children.iter().all(|c| c.shape == *first_shape),
            "ragged tensor literal (rows have mismatched shapes)");
        let mut shape = vec![children.len()];
        shape.extend_from_slice(first_shape);
        let mut data = Vec::with_capacity(children.len() * children[0].data.len());
        for c in children { data.extend(c.data); }
        $crate::tensors::Tensor::new(shape, data)
    }};

    ([ $( $x:expr ),+ $(,)? ]) => {{
        let data = vec![ $( $x ),+ ];
        $crate::tensors::Tensor::new(vec![data.len()], data)
    }};
}
