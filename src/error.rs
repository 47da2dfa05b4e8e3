//! Error taxonomy for tensor operations and training runs.
//!
//! Every fallible operation in the crate reports one of these errors
//! synchronously at the offending call; nothing is retried or silently
//! broadcast-corrected. A shape problem in an elementwise op is a
//! [`TensorError::ShapeMismatch`], a bad matmul inner dimension is a
//! [`TensorError::DimensionMismatch`], and a reduction over zero elements is
//! a [`TensorError::EmptyInput`].
//!
//! The divergence diagnostic of the trainer is deliberately *not* an error:
//! a loss that keeps rising is reported through `log::warn!` and the run
//! continues (see [`crate::train`]).

use thiserror::Error;

/// Errors raised by tensor construction, elementwise ops, reductions, and
/// matrix multiplication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Operand shapes are incompatible for an elementwise operation.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// Matmul inner dimensions differ (`lhs` is `m x k`, `rhs` is `rows x n`).
    #[error("matmul dimension mismatch: lhs is {m}x{k} but rhs has {rows} rows")]
    DimensionMismatch { m: usize, k: usize, rows: usize },

    /// A reduction was asked to average zero elements.
    #[error("empty input: cannot reduce over zero elements (axis {axis:?})")]
    EmptyInput { axis: Option<usize> },

    /// A reduction named an axis the tensor does not have.
    #[error("axis {axis} out of bounds for tensor of rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    /// A per-sample operation was given a tensor that is not a
    /// `(rows, cols, samples)` stack.
    #[error("expected a (rows, cols, samples) stack, got shape {shape:?}")]
    NotAStack { shape: Vec<usize> },

    /// A sample index past the end of the stack.
    #[error("sample {idx} out of bounds for stack of {samples} samples")]
    SampleOutOfBounds { idx: usize, samples: usize },

    /// A matrix operation was given a tensor that is not 2-D.
    #[error("expected a 2-D matrix, got shape {shape:?}")]
    NotAMatrix { shape: Vec<usize> },
}

/// Errors surfaced by a training run.
///
/// Caller-supplied `predict` and `loss` failures are propagated as-is; the
/// trainer never catches and suppresses them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    /// A tensor operation inside the step failed.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// The caller-supplied prediction function failed.
    #[error("predict failed: {0}")]
    Predict(String),

    /// The caller-supplied loss function failed.
    #[error("loss failed: {0}")]
    Loss(String),

    /// The gradient capability produced a vector of the wrong length.
    #[error("gradient length {got} does not match {expected} parameters")]
    GradientLength { expected: usize, got: usize },
}

/// A training run that aborted mid-way.
///
/// Reports the last successfully completed state: `epoch` is the index of
/// the epoch that failed, and the trainer it came from still holds the
/// parameter vector from the last successful step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("training aborted at epoch {epoch}: {source}")]
pub struct TrainFailure {
    pub epoch: usize,
    #[source]
    pub source: TrainError,
}
