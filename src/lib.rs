//! pixelgrad: the numerical core of a two-class digit classifier tutorial.
//!
//! Provides the minimal machine-learning primitives needed to turn
//! normalized image arrays into a trained linear/quadratic model:
//! tensor arithmetic, a deliberately naive matrix multiply, a
//! nearest-class-mean baseline classifier, and a stochastic gradient
//! descent trainer generic over the prediction function, the loss, and the
//! differentiation technique.
//!
//! # Modules
//!
//! - [`tensors`] — Tensor containers, the `tensor!` macro, and `WithGrad`.
//! - [`ops`] — Elementwise ops, reductions, naive matmul, and the SGD step.
//! - [`baseline`] — Pixel-similarity nearest-mean classifier.
//! - [`train`] — The generic SGD trainer and its capability traits.
//! - [`models`] — The recognized model and loss forms.
//! - [`error`] — Error taxonomy.
//!
//! # What this crate is not
//!
//! There is no autodiff engine (differentiation is an injected
//! capability — see [`train::Gradient`]), no GPU or SIMD kernels, and no
//! multi-class or deep architectures. Dataset loading and visualization
//! live with an external collaborator that supplies normalized `[0, 1]`
//! arrays shaped `(rows, cols, samples)`.
//!
//! # Example
//!
//! ```rust
//! use pixelgrad::tensor;
//! use pixelgrad::models::{MseLoss, Quadratic};
//! use pixelgrad::train::{FiniteDifference, SgdTrainer, TrainConfig};
//!
//! let t = tensor!([0.0, 1.0, 2.0, 3.0]);
//! let y = tensor!([1.0, 0.0, 3.0, 10.0]); // 2t^2 - 3t + 1
//! let mut trainer = SgdTrainer::new(
//!     tensor!([0.0, 0.0, 0.0]),
//!     TrainConfig { learning_rate: 1e-3, epochs: 100 },
//! );
//! let report = trainer
//!     .fit(&Quadratic, &MseLoss, &FiniteDifference::default(), &t, &y)
//!     .unwrap();
//! assert!(report.final_loss() < report.initial_loss());
//! ```

pub mod baseline;
pub mod error;
pub mod models;
pub mod ops;
pub mod tensors;
pub mod train;
