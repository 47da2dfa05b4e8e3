//! Generic stochastic-gradient-descent trainer.
//!
//! The trainer is written against three capability seams rather than any
//! concrete model:
//!
//! - [`Model`]: maps a parameter vector and inputs to outputs. Linear,
//!   quadratic, per-pixel weighted sum — anything differentiable in the
//!   parameters.
//! - [`Loss`]: maps outputs and targets to a scalar.
//! - [`Gradient`]: the external differentiation capability. The trainer
//!   hands it the composed `loss(predict(params, inputs), targets)`
//!   objective and gets back one partial derivative per parameter. A
//!   closed-form derivative, the bundled [`FiniteDifference`]
//!   approximation, or a full autodiff library all satisfy it equally.
//!
//! Each epoch runs predict → evaluate → differentiate → step. The step is
//! [`crate::ops::sgd`]: `p -= lr * g` over the whole vector, then the
//! gradient is zeroed so nothing carries into the next step. A failing
//! `predict`, `loss`, or `gradient` aborts the run before the step, so the
//! parameters always hold the value of the last successful step.
//!
//! The trainer runs exactly [`TrainConfig::epochs`] steps; there is no
//! automatic early stopping. Choosing a budget (and a learning rate small
//! enough to descend) is the caller's responsibility.

use log::{debug, warn};

use crate::error::{TrainError, TrainFailure};
use crate::ops;
use crate::tensors::{Ten64, Tensor, WithGrad};

/// Consecutive loss increases before the divergence warning fires.
pub const DIVERGENCE_WINDOW: usize = 5;

/// A parametric prediction function.
pub trait Model {
    /// Computes model outputs for the given parameter vector and inputs.
    fn predict(&self, params: &Ten64, inputs: &Ten64) -> Result<Ten64, TrainError>;
}

impl<F> Model for F
where
    F: Fn(&Ten64, &Ten64) -> Result<Ten64, TrainError>,
{
    fn predict(&self, params: &Ten64, inputs: &Ten64) -> Result<Ten64, TrainError> {
        self(params, inputs)
    }
}

/// A scalar loss over model outputs and targets.
pub trait Loss {
    /// Computes the loss scalar; must be differentiable in `outputs`.
    fn loss(&self, outputs: &Ten64, targets: &Ten64) -> Result<f64, TrainError>;
}

impl<F> Loss for F
where
    F: Fn(&Ten64, &Ten64) -> Result<f64, TrainError>,
{
    fn loss(&self, outputs: &Ten64, targets: &Ten64) -> Result<f64, TrainError> {
        self(outputs, targets)
    }
}

/// The external differentiation capability.
///
/// Given the current parameter vector and the composed objective
/// `params -> loss(predict(params, inputs), targets)`, produces the
/// gradient at that point, one partial derivative per parameter.
pub trait Gradient {
    fn gradient(
        &self,
        params: &Ten64,
        objective: &mut dyn FnMut(&Ten64) -> Result<f64, TrainError>,
    ) -> Result<Ten64, TrainError>;
}

/// Central-difference numerical gradient:
/// `(f(p + eps) - f(p - eps)) / (2 * eps)` per coordinate.
///
/// Evaluates the objective twice per parameter, at the current point only;
/// nothing is retained between calls.
#[derive(Debug, Clone, Copy)]
pub struct FiniteDifference {
    pub epsilon: f64,
}

impl Default for FiniteDifference {
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl Gradient for FiniteDifference {
    fn gradient(
        &self,
        params: &Ten64,
        objective: &mut dyn FnMut(&Ten64) -> Result<f64, TrainError>,
    ) -> Result<Ten64, TrainError> {
        let mut probe = params.clone();
        let mut grad = Vec::with_capacity(params.len());
        for i in 0..params.len() {
            let original = probe.data[i];
            probe.data[i] = original + self.epsilon;
            let plus = objective(&probe)?;
            probe.data[i] = original - self.epsilon;
            let minus = objective(&probe)?;
            probe.data[i] = original;
            grad.push((plus - minus) / (2.0 * self.epsilon));
        }
        Ok(Tensor::new(params.shape.clone(), grad))
    }
}

/// Explicit configuration for one training run. Nothing here is ambient;
/// callers running concurrent trials pass independent configs and trainers.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Step scale for the parameter update.
    pub learning_rate: f64,
    /// Fixed iteration budget; the run performs exactly this many steps.
    pub epochs: usize,
}

/// Per-epoch loss history of a completed run.
///
/// The recorded loss for epoch `i` is evaluated at the parameters *before*
/// step `i`; the final parameters are read back from
/// [`SgdTrainer::params`].
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epoch_losses: Vec<f64>,
}

impl TrainReport {
    /// Loss at the first epoch, if any epoch ran.
    pub fn initial_loss(&self) -> Option<f64> {
        self.epoch_losses.first().copied()
    }

    /// Loss at the last epoch, if any epoch ran.
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// Owns a parameter vector and drives it through SGD steps.
///
/// The parameter vector has a fixed length for the lifetime of the trainer
/// and is exclusively owned; the `&mut self` step path makes a race between
/// two concurrent steps unrepresentable.
#[derive(Debug, Clone)]
pub struct SgdTrainer {
    params: WithGrad<Ten64>,
    config: TrainConfig,
}

impl SgdTrainer {
    /// Creates a trainer around an initial parameter vector.
    pub fn new(initial_params: Ten64, config: TrainConfig) -> Self {
        Self {
            params: WithGrad::new(initial_params),
            config,
        }
    }

    /// The current parameter vector (after a failed run, the value of the
    /// last successful step).
    pub fn params(&self) -> &Ten64 {
        &self.params.value
    }

    /// Consumes the trainer, yielding the final parameter vector.
    pub fn into_params(self) -> Ten64 {
        self.params.value
    }

    /// Runs one full predict → evaluate → differentiate → step cycle and
    /// returns the loss measured before the step.
    ///
    /// On any failure the parameters are left untouched: the gradient is
    /// only applied after every fallible stage has succeeded, and the
    /// update commits the whole vector at once.
    pub fn step_once<M, L, G>(
        &mut self,
        model: &M,
        loss: &L,
        gradient: &G,
        inputs: &Ten64,
        targets: &Ten64,
    ) -> Result<f64, TrainError>
    where
        M: Model,
        L: Loss,
        G: Gradient,
    {
        let outputs = model.predict(&self.params.value, inputs)?;
        let current = loss.loss(&outputs, targets)?;

        let mut objective = |candidate: &Ten64| -> Result<f64, TrainError> {
            let outputs = model.predict(candidate, inputs)?;
            loss.loss(&outputs, targets)
        };
        let grad = gradient.gradient(&self.params.value, &mut objective)?;
        if grad.len() != self.params.value.len() {
            return Err(TrainError::GradientLength {
                expected: self.params.value.len(),
                got: grad.len(),
            });
        }

        self.params.grad.data = grad.data;
        ops::sgd(&mut self.params, self.config.learning_rate);
        Ok(current)
    }

    /// Runs the configured number of epochs, returning the loss history.
    ///
    /// A failure in `predict`, `loss`, or `gradient` surfaces immediately
    /// as a [`TrainFailure`] carrying the epoch index; the trainer keeps
    /// the parameters of the last successful step. A loss that rises for
    /// [`DIVERGENCE_WINDOW`] consecutive steps logs one warning and the
    /// run continues.
    pub fn fit<M, L, G>(
        &mut self,
        model: &M,
        loss: &L,
        gradient: &G,
        inputs: &Ten64,
        targets: &Ten64,
    ) -> Result<TrainReport, TrainFailure>
    where
        M: Model,
        L: Loss,
        G: Gradient,
    {
        let mut epoch_losses = Vec::with_capacity(self.config.epochs);
        let mut rising = 0usize;
        let mut warned = false;

        for epoch in 0..self.config.epochs {
            let value = self
                .step_once(model, loss, gradient, inputs, targets)
                .map_err(|source| TrainFailure { epoch, source })?;
            debug!("epoch {epoch}: loss {value}");

            if let Some(&prev) = epoch_losses.last() {
                rising = if value > prev { rising + 1 } else { 0 };
                if rising >= DIVERGENCE_WINDOW && !warned {
                    warn!(
                        "loss has increased for {rising} consecutive steps \
                         (epoch {epoch}); the learning rate may be too large"
                    );
                    warned = true;
                }
            }
            epoch_losses.push(value);
        }

        Ok(TrainReport { epoch_losses })
    }
}
