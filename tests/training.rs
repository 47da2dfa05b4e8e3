use std::cell::Cell;

use pixelgrad::error::TrainError;
use pixelgrad::models::{LossForm, MaeLoss, ModelForm, MseLoss, PixelLinear, Quadratic};
use pixelgrad::tensor;
use pixelgrad::tensors::{Ten64, Tensor};
use pixelgrad::train::{FiniteDifference, Gradient, Loss, Model, SgdTrainer, TrainConfig};

/// 20 evenly spaced points of t in [0, 19], scaled into [0, 1] the way the
/// pipeline normalizes its inputs, and the matching y = 2t^2 - 3t + 1.
fn quadratic_data() -> (Ten64, Ten64) {
    let t: Vec<f64> = (0..20).map(|i| i as f64 / 19.0).collect();
    let y: Vec<f64> = t.iter().map(|t| 2.0 * t * t - 3.0 * t + 1.0).collect();
    (Tensor::new(vec![20], t), Tensor::new(vec![20], y))
}

#[test]
fn test_finite_difference_matches_known_gradient() {
    // f(p) = (p0 - 5)^2 + 3*p1, so df/dp0 = 2*(p0 - 5), df/dp1 = 3.
    let mut objective = |p: &Ten64| -> Result<f64, TrainError> {
        Ok((p.data[0] - 5.0).powi(2) + 3.0 * p.data[1])
    };
    let params = tensor!([1.0, 2.0]);
    let grad = FiniteDifference::default()
        .gradient(&params, &mut objective)
        .unwrap();
    assert!((grad.data[0] - -8.0).abs() < 1e-5);
    assert!((grad.data[1] - 3.0).abs() < 1e-5);
}

#[test]
fn test_quadratic_fit_end_to_end() {
    let (t, y) = quadratic_data();
    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.5,
            epochs: 50,
        },
    );
    let report = trainer
        .fit(&Quadratic, &MseLoss, &FiniteDifference::default(), &t, &y)
        .unwrap();

    assert_eq!(report.epoch_losses.len(), 50);
    let initial = report.initial_loss().unwrap();
    let final_loss = report.final_loss().unwrap();
    assert!(final_loss < 1.0, "final MSE {final_loss} not below 1.0");
    assert!(final_loss < initial, "loss did not decrease from {initial}");
    assert_eq!(trainer.params().len(), 3);
}

#[test]
fn test_descent_is_mostly_monotone() {
    // Convex loss and a small enough learning rate: at least 90% of steps
    // must not increase the loss.
    let (t, y) = quadratic_data();
    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.1,
            epochs: 50,
        },
    );
    let report = trainer
        .fit(&Quadratic, &MseLoss, &FiniteDifference::default(), &t, &y)
        .unwrap();

    let losses = &report.epoch_losses;
    let non_increasing = losses
        .windows(2)
        .filter(|pair| pair[1] <= pair[0])
        .count();
    assert!(
        non_increasing as f64 >= 0.9 * (losses.len() - 1) as f64,
        "only {non_increasing} of {} steps descended",
        losses.len() - 1
    );
}

#[test]
fn test_divergence_is_not_fatal() {
    // A learning rate far past the stable range makes the loss rise every
    // step; the run still completes and reports the history.
    let (t, y) = quadratic_data();
    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 3.0,
            epochs: 8,
        },
    );
    let report = trainer
        .fit(&Quadratic, &MseLoss, &FiniteDifference::default(), &t, &y)
        .unwrap();
    let losses = &report.epoch_losses;
    assert!(losses.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn test_gradient_not_carried_between_steps() {
    // Loss (p0 - 5)^2 with its closed-form gradient 2*(p0 - 5). With
    // p0 = 0 and lr = 0.1 the first step uses gradient -10 and lands on
    // 1.0; the second uses gradient -8 and lands on 1.8. Any leftover
    // contribution from the first step would overshoot that.
    let passthrough_model = |params: &Ten64, _: &Ten64| -> Result<Ten64, TrainError> {
        Ok(params.clone())
    };
    let squared_loss = |outputs: &Ten64, _: &Ten64| -> Result<f64, TrainError> {
        Ok((outputs.data[0] - 5.0).powi(2))
    };
    let inputs = tensor!([0.0]);
    let targets = tensor!([0.0]);

    let mut trainer = SgdTrainer::new(
        tensor!([0.0]),
        TrainConfig {
            learning_rate: 0.1,
            epochs: 2,
        },
    );
    trainer
        .step_once(
            &passthrough_model,
            &squared_loss,
            &AnalyticParabola,
            &inputs,
            &targets,
        )
        .unwrap();
    assert!((trainer.params().data[0] - 1.0).abs() < 1e-12);

    trainer
        .step_once(
            &passthrough_model,
            &squared_loss,
            &AnalyticParabola,
            &inputs,
            &targets,
        )
        .unwrap();
    assert!(
        (trainer.params().data[0] - 1.8).abs() < 1e-12,
        "second step drifted: {}",
        trainer.params().data[0]
    );
}

#[test]
fn test_failure_preserves_last_stepped_params() {
    let (t, y) = quadratic_data();
    let failures = FailAfter {
        calls: Cell::new(0),
        fail_at: 3,
        inner: FiniteDifference::default(),
    };
    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.1,
            epochs: 10,
        },
    );
    let failure = trainer
        .fit(&Quadratic, &MseLoss, &failures, &t, &y)
        .unwrap_err();
    assert_eq!(failure.epoch, 3);

    // A clean run of exactly three epochs lands on the same parameters.
    let mut reference = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.1,
            epochs: 3,
        },
    );
    reference
        .fit(&Quadratic, &MseLoss, &FiniteDifference::default(), &t, &y)
        .unwrap();
    assert_eq!(trainer.params(), reference.params());
}

#[test]
fn test_gradient_length_is_checked() {
    let (t, y) = quadratic_data();
    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.1,
            epochs: 5,
        },
    );
    let failure = trainer
        .fit(&Quadratic, &MseLoss, &ShortGradient, &t, &y)
        .unwrap_err();
    assert_eq!(failure.epoch, 0);
    assert_eq!(
        failure.source,
        TrainError::GradientLength {
            expected: 3,
            got: 2
        }
    );
    // Nothing was stepped.
    assert_eq!(trainer.params().data, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_pixel_linear_model_forms() {
    // Two flattened 2-pixel "images"; weights [2, -1], bias 0.5.
    let inputs = tensor!([[1.0, 0.0], [0.0, 1.0]]);
    let params = tensor!([2.0, -1.0, 0.5]);
    let outputs = PixelLinear.predict(&params, &inputs).unwrap();
    assert_eq!(outputs.shape, vec![2]);
    assert_eq!(outputs.data, vec![2.5, -0.5]);

    // The enum forms dispatch to the same implementations.
    let via_enum = ModelForm::LinearPerPixel.predict(&params, &inputs).unwrap();
    assert_eq!(via_enum, outputs);

    let targets = tensor!([2.5, 0.5]);
    assert_eq!(LossForm::Mae.loss(&outputs, &targets).unwrap(), 0.5);
    assert_eq!(
        LossForm::Mse.loss(&outputs, &targets).unwrap(),
        MseLoss.loss(&outputs, &targets).unwrap()
    );
    assert_eq!(MaeLoss.loss(&outputs, &outputs).unwrap(), 0.0);
}

#[test]
fn test_model_param_count_is_validated() {
    let inputs = tensor!([1.0, 2.0]);
    let bad_params = tensor!([1.0, 2.0]);
    assert!(matches!(
        Quadratic.predict(&bad_params, &inputs),
        Err(TrainError::Predict(_))
    ));
}

/// Analytic gradient of (p0 - 5)^2 at the current point.
struct AnalyticParabola;

impl Gradient for AnalyticParabola {
    fn gradient(
        &self,
        params: &Ten64,
        _objective: &mut dyn FnMut(&Ten64) -> Result<f64, TrainError>,
    ) -> Result<Ten64, TrainError> {
        Ok(Tensor::new(
            params.shape.clone(),
            vec![2.0 * (params.data[0] - 5.0)],
        ))
    }
}

/// Delegates to finite differences until the configured call, then fails.
struct FailAfter {
    calls: Cell<usize>,
    fail_at: usize,
    inner: FiniteDifference,
}

impl Gradient for FailAfter {
    fn gradient(
        &self,
        params: &Ten64,
        objective: &mut dyn FnMut(&Ten64) -> Result<f64, TrainError>,
    ) -> Result<Ten64, TrainError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.fail_at {
            return Err(TrainError::Loss("synthetic failure".into()));
        }
        self.inner.gradient(params, objective)
    }
}

/// Always returns a two-element gradient, whatever the parameter count.
struct ShortGradient;

impl Gradient for ShortGradient {
    fn gradient(
        &self,
        _params: &Ten64,
        _objective: &mut dyn FnMut(&Ten64) -> Result<f64, TrainError>,
    ) -> Result<Ten64, TrainError> {
        Ok(tensor!([0.25, 0.25]))
    }
}
