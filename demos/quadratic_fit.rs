//! Fits a three-parameter quadratic to a noiseless curve with SGD and
//! prints the loss trajectory. Run with `RUST_LOG=debug` to see the
//! per-epoch loss from the trainer itself.

use pixelgrad::models::{MseLoss, Quadratic};
use pixelgrad::tensor;
use pixelgrad::tensors::Tensor;
use pixelgrad::train::{FiniteDifference, SgdTrainer, TrainConfig};

fn main() {
    env_logger::init();

    // y = 2t^2 - 3t + 1 sampled at 20 points, t scaled into [0, 1].
    let t: Vec<f64> = (0..20).map(|i| i as f64 / 19.0).collect();
    let y: Vec<f64> = t.iter().map(|t| 2.0 * t * t - 3.0 * t + 1.0).collect();
    let inputs = Tensor::new(vec![20], t);
    let targets = Tensor::new(vec![20], y);

    let mut trainer = SgdTrainer::new(
        tensor!([0.0, 0.0, 0.0]),
        TrainConfig {
            learning_rate: 0.5,
            epochs: 500,
        },
    );
    let report = trainer
        .fit(
            &Quadratic,
            &MseLoss,
            &FiniteDifference::default(),
            &inputs,
            &targets,
        )
        .expect("training failed");

    for (epoch, loss) in report.epoch_losses.iter().enumerate().step_by(50) {
        println!("epoch {epoch:>3}: mse {loss:.6}");
    }
    let params = trainer.params();
    println!(
        "fitted y = {:.3} t^2 + {:.3} t + {:.3} (target 2, -3, 1)",
        params.data[0], params.data[1], params.data[2]
    );
}
