use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::{IrisError, Result};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::matrix::Matrix;
use crate::network::network::{argmax, Network};
use crate::optim::adam::Adam;
use crate::train::callback::EpochCallback;
use crate::train::epoch_stats::EpochMetrics;

/// Held-out and training rows for one run.
pub struct Split<'a> {
    pub train_inputs: &'a [Vec<f64>],
    pub train_labels: &'a [Vec<f64>],
    pub val_inputs: &'a [Vec<f64>],
    pub val_labels: &'a [Vec<f64>],
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with mini-batch Adam on categorical cross-entropy for
/// `epochs` epochs, calling `on_epoch_end` after each one.
///
/// Returns the metrics of the last completed epoch (`None` when `epochs == 0`).
///
/// # Errors
/// - `IrisError::Training` if the training or validation rows are empty,
///   a sample does not match the network's input/output width, or the loss
///   becomes non-finite.
/// - any error returned by `on_epoch_end`.
#[allow(clippy::too_many_arguments)]
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    optimizer: &mut Adam,
    split: &Split<'_>,
    epochs: usize,
    batch_size: usize,
    shuffle: bool,
    rng: &mut R,
    on_epoch_end: &mut dyn EpochCallback<Network>,
) -> Result<Option<EpochMetrics>> {
    check_rows(network, split.train_inputs, split.train_labels, "training")?;
    check_rows(network, split.val_inputs, split.val_labels, "validation")?;
    if batch_size == 0 {
        return Err(IrisError::Training("batch_size must be at least 1".into()));
    }

    let mut last = None;

    for epoch in 1..=epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(
            network,
            optimizer,
            split.train_inputs,
            split.train_labels,
            batch_size,
            shuffle,
            rng,
        );
        if !train_loss.is_finite() {
            return Err(IrisError::Training(format!(
                "training loss became non-finite in epoch {}",
                epoch
            )));
        }

        let train_accuracy = compute_accuracy(network, split.train_inputs, split.train_labels);
        let val_loss = compute_eval_loss(network, split.val_inputs, split.val_labels);
        let val_accuracy = compute_accuracy(network, split.val_inputs, split.val_labels);

        let metrics = EpochMetrics {
            epoch,
            total_epochs: epochs,
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            epoch,
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
            "epoch finished"
        );

        on_epoch_end.on_epoch_end(network, &metrics)?;
        last = Some(metrics);
    }

    Ok(last)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_rows(network: &Network, inputs: &[Vec<f64>], labels: &[Vec<f64>], what: &str) -> Result<()> {
    if inputs.is_empty() {
        return Err(IrisError::Training(format!("{} set is empty", what)));
    }
    if inputs.len() != labels.len() {
        return Err(IrisError::Training(format!(
            "{} set has {} inputs but {} labels",
            what,
            inputs.len(),
            labels.len()
        )));
    }
    let (n_in, n_out) = (network.input_size(), network.output_size());
    if let Some(i) = inputs.iter().position(|x| x.len() != n_in) {
        return Err(IrisError::Training(format!(
            "{} row {} has {} features, model expects {}",
            what,
            i,
            inputs[i].len(),
            n_in
        )));
    }
    if let Some(i) = labels.iter().position(|y| y.len() != n_out) {
        return Err(IrisError::Training(format!(
            "{} label {} has width {}, model outputs {}",
            what,
            i,
            labels[i].len(),
            n_out
        )));
    }
    Ok(())
}

/// Runs one full epoch of mini-batch Adam over the training rows.
/// Returns the mean loss over all samples.
fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    optimizer: &mut Adam,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    batch_size: usize,
    shuffle: bool,
    rng: &mut R,
) -> f64 {
    let n = inputs.len();
    let mut total_loss = 0.0;

    let mut indices: Vec<usize> = (0..n).collect();
    if shuffle {
        indices.shuffle(rng);
    }

    for batch in indices.chunks(batch_size) {
        let mut acc_grads: Vec<(Matrix, Matrix)> = network.layers.iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.rows, layer.weights.cols),
                Matrix::zeros(layer.biases.rows, layer.biases.cols),
            ))
            .collect();

        for &idx in batch {
            let input = &inputs[idx];
            let expected = &labels[idx];

            let output = network.forward(input);
            total_loss += CrossEntropyLoss::loss(&output, expected);

            let mut delta = Matrix::row(CrossEntropyLoss::derivative(&output, expected));

            // Backward pass.
            for i in (0..network.layers.len()).rev() {
                let input_for_layer = if i == 0 {
                    Matrix::row(input.clone())
                } else {
                    network.layers[i - 1].neurons.clone()
                };

                let (w_grad, b_grad) = network.layers[i].compute_gradients(&delta, &input_for_layer);

                if i > 0 {
                    delta = &b_grad * &network.layers[i].weights.transpose();
                }

                acc_grads[i].0.add_assign(&w_grad);
                acc_grads[i].1.add_assign(&b_grad);
            }
        }

        let inv_batch = 1.0 / batch.len() as f64;
        let averaged: Vec<(Matrix, Matrix)> = acc_grads
            .into_iter()
            .map(|(w, b)| (w.map(|x| x * inv_batch), b.map(|x| x * inv_batch)))
            .collect();
        optimizer.step(network, &averaged);
    }

    total_loss / n as f64
}

/// Mean loss over a full set without gradient accumulation.
fn compute_eval_loss(network: &mut Network, inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> f64 {
    let outputs: Vec<Vec<f64>> = inputs.iter().map(|x| network.forward(x)).collect();
    CrossEntropyLoss::mean_loss(
        outputs.iter().map(Vec::as_slice).zip(labels.iter().map(Vec::as_slice)),
    )
}

/// Fraction of samples whose argmax output matches the one-hot label.
fn compute_accuracy(network: &mut Network, inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> f64 {
    let n = inputs.len();
    if n == 0 {
        return 0.0;
    }
    let correct = inputs.iter().zip(labels.iter())
        .filter(|(input, label)| argmax(&network.forward(input)) == argmax(label))
        .count();
    correct as f64 / n as f64
}
