use serde::{Serialize, Deserialize};

use crate::error::{IrisError, Result};

/// Hyperparameters for one `train_loop` run.
///
/// # Fields
/// - `epochs`              — total number of full passes over the training rows
/// - `batch_size`          — samples per mini-batch
/// - `validation_fraction` — trailing fraction of rows held out for validation
/// - `shuffle`             — reshuffle training rows at the start of every epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub validation_fraction: f64,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

fn default_shuffle() -> bool {
    true
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, validation_fraction: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            validation_fraction,
            shuffle: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IrisError::Config("batch_size must be at least 1".into()));
        }
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(IrisError::Config(format!(
                "validation_fraction must be in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    /// 30 epochs, batches of 25, 20% validation.
    fn default() -> Self {
        TrainConfig::new(30, 25, 0.2)
    }
}
