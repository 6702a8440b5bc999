use serde::{Serialize, Deserialize};

/// Per-epoch metrics emitted by the training loop.
///
/// One value is handed to the epoch callback at the end of every completed
/// epoch and then dropped; nothing in the crate accumulates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples seen during this epoch.
    pub train_loss: f64,
    /// Mean loss over the held-out validation rows after this epoch.
    pub val_loss: f64,
    /// Training accuracy as a fraction in [0, 1].
    pub train_accuracy: f64,
    /// Validation accuracy as a fraction in [0, 1].
    pub val_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
