use serde::{Serialize, Deserialize};

use crate::train::epoch_stats::EpochMetrics;

/// Headline read-outs shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPanel {
    pub epoch: String,
    pub accuracy: String,
    pub loss: String,
}

impl StatusPanel {
    pub fn update(&mut self, metrics: &EpochMetrics) {
        self.epoch = metrics.epoch.to_string();
        self.accuracy = format!("{:.2}", metrics.val_accuracy);
        self.loss = format!("{:.2}", metrics.val_loss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_validation_metrics() {
        let mut panel = StatusPanel::default();
        panel.update(&EpochMetrics {
            epoch: 4,
            total_epochs: 30,
            train_loss: 0.9,
            val_loss: 0.8765,
            train_accuracy: 0.5,
            val_accuracy: 0.6666,
            elapsed_ms: 3,
        });
        assert_eq!(panel.epoch, "4");
        assert_eq!(panel.accuracy, "0.67");
        assert_eq!(panel.loss, "0.88");
    }
}
