use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::data::preprocess::validation_split;
use crate::error::Result;
use crate::network::{ModelSpec, Network};
use crate::optim::adam::Adam;
use crate::train::callback::EpochCallback;
use crate::train::epoch_stats::EpochMetrics;
use crate::train::loop_fn::{train_loop, Split};
use crate::train::train_config::TrainConfig;

/// Builds trainable classifiers and runs training on them.
///
/// `train` invokes `on_epoch_end` once per completed epoch, synchronously on
/// the calling thread. A failure aborts the run; there is no retry.
pub trait ModelService {
    type Model;

    fn build(&mut self, spec: &ModelSpec) -> Result<Self::Model>;

    /// Returns the metrics of the final epoch, or `None` for a zero-epoch run.
    fn train(
        &mut self,
        model: &mut Self::Model,
        inputs: Vec<Vec<f64>>,
        labels: Vec<Vec<f64>>,
        config: &TrainConfig,
        on_epoch_end: &mut dyn EpochCallback<Self::Model>,
    ) -> Result<Option<EpochMetrics>>;
}

/// In-process dense network trainer: Glorot init, Adam, categorical
/// cross-entropy.
pub struct DenseModelService {
    learning_rate: f64,
    rng: StdRng,
}

impl DenseModelService {
    pub fn new(learning_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        DenseModelService { learning_rate, rng }
    }
}

impl ModelService for DenseModelService {
    type Model = Network;

    fn build(&mut self, spec: &ModelSpec) -> Result<Network> {
        let network = Network::from_spec(spec, &mut self.rng)?;
        info!(
            layers = network.layers.len(),
            parameters = network.layers.iter().map(|l| l.parameter_count()).sum::<usize>(),
            "built model"
        );
        Ok(network)
    }

    fn train(
        &mut self,
        model: &mut Network,
        inputs: Vec<Vec<f64>>,
        labels: Vec<Vec<f64>>,
        config: &TrainConfig,
        on_epoch_end: &mut dyn EpochCallback<Network>,
    ) -> Result<Option<EpochMetrics>> {
        config.validate()?;
        let (train_x, train_y, val_x, val_y) =
            validation_split(inputs, labels, config.validation_fraction)?;
        info!(
            train_rows = train_x.len(),
            val_rows = val_x.len(),
            epochs = config.epochs,
            batch_size = config.batch_size,
            "starting training"
        );

        let split = Split {
            train_inputs: &train_x,
            train_labels: &train_y,
            val_inputs: &val_x,
            val_labels: &val_y,
        };
        let mut optimizer = Adam::new(self.learning_rate);
        train_loop(
            model,
            &mut optimizer,
            &split,
            config.epochs,
            config.batch_size,
            config.shuffle,
            &mut self.rng,
            on_epoch_end,
        )
    }
}
