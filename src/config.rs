use serde::{Serialize, Deserialize};

use crate::error::{IrisError, Result};
use crate::network::spec::ModelSpec;
use crate::train::train_config::TrainConfig;
use crate::viz::layout::ChartLayout;

/// Everything needed to run the demo end to end.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// CSV file with `sepal_length, sepal_width, petal_length, petal_width, class`.
    pub data_path: String,
    /// Class names; their order fixes the one-hot positions.
    pub categories: Vec<String>,
    /// Widths of the ReLU hidden layers.
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub train: TrainConfig,
    /// Seed for weight init and shuffling; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub loss_chart: ChartLayout,
    pub accuracy_chart: ChartLayout,
    pub network_graph: ChartLayout,
    /// Address the dashboard listens on.
    pub bind_addr: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            data_path: "data/iris.data".into(),
            categories: vec![
                "Iris-setosa".into(),
                "Iris-versicolor".into(),
                "Iris-virginica".into(),
            ],
            hidden_layers: vec![7, 7],
            learning_rate: 0.01,
            train: TrainConfig::default(),
            seed: None,
            loss_chart: ChartLayout::metric_chart(),
            accuracy_chart: ChartLayout::metric_chart(),
            network_graph: ChartLayout::network_graph(),
            bind_addr: "127.0.0.1:7878".into(),
        }
    }
}

impl DemoConfig {
    pub fn model_spec(&self) -> ModelSpec {
        ModelSpec::iris(&self.hidden_layers, self.categories.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(IrisError::Config("categories must not be empty".into()));
        }
        let mut sorted = self.categories.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.categories.len() {
            return Err(IrisError::Config("categories must be unique".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(IrisError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.train.validate()?;
        self.model_spec().validate()
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config written by `save_json` (or any subset of its keys).
    pub fn load_json(path: &str) -> Result<DemoConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: DemoConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &str) -> Result<DemoConfig> {
        if std::path::Path::new(path).exists() {
            DemoConfig::load_json(path)
        } else {
            Ok(DemoConfig::default())
        }
    }
}

/// Config file looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "irisnet.json";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_iris_demo() {
        let c = DemoConfig::default();
        assert_eq!(c.train.epochs, 30);
        assert_eq!(c.train.batch_size, 25);
        assert_eq!(c.train.validation_fraction, 0.2);
        assert_eq!(c.learning_rate, 0.01);
        assert_eq!(c.hidden_layers, vec![7, 7]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 3, "train": {{"epochs": 5, "batch_size": 10, "validation_fraction": 0.25}}}}"#).unwrap();
        let c = DemoConfig::load_json(file.path().to_str().unwrap()).unwrap();
        assert_eq!(c.seed, Some(3));
        assert_eq!(c.train.epochs, 5);
        assert!(c.train.shuffle);
        assert_eq!(c.categories.len(), 3);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("irisnet.json");
        let path = path.to_str().unwrap();
        let mut c = DemoConfig::default();
        c.bind_addr = "0.0.0.0:9000".into();
        c.save_json(path).unwrap();
        assert_eq!(DemoConfig::load_json(path).unwrap(), c);
    }

    #[test]
    fn rejects_duplicate_categories() {
        let mut c = DemoConfig::default();
        c.categories = vec!["a".into(), "a".into()];
        assert!(matches!(c.validate(), Err(IrisError::Config(_))));
    }
}
