pub mod error;
pub mod config;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod viz;
pub mod orchestrator;

// Convenience re-exports
pub use error::{IrisError, Result};
pub use config::DemoConfig;
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Network, ModelSpec, LayerSpec};
pub use optim::adam::Adam;
pub use train::{DenseModelService, EpochCallback, EpochMetrics, ModelService, TrainConfig};
pub use data::{Dataset, EncodedRecord, Record};
pub use viz::{ChartLayout, LineGraph, ModelGraph, SeriesKey, SeriesPoint, StatusPanel, TimeSeriesView, TopologyView};
pub use orchestrator::{DashboardFrame, RunSummary, TrainingOrchestrator};
