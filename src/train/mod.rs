pub mod callback;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
pub mod service;

pub use callback::EpochCallback;
pub use epoch_stats::EpochMetrics;
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
pub use service::{DenseModelService, ModelService};
