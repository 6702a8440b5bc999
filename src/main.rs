// Headless run: trains once and prints the final epoch's metrics.
// The live browser view is the `dashboard` binary:
//   cargo run --bin dashboard --release
use tracing::error;
use tracing_subscriber::EnvFilter;

use irisnet::config::CONFIG_FILE;
use irisnet::{
    DemoConfig, DenseModelService, LineGraph, ModelGraph, SeriesKey,
    TrainingOrchestrator,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("run failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> irisnet::Result<()> {
    let config = DemoConfig::load_or_default(CONFIG_FILE)?;
    let series = [SeriesKey::Validation, SeriesKey::Training];

    let mut orchestrator = TrainingOrchestrator::new(
        config.clone(),
        DenseModelService::new(config.learning_rate, config.seed),
        ModelGraph::new(config.network_graph),
        LineGraph::new("Loss", &series, config.loss_chart),
        LineGraph::new("Accuracy", &series, config.accuracy_chart),
    );
    let summary = orchestrator.run()?;

    println!("rows:                {}", summary.rows);
    if let Some(m) = summary.final_metrics {
        println!("epochs:              {}", m.epoch);
        println!("training loss:       {:.4}", m.train_loss);
        println!("validation loss:     {:.4}", m.val_loss);
        println!("training accuracy:   {:.2}", m.train_accuracy);
        println!("validation accuracy: {:.2}", m.val_accuracy);
    }
    Ok(())
}
