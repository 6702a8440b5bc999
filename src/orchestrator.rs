//! Wires loading, preprocessing, training and the live views together.

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::config::DemoConfig;
use crate::data::loader::load_dataset;
use crate::data::preprocess::{normalize_rows, shuffle_pairs, unzip, zip};
use crate::data::record::Dataset;
use crate::error::Result;
use crate::train::callback::EpochCallback;
use crate::train::epoch_stats::EpochMetrics;
use crate::train::service::ModelService;
use crate::viz::{SeriesKey, SeriesPoint, StatusPanel, TimeSeriesView, TopologyView};

/// Snapshot of every view after an epoch, as streamed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub epoch: usize,
    pub total_epochs: usize,
    pub status: StatusPanel,
    pub network_svg: String,
    pub loss_svg: String,
    pub accuracy_svg: String,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary<M> {
    pub model: M,
    pub rows: usize,
    /// Metrics of the final epoch; `None` for a zero-epoch run.
    pub final_metrics: Option<EpochMetrics>,
}

/// Runs the whole pipeline once.
///
/// The orchestrator keeps no metrics history: each epoch's metrics are pushed
/// into the views and dropped, and the line charts hold the accumulated
/// series.
pub struct TrainingOrchestrator<S, T, L> {
    config: DemoConfig,
    service: S,
    topology: T,
    loss_view: L,
    accuracy_view: L,
    status: StatusPanel,
    rng: StdRng,
    frame_tx: Option<mpsc::Sender<DashboardFrame>>,
}

impl<S, T, L> TrainingOrchestrator<S, T, L>
where
    S: ModelService,
    T: TopologyView<S::Model>,
    L: TimeSeriesView,
{
    pub fn new(config: DemoConfig, service: S, topology: T, loss_view: L, accuracy_view: L) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        TrainingOrchestrator {
            config,
            service,
            topology,
            loss_view,
            accuracy_view,
            status: StatusPanel::default(),
            rng,
            frame_tx: None,
        }
    }

    /// Sends a `DashboardFrame` after every epoch.
    pub fn with_frames(mut self, tx: mpsc::Sender<DashboardFrame>) -> Self {
        self.frame_tx = Some(tx);
        self
    }

    pub fn topology(&self) -> &T {
        &self.topology
    }

    pub fn loss_view(&self) -> &L {
        &self.loss_view
    }

    pub fn accuracy_view(&self) -> &L {
        &self.accuracy_view
    }

    pub fn status(&self) -> &StatusPanel {
        &self.status
    }

    /// Loads the configured dataset, then trains on it.
    pub fn run(&mut self) -> Result<RunSummary<S::Model>> {
        self.config.validate()?;
        let dataset = load_dataset(&self.config.data_path, &self.config.categories)?;
        self.run_with_dataset(&dataset)
    }

    /// Normalizes, shuffles and trains on an already loaded dataset.
    pub fn run_with_dataset(&mut self, dataset: &Dataset) -> Result<RunSummary<S::Model>> {
        let (xs, ys) = dataset.matrices();
        let xs = normalize_rows(&xs)?;

        let mut pairs = zip(xs, ys)?;
        shuffle_pairs(&mut pairs, &mut self.rng);
        let (xs, ys) = unzip(pairs);

        let mut model = self.service.build(&self.config.model_spec())?;

        let mut forwarder = EpochForwarder {
            topology: &mut self.topology,
            loss_view: &mut self.loss_view,
            accuracy_view: &mut self.accuracy_view,
            status: &mut self.status,
            frame_tx: self.frame_tx.as_ref(),
        };

        let final_metrics = self.service.train(
            &mut model,
            xs,
            ys,
            &self.config.train,
            &mut forwarder,
        )?;

        if let Some(m) = &final_metrics {
            info!(
                epochs = m.epoch,
                val_loss = m.val_loss,
                val_accuracy = m.val_accuracy,
                "training finished"
            );
        }

        Ok(RunSummary { model, rows: dataset.len(), final_metrics })
    }
}

/// Per-epoch callback that pushes metrics into the views.
struct EpochForwarder<'a, T, L> {
    topology: &'a mut T,
    loss_view: &'a mut L,
    accuracy_view: &'a mut L,
    status: &'a mut StatusPanel,
    frame_tx: Option<&'a mpsc::Sender<DashboardFrame>>,
}

impl<T, L> EpochForwarder<'_, T, L> {
    fn send_frame<M>(&self, epoch: usize, total_epochs: usize)
    where
        T: TopologyView<M>,
        L: TimeSeriesView,
    {
        let Some(tx) = self.frame_tx else { return };
        let frame = DashboardFrame {
            epoch,
            total_epochs,
            status: self.status.clone(),
            network_svg: self.topology.svg().to_owned(),
            loss_svg: self.loss_view.svg().to_owned(),
            accuracy_svg: self.accuracy_view.svg().to_owned(),
        };
        if tx.send(frame).is_err() {
            warn!(epoch, "frame receiver dropped; continuing without live updates");
        }
    }
}

impl<M, T, L> EpochCallback<M> for EpochForwarder<'_, T, L>
where
    T: TopologyView<M>,
    L: TimeSeriesView,
{
    fn on_epoch_end(&mut self, model: &M, metrics: &EpochMetrics) -> Result<()> {
        self.topology.resample(model);
        self.topology.redraw();

        // Charts plot from x = 0; the status panel shows the 1-based epoch.
        let x = metrics.epoch.saturating_sub(1) as f64;
        self.loss_view.append(&[SeriesPoint::new(SeriesKey::Validation, x, metrics.val_loss)]);
        self.loss_view.append(&[SeriesPoint::new(SeriesKey::Training, x, metrics.train_loss)]);
        self.loss_view.redraw();

        self.accuracy_view.append(&[SeriesPoint::new(SeriesKey::Validation, x, metrics.val_accuracy)]);
        self.accuracy_view.append(&[SeriesPoint::new(SeriesKey::Training, x, metrics.train_accuracy)]);
        self.accuracy_view.redraw();

        self.status.update(metrics);
        self.send_frame::<M>(metrics.epoch, metrics.total_epochs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::network::Network;
    use crate::train::DenseModelService;
    use crate::viz::{ChartLayout, LineGraph, ModelGraph};

    fn small_config() -> DemoConfig {
        let mut config = DemoConfig::default();
        config.categories = vec!["A".into(), "B".into(), "C".into()];
        config.seed = Some(21);
        config.train.epochs = 2;
        config
    }

    fn dataset() -> Dataset {
        let text = (0..15)
            .map(|i| {
                let class = ["A", "B", "C"][i % 3];
                format!("{}.0,{}.5,{}.2,0.{},{}", 4 + i % 3, 3, 1 + 2 * (i % 3), i % 9 + 1, class)
            })
            .collect::<Vec<_>>()
            .join("\n");
        crate::data::parse_dataset(&text, &["A".to_string(), "B".to_string(), "C".to_string()]).unwrap()
    }

    #[test]
    fn frames_follow_each_epoch() {
        let (tx, rx) = mpsc::channel();
        let config = small_config();
        let mut orch = TrainingOrchestrator::new(
            config.clone(),
            DenseModelService::new(config.learning_rate, config.seed),
            ModelGraph::new(ChartLayout::network_graph()),
            LineGraph::new("Loss", &[SeriesKey::Validation, SeriesKey::Training], config.loss_chart),
            LineGraph::new("Accuracy", &[SeriesKey::Validation, SeriesKey::Training], config.accuracy_chart),
        )
        .with_frames(tx);

        let summary = orch.run_with_dataset(&dataset()).unwrap();
        let frames: Vec<DashboardFrame> = rx.try_iter().collect();

        assert_eq!(summary.rows, 15);
        assert_eq!(summary.final_metrics.as_ref().map(|m| m.epoch), Some(2));
        assert_eq!(frames.iter().map(|f| f.epoch).collect::<Vec<_>>(), vec![1, 2]);
        assert!(frames[1].loss_svg.contains("<polyline"));
        assert_eq!(frames[1].status.epoch, "2");
        let xs: Vec<f64> = orch.loss_view().points(SeriesKey::Training).iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.0, 1.0]);
        assert_eq!(orch.accuracy_view().x_max(), 1.0);
        let _: &Network = &summary.model;
    }

    #[test]
    fn degenerate_row_aborts_before_training() {
        let config = small_config();
        let dataset = crate::data::parse_dataset("0,0,0,0,A\n1,1,1,1,B", &config.categories).unwrap();
        let mut orch = TrainingOrchestrator::new(
            config.clone(),
            DenseModelService::new(config.learning_rate, config.seed),
            ModelGraph::new(ChartLayout::network_graph()),
            LineGraph::new("Loss", &[], config.loss_chart),
            LineGraph::new("Accuracy", &[], config.accuracy_chart),
        );
        let err = orch.run_with_dataset(&dataset).unwrap_err();
        assert!(matches!(err, crate::error::IrisError::DegenerateVector { index: 0 }));
        assert!(orch.topology().svg().is_empty());
    }

    #[test]
    fn dropped_receiver_does_not_fail_the_run() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = small_config();
        let mut orch = TrainingOrchestrator::new(
            config.clone(),
            DenseModelService::new(config.learning_rate, config.seed),
            ModelGraph::new(ChartLayout::network_graph()),
            LineGraph::new("Loss", &[], config.loss_chart),
            LineGraph::new("Accuracy", &[], config.accuracy_chart),
        )
        .with_frames(tx);
        assert!(orch.run_with_dataset(&dataset()).is_ok());
    }
}
