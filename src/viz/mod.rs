//! Live views of a training run, rendered to standalone SVG.
//!
//! Each view owns its data: callers push new samples in (`resample`,
//! `append`) and ask for a fresh render with `redraw`.

pub mod colour;
pub mod layout;
pub mod line_graph;
pub mod model_graph;
pub mod status;

use serde::{Serialize, Deserialize};

pub use layout::{ChartLayout, Margin};
pub use line_graph::{escape, LineGraph};
pub use model_graph::ModelGraph;
pub use status::StatusPanel;

/// Which curve a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKey {
    Validation,
    Training,
}

impl SeriesKey {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesKey::Validation => "validation",
            SeriesKey::Training => "training",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub series: SeriesKey,
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    pub fn new(series: SeriesKey, x: f64, y: f64) -> Self {
        SeriesPoint { series, x, y }
    }
}

/// Node/edge diagram of a model's current parameters.
pub trait TopologyView<M> {
    /// Re-reads weights and biases from `model`.
    fn resample(&mut self, model: &M);
    fn redraw(&mut self);
    /// Output of the most recent `redraw`.
    fn svg(&self) -> &str;
}

/// Line chart over an accumulating set of series.
pub trait TimeSeriesView {
    fn append(&mut self, points: &[SeriesPoint]);
    fn redraw(&mut self);
    /// Output of the most recent `redraw`.
    fn svg(&self) -> &str;
}
