use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn uniform(m: f64) -> Self {
        Margin { top: m, right: m, bottom: m, left: m }
    }
}

/// Drawing area of a view. `width`/`height` are the inner plot size; the
/// SVG canvas adds the margins around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl ChartLayout {
    /// Layout used for the loss and accuracy charts.
    pub fn metric_chart() -> Self {
        ChartLayout {
            width: 490.0,
            height: 325.0,
            margin: Margin { top: 50.0, right: 20.0, bottom: 30.0, left: 50.0 },
        }
    }

    /// Layout used for the network diagram.
    pub fn network_graph() -> Self {
        ChartLayout {
            width: 800.0,
            height: 600.0,
            margin: Margin::uniform(20.0),
        }
    }

    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }
}

/// Linear map from `[0, domain_max]` onto `[range_start, range_end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain_max: f64,
    pub range_start: f64,
    pub range_end: f64,
}

impl LinearScale {
    pub fn new(domain_max: f64, range_start: f64, range_end: f64) -> Self {
        LinearScale { domain_max, range_start, range_end }
    }

    /// An empty domain maps everything to `range_start`.
    pub fn map(&self, v: f64) -> f64 {
        if self.domain_max <= 0.0 {
            return self.range_start;
        }
        self.range_start + (v / self.domain_max) * (self.range_end - self.range_start)
    }

    /// `count + 1` evenly spaced ticks from 0 to `domain_max`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if self.domain_max <= 0.0 || count == 0 {
            return vec![0.0];
        }
        (0..=count)
            .map(|i| self.domain_max * i as f64 / count as f64)
            .collect()
    }
}
