use std::fmt::Write;

use crate::network::network::Network;
use crate::viz::colour::{bias_colour, parameter_colour};
use crate::viz::layout::{ChartLayout, LinearScale};
use crate::viz::TopologyView;

const NODE_RADIUS: f64 = 10.0;

/// Network diagram: one column of nodes per layer (input first), one line per
/// weight. Edge colour runs from blue at weight -1 to red at +1; node outline
/// runs from blue at bias 0 to red at bias 1.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    layout: ChartLayout,
    /// `weights[layer][from][to]`
    weights: Vec<Vec<Vec<f64>>>,
    /// `biases[column][node]`; column 0 is the input layer (all zero).
    biases: Vec<Vec<f64>>,
    svg: String,
}

impl ModelGraph {
    pub fn new(layout: ChartLayout) -> Self {
        ModelGraph {
            layout,
            weights: Vec::new(),
            biases: Vec::new(),
            svg: String::new(),
        }
    }

    /// Node count per column, input layer included.
    pub fn column_sizes(&self) -> Vec<usize> {
        self.biases.iter().map(Vec::len).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.weights
            .iter()
            .map(|layer| layer.iter().map(Vec::len).sum::<usize>())
            .sum()
    }

    fn render(&self) -> String {
        let l = &self.layout;
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" class="model-graph"><g transform="translate({}, {})">"#,
            l.outer_width(),
            l.outer_height(),
            l.margin.left,
            l.margin.top,
        );

        let x = LinearScale::new(self.weights.len() as f64, 0.0, l.width);
        let ys: Vec<LinearScale> = self
            .biases
            .iter()
            .map(|b| LinearScale::new(b.len() as f64 + 1.0, 0.0, l.height))
            .collect();

        out.push_str("<g class=\"edges\">");
        for (layer, rows) in self.weights.iter().enumerate() {
            for (from, row) in rows.iter().enumerate() {
                for (to, &w) in row.iter().enumerate() {
                    let _ = write!(
                        out,
                        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>"#,
                        x.map(layer as f64),
                        ys[layer].map(from as f64 + 1.0),
                        x.map(layer as f64 + 1.0),
                        ys[layer + 1].map(to as f64 + 1.0),
                        parameter_colour(w),
                    );
                }
            }
        }
        out.push_str("</g><g class=\"nodes\">");
        for (column, biases) in self.biases.iter().enumerate() {
            for (j, &b) in biases.iter().enumerate() {
                let _ = write!(
                    out,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="white" stroke="{}" stroke-width="2"/>"#,
                    x.map(column as f64),
                    ys[column].map(j as f64 + 1.0),
                    NODE_RADIUS,
                    bias_colour(b),
                );
            }
        }
        out.push_str("</g></g></svg>");
        out
    }
}

impl TopologyView<Network> for ModelGraph {
    fn resample(&mut self, model: &Network) {
        self.weights = model.layers.iter().map(|l| l.weights.data.clone()).collect();
        self.biases = std::iter::once(vec![0.0; model.input_size()])
            .chain(model.layers.iter().map(|l| l.biases.values().collect()))
            .collect();
    }

    fn redraw(&mut self) {
        self.svg = self.render();
    }

    fn svg(&self) -> &str {
        &self.svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::ModelSpec;
    use rand::{rngs::StdRng, SeedableRng};

    fn network() -> Network {
        let spec = ModelSpec::iris(&[7, 7], vec!["a".into(), "b".into(), "c".into()]);
        Network::from_spec(&spec, &mut StdRng::seed_from_u64(4)).unwrap()
    }

    #[test]
    fn resample_reads_every_parameter() {
        let mut g = ModelGraph::new(ChartLayout::network_graph());
        g.resample(&network());
        assert_eq!(g.column_sizes(), vec![4, 7, 7, 3]);
        assert_eq!(g.edge_count(), 4 * 7 + 7 * 7 + 7 * 3);
    }

    #[test]
    fn redraw_draws_nodes_and_edges() {
        let mut g = ModelGraph::new(ChartLayout::network_graph());
        g.resample(&network());
        g.redraw();
        assert_eq!(g.svg().matches("<circle").count(), 4 + 7 + 7 + 3);
        assert_eq!(g.svg().matches("<line").count(), 98);
    }

    #[test]
    fn resample_tracks_parameter_changes() {
        let mut net = network();
        let mut g = ModelGraph::new(ChartLayout::network_graph());
        g.resample(&net);
        g.redraw();
        let before = g.svg().to_owned();

        for w in net.layers[0].weights.values_mut() {
            *w = 1.0;
        }
        g.resample(&net);
        g.redraw();
        assert_ne!(before, g.svg());
        assert!(g.svg().contains("#ff0000"));
    }

    #[test]
    fn node_outline_follows_raw_bias() {
        let mut net = network();
        let mut g = ModelGraph::new(ChartLayout::network_graph());
        g.resample(&net);
        g.redraw();
        // Fresh biases are zero, so every outline starts blue.
        assert_eq!(g.svg().matches(r##"fill="white" stroke="#0000ff""##).count(), 4 + 7 + 7 + 3);

        for b in net.layers[2].biases.values_mut() {
            *b = 1.0;
        }
        g.resample(&net);
        g.redraw();
        assert_eq!(g.svg().matches(r##"fill="white" stroke="#ff0000""##).count(), 3);
    }

    #[test]
    fn empty_graph_renders() {
        let mut g = ModelGraph::new(ChartLayout::network_graph());
        g.redraw();
        assert!(g.svg().starts_with("<svg"));
        assert_eq!(g.svg().matches("<circle").count(), 0);
    }
}
