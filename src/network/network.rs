use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Layer;
use crate::network::spec::ModelSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub output_labels: Vec<String>,
}

impl Network {
    /// Builds a freshly initialized network from a validated spec.
    pub fn from_spec<R: Rng + ?Sized>(spec: &ModelSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .shapes()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Ok(Network { layers, output_labels: spec.output_labels.clone() })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Class name of the most probable output for `input`.
    pub fn predict_label(&mut self, input: &[f64]) -> Option<&str> {
        let out = self.forward(input);
        let idx = argmax(&out);
        self.output_labels.get(idx).map(String::as_str)
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let mut network: Network = serde_json::from_reader(reader)?;
        // Scratch buffers are not persisted.
        for layer in &mut network.layers {
            layer.neurons = crate::math::matrix::Matrix::zeros(1, layer.size);
        }
        Ok(network)
    }
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn iris_network() -> Network {
        let spec = ModelSpec::iris(&[7, 7], vec!["a".into(), "b".into(), "c".into()]);
        Network::from_spec(&spec, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn forward_yields_distribution() {
        let mut net = iris_network();
        let out = net.forward(&[0.8, 0.5, 0.2, 0.05]);
        assert_eq!(out.len(), 3);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(net.predict_label(&[0.8, 0.5, 0.2, 0.05]).is_some());
    }

    #[test]
    fn json_round_trip_keeps_weights() {
        let net = iris_network();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let path = path.to_str().unwrap();
        net.save_json(path).unwrap();
        let loaded = Network::load_json(path).unwrap();
        assert_eq!(loaded.layers.len(), 3);
        assert_eq!(loaded.layers[1].weights, net.layers[1].weights);
        assert_eq!(loaded.output_labels, net.output_labels);
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
