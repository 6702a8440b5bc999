use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{IrisError, Result};

/// One dense layer in a model specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(size: usize, activation: ActivationFunction) -> Self {
        LayerSpec { size, activation }
    }
}

/// A serializable description of a dense network architecture.
///
/// Each layer's fan-in is the previous layer's `size`, or `input_size` for the
/// first layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub input_size: usize,
    /// Ordered layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Class names for the output units, in one-hot order.
    #[serde(default)]
    pub output_labels: Vec<String>,
}

impl ModelSpec {
    /// Four features → two ReLU layers of `hidden` units → softmax over the
    /// given classes.
    pub fn iris(hidden: &[usize], output_labels: Vec<String>) -> ModelSpec {
        let mut layers: Vec<LayerSpec> = hidden
            .iter()
            .map(|&size| LayerSpec::new(size, ActivationFunction::ReLU))
            .collect();
        layers.push(LayerSpec::new(output_labels.len(), ActivationFunction::Softmax));
        ModelSpec { input_size: 4, layers, output_labels }
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Yields `(size, input_size, activation)` for every layer.
    pub fn shapes(&self) -> impl Iterator<Item = (usize, usize, ActivationFunction)> + '_ {
        let fan_ins = std::iter::once(self.input_size).chain(self.layers.iter().map(|l| l.size));
        self.layers
            .iter()
            .zip(fan_ins)
            .map(|(l, input_size)| (l.size, input_size, l.activation))
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(IrisError::Config("model input size must be at least 1".into()));
        }
        if self.layers.is_empty() {
            return Err(IrisError::Config("model needs at least one layer".into()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(IrisError::Config(format!("layer {} has zero units", i + 1)));
        }
        if let Some(i) = self.layers[..self.layers.len() - 1]
            .iter()
            .position(|l| l.activation == ActivationFunction::Softmax)
        {
            return Err(IrisError::Config(format!(
                "softmax is only supported on the output layer (found on layer {})",
                i + 1
            )));
        }
        if !self.output_labels.is_empty() && self.output_labels.len() != self.output_size() {
            return Err(IrisError::Config(format!(
                "{} output labels for {} output units",
                self.output_labels.len(),
                self.output_size()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn iris_spec_shapes() {
        let spec = ModelSpec::iris(&[7, 7], labels());
        let shapes: Vec<_> = spec.shapes().collect();
        assert_eq!(
            shapes,
            vec![
                (7, 4, ActivationFunction::ReLU),
                (7, 7, ActivationFunction::ReLU),
                (3, 7, ActivationFunction::Softmax),
            ]
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn rejects_hidden_softmax() {
        let mut spec = ModelSpec::iris(&[7], labels());
        spec.layers[0].activation = ActivationFunction::Softmax;
        assert!(matches!(spec.validate(), Err(IrisError::Config(_))));
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let mut spec = ModelSpec::iris(&[7], labels());
        spec.output_labels.pop();
        assert!(spec.validate().is_err());
    }
}
