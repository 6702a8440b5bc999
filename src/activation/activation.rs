use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    ReLU,
    /// Softmax is vector-valued; the layer applies it to the whole
    /// pre-activation row in `Layer::feed_from()`.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to a full pre-activation vector.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::ReLU => z.iter().map(|&x| if x > 0.0 { x } else { 0.0 }).collect(),
            ActivationFunction::Softmax => softmax(z),
        }
    }

    /// Element-wise derivative with respect to the pre-activation.
    ///
    /// Softmax is always paired with cross-entropy, whose combined gradient
    /// `predicted - expected` is already the delta w.r.t. the logits, so the
    /// softmax step passes it through unchanged.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Softmax => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Softmax => "softmax",
        }
    }
}

/// Numerically stable softmax (shifted by the row maximum).
fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let out = ActivationFunction::Softmax.apply(&[1.0, 2.0, 3.0]);
        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(out[2] > out[1] && out[1] > out[0]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let out = ActivationFunction::Softmax.apply(&[1000.0, 1000.0]);
        assert!((out[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn relu_clamps_negatives() {
        assert_eq!(ActivationFunction::ReLU.apply(&[-1.0, 0.0, 2.5]), vec![0.0, 0.0, 2.5]);
        assert_eq!(ActivationFunction::ReLU.derivative(-0.1), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.1), 1.0);
    }
}
