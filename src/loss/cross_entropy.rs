/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Probabilities are clipped to `[EPS, 1 - EPS]` before the log.
const EPS: f64 = 1e-7;

impl CrossEntropyLoss {
    /// Scalar loss for one sample: `L = -sum(expected[i] * ln(clip(predicted[i])))`.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * p.clamp(EPS, 1.0 - EPS).ln())
            .sum()
    }

    /// Gradient of Softmax + cross-entropy w.r.t. the pre-softmax logits:
    ///   ∂L/∂z_i = predicted[i] - expected[i]
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }

    /// Mean loss over a set of (predicted, expected) pairs.
    pub fn mean_loss<'a, I>(pairs: I) -> f64
    where
        I: IntoIterator<Item = (&'a [f64], &'a [f64])>,
    {
        let (total, n) = pairs
            .into_iter()
            .fold((0.0, 0usize), |(t, n), (p, e)| (t + Self::loss(p, e), n + 1));
        if n == 0 { 0.0 } else { total / n as f64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_prediction_is_near_zero() {
        let l = CrossEntropyLoss::loss(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!(l < 1e-6);
    }

    #[test]
    fn uniform_prediction_is_ln_k() {
        let third = 1.0 / 3.0;
        let l = CrossEntropyLoss::loss(&[third, third, third], &[0.0, 1.0, 0.0]);
        assert!((l - 3.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn zero_probability_is_finite() {
        let l = CrossEntropyLoss::loss(&[0.0, 1.0], &[1.0, 0.0]);
        assert!(l.is_finite());
    }

    #[test]
    fn mean_over_samples() {
        let p1 = [0.5, 0.5];
        let e1 = [1.0, 0.0];
        let m = CrossEntropyLoss::mean_loss(vec![(&p1[..], &e1[..]), (&p1[..], &e1[..])]);
        assert!((m - 2.0f64.ln()).abs() < 1e-9);
        assert_eq!(CrossEntropyLoss::mean_loss(Vec::<(&[f64], &[f64])>::new()), 0.0);
    }
}
