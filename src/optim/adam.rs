use crate::{math::matrix::Matrix, network::network::Network};

/// Adam optimizer with bias-corrected first and second moment estimates.
///
/// Moment buffers are allocated lazily on the first `step` to match the
/// network they are applied to.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    /// (weights, biases) first moments per layer.
    m: Vec<(Matrix, Matrix)>,
    /// (weights, biases) second moments per layer.
    v: Vec<(Matrix, Matrix)>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// Applies one update to every layer. `grads[i]` holds the averaged
    /// (weights, biases) gradients for layer `i`.
    pub fn step(&mut self, network: &mut Network, grads: &[(Matrix, Matrix)]) {
        if self.m.len() != network.layers.len() {
            let zeros: Vec<(Matrix, Matrix)> = network
                .layers
                .iter()
                .map(|l| (
                    Matrix::zeros(l.weights.rows, l.weights.cols),
                    Matrix::zeros(l.biases.rows, l.biases.cols),
                ))
                .collect();
            self.m = zeros.clone();
            self.v = zeros;
            self.t = 0;
        }

        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t);
        let bc2 = 1.0 - self.beta2.powi(self.t);

        for (i, layer) in network.layers.iter_mut().enumerate() {
            let (gw, gb) = &grads[i];
            let (mw, mb) = &mut self.m[i];
            let (vw, vb) = &mut self.v[i];
            let hyper = (self.learning_rate, self.beta1, self.beta2, self.epsilon, bc1, bc2);
            update(&mut layer.weights, gw, mw, vw, hyper);
            update(&mut layer.biases, gb, mb, vb, hyper);
        }
    }
}

fn update(
    param: &mut Matrix,
    grad: &Matrix,
    m: &mut Matrix,
    v: &mut Matrix,
    (lr, beta1, beta2, eps, bc1, bc2): (f64, f64, f64, f64, f64, f64),
) {
    let moments = m.values_mut().zip(v.values_mut());
    for ((p, g), (m, v)) in param.values_mut().zip(grad.values()).zip(moments) {
        *m = beta1 * *m + (1.0 - beta1) * g;
        *v = beta2 * *v + (1.0 - beta2) * g * g;
        let m_hat = *m / bc1;
        let v_hat = *v / bc2;
        *p -= lr * m_hat / (v_hat.sqrt() + eps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::ModelSpec;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn first_step_moves_each_weight_by_about_lr() {
        let spec = ModelSpec::iris(&[2], vec!["a".into(), "b".into()]);
        let mut net = Network::from_spec(&spec, &mut StdRng::seed_from_u64(3)).unwrap();
        let before = net.layers[0].weights.clone();
        let grads: Vec<(Matrix, Matrix)> = net
            .layers
            .iter()
            .map(|l| (
                l.weights.map(|_| 0.5),
                l.biases.map(|_| -0.5),
            ))
            .collect();

        let mut adam = Adam::new(0.01);
        adam.step(&mut net, &grads);

        assert_eq!(adam.steps(), 1);
        for (b, a) in before.values().zip(net.layers[0].weights.values()) {
            assert!(((b - a) - 0.01).abs() < 1e-6);
        }
        assert!(net.layers[1].biases.values().all(|b| (b - 0.01).abs() < 1e-6));
    }
}
