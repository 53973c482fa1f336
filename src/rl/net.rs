use ndarray::{Array1, Array2};
use rand::{rngs::SmallRng, Rng};

////////////////////////////////////////////////////////////////////////////////

/// Feed-forward approximator: ReLU hidden layers, linear output, trained by
/// SGD on the squared TD error of the chosen action.
pub struct Mlp {
    weights: Vec<Array2<f64>>,
    biases: Vec<Array1<f64>>,
    learning_rate: f64,
}

impl Mlp {
    pub fn new(
        input: usize,
        hidden: &[usize],
        output: usize,
        learning_rate: f64,
        rng: &mut SmallRng,
    ) -> Self {
        let mut dims = vec![input];
        dims.extend_from_slice(hidden);
        dims.push(output);

        let mut weights = Vec::new();
        let mut biases = Vec::new();
        for w in dims.windows(2) {
            let (fan_in, fan_out) = (w[0], w[1]);
            let scale = (6.0 / (fan_in + fan_out) as f64).sqrt();
            weights.push(Array2::from_shape_fn((fan_out, fan_in), |_| {
                (rng.random::<f64>() * 2.0 - 1.0) * scale
            }));
            biases.push(Array1::zeros(fan_out));
        }
        Self {
            weights,
            biases,
            learning_rate,
        }
    }

    pub fn output_len(&self) -> usize {
        self.biases.last().map(|b| b.len()).unwrap_or(0)
    }

    ////////////////////////////////////////////////////////////////////////////////

    pub fn forward(&self, input: &Array1<f64>) -> Array1<f64> {
        self.forward_trace(input).pop().unwrap()
    }

    /// Activations of every layer, input included; the last entry is the
    /// linear output.
    fn forward_trace(&self, input: &Array1<f64>) -> Vec<Array1<f64>> {
        let mut activations = vec![input.clone()];
        let last = self.weights.len() - 1;
        for (l, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
            let mut z = w.dot(activations.last().unwrap()) + b;
            if l < last {
                z.mapv_inplace(|x| x.max(0.0));
            }
            activations.push(z);
        }
        activations
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// One SGD step over a mini-batch. Only the chosen action's output
    /// contributes to the loss. Returns the per-sample TD errors (used as
    /// priorities by the prioritized memory).
    pub fn train(
        &mut self,
        inputs: &[Array1<f64>],
        actions: &[usize],
        targets: &[f64],
    ) -> Vec<f64> {
        assert_eq!(inputs.len(), actions.len());
        assert_eq!(inputs.len(), targets.len());
        if inputs.is_empty() {
            return Vec::new();
        }

        let mut grad_w: Vec<Array2<f64>> =
            self.weights.iter().map(|w| Array2::zeros(w.dim())).collect();
        let mut grad_b: Vec<Array1<f64>> =
            self.biases.iter().map(|b| Array1::zeros(b.len())).collect();
        let mut td_errors = Vec::with_capacity(inputs.len());

        for ((input, action), target) in inputs.iter().zip(actions).zip(targets) {
            let activations = self.forward_trace(input);
            let output = activations.last().unwrap();
            let td = output[*action] - target;
            td_errors.push(td);

            // output delta is zero everywhere but the chosen action
            let mut delta = Array1::zeros(output.len());
            delta[*action] = td;

            for l in (0..self.weights.len()).rev() {
                let prev = &activations[l];
                for (i, d) in delta.iter().enumerate() {
                    grad_b[l][i] += d;
                    for (j, p) in prev.iter().enumerate() {
                        grad_w[l][(i, j)] += d * p;
                    }
                }
                if l > 0 {
                    let mut next_delta = self.weights[l].t().dot(&delta);
                    // ReLU gate of the hidden layer below
                    for (x, a) in next_delta.iter_mut().zip(prev.iter()) {
                        if *a <= 0.0 {
                            *x = 0.0;
                        }
                    }
                    delta = next_delta;
                }
            }
        }

        let step = self.learning_rate / inputs.len() as f64;
        for l in 0..self.weights.len() {
            self.weights[l].scaled_add(-step, &grad_w[l]);
            self.biases[l].scaled_add(-step, &grad_b[l]);
        }
        td_errors
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// Target-network sync.
    pub fn clone_weights_from(&mut self, other: &Mlp) {
        self.weights = other.weights.clone();
        self.biases = other.biases.clone();
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn output_shape_matches_architecture() {
        let mut rng = SmallRng::seed_from_u64(1);
        let net = Mlp::new(4, &[8, 8], 3, 0.01, &mut rng);
        let out = net.forward(&Array1::zeros(4));
        assert_eq!(out.len(), 3);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn training_reduces_td_error_on_fixed_target() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut net = Mlp::new(2, &[16], 2, 0.05, &mut rng);
        let input = Array1::from_vec(vec![1.0, -1.0]);

        let before = (net.forward(&input)[0] - 3.0).abs();
        for _ in 0..200 {
            net.train(&[input.clone()], &[0], &[3.0]);
        }
        let after = (net.forward(&input)[0] - 3.0).abs();
        assert!(after < before);
        assert!(after < 0.1);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn weight_sync_makes_outputs_equal() {
        let mut rng = SmallRng::seed_from_u64(3);
        let online = Mlp::new(3, &[4], 2, 0.01, &mut rng);
        let mut target = Mlp::new(3, &[4], 2, 0.01, &mut rng);

        let input = Array1::from_vec(vec![0.5, 0.2, -0.4]);
        assert!(online.forward(&input) != target.forward(&input));
        target.clone_weights_from(&online);
        assert_eq!(online.forward(&input), target.forward(&input));
    }
}
