use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::{info, trace};

use crate::activation::Activation;
use crate::error::{NetworkError, Result};
use crate::f;
use crate::layers::Dense;

use super::trace::Trace;

/// Layer sizes from input to output, `[n0, n1, .., nk]`.
pub type Topology = Vec<usize>;
pub type Web = Vec<Dense>;

/// A stack of fully connected layers trained by online gradient descent.
///
/// Two ways of training are offered:
///
/// * [`Network::forward`] followed by [`Network::backwards`]. The forward pass
///   caches every layer's output and primes the network for exactly one
///   backward pass, which consumes the cache. A backward pass with nothing
///   cached fails with [`NetworkError::MissingForward`].
/// * [`Network::trace`] followed by [`Network::backwards_trace`], where the
///   activations travel explicitly and the cache is never touched.
///
/// Every call validates its arguments before mutating anything, so a rejected
/// call leaves weights, biases and cache as they were.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    learning_rate: f64,
    activation: Activation,
    web: Web,
    x: Option<Array1<f64>>,
}

impl Network {
    pub fn new(topology: Topology, learning_rate: f64, activation: Activation) -> Result<Network> {
        Network::with_rng(topology, learning_rate, activation, &mut thread_rng())
    }

    pub fn seeded(
        topology: Topology,
        learning_rate: f64,
        activation: Activation,
        seed: u64,
    ) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::with_rng(topology, learning_rate, activation, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        topology: Topology,
        learning_rate: f64,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Network> {
        if topology.len() < 2 || topology.contains(&0) {
            return Err(NetworkError::InvalidTopology(topology));
        }

        if !learning_rate.is_finite() || learning_rate <= 0. {
            return Err(NetworkError::InvalidLearningRate(learning_rate));
        }

        let mut web = Web::with_capacity(topology.len() - 1);
        for pair in topology.windows(2) {
            web.push(Dense::new(pair[0], pair[1], &mut *rng));
        }

        info!(?topology, learning_rate, "network woven");

        Ok(Network {
            topology,
            learning_rate,
            activation,
            web,
            x: None,
        })
    }

    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn d_in(&self) -> usize {
        self.topology[0]
    }

    pub fn d_out(&self) -> usize {
        self.topology[self.topology.len() - 1]
    }

    pub fn layers(&self) -> &[Dense] {
        &self.web
    }

    /// Whether a cached forward pass is waiting for [`Network::backwards`].
    pub fn is_primed(&self) -> bool {
        self.x.is_some() && self.web.iter().all(|layer| layer.a.is_some())
    }

    fn prepare(&self, x: &[f64]) -> Result<Array1<f64>> {
        if x.len() != self.d_in() {
            return Err(NetworkError::DimensionMismatch {
                what: "input",
                expected: self.d_in(),
                got: x.len(),
            });
        }

        Ok(Array1::from(x.to_vec()))
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.d_out() {
            return Err(NetworkError::DimensionMismatch {
                what: "target",
                expected: self.d_out(),
                got: target.len(),
            });
        }

        Ok(())
    }

    fn check_trace(&self, t: &Trace) -> Result<()> {
        let mismatch = |expected, got| NetworkError::DimensionMismatch {
            what: "trace",
            expected,
            got,
        };

        if t.x.len() != self.d_in() {
            return Err(mismatch(self.d_in(), t.x.len()));
        }

        if t.activations.len() != self.web.len() {
            return Err(mismatch(self.web.len(), t.activations.len()));
        }

        for (layer, a) in self.web.iter().zip(t.activations.iter()) {
            if a.len() != layer.neurons() {
                return Err(mismatch(layer.neurons(), a.len()));
            }
        }

        Ok(())
    }

    /// Forward pass that leaves the network untouched and returns every
    /// layer's output.
    pub fn trace(&self, x: &[f64]) -> Result<Trace> {
        let x = self.prepare(x)?;
        let mut activations: Vec<Array1<f64>> = Vec::with_capacity(self.web.len());

        for layer in self.web.iter() {
            let input = activations.last().unwrap_or(&x);
            let a = layer.forward(input.view(), &self.activation);
            activations.push(a);
        }

        Ok(Trace { x, activations })
    }

    /// Forward pass without caching, for callers that only read the outputs.
    pub fn predict(&self, x: &[f64]) -> Result<Array1<f64>> {
        Ok(self.trace(x)?.into_output())
    }

    /// Index of the strongest output for `x`.
    pub fn classify(&self, x: &[f64]) -> Result<usize> {
        Ok(f::argmax(self.predict(x)?.view()))
    }

    /// Forward pass that caches every layer's output for the next call to
    /// [`Network::backwards`]. A later forward pass overwrites the cache.
    ///
    /// A rejected call changes nothing: the cache of an earlier successful
    /// forward pass stays in place and is still what `backwards` trains on.
    pub fn forward(&mut self, input: &[f64]) -> Result<Array1<f64>> {
        let Trace { x, activations } = self.trace(input)?;
        let y = activations.last().cloned().unwrap_or_default();

        for (layer, a) in self.web.iter_mut().zip(activations) {
            layer.a = Some(a);
        }
        self.x = Some(x);

        Ok(y)
    }

    /// Backpropagates `target` through the activations cached by the last
    /// successful [`Network::forward`] and takes one gradient step. The cache
    /// is consumed. Forward passes that failed validation never reach the
    /// cache, so callers that ignore such an error train on the older input.
    pub fn backwards(&mut self, target: &[f64]) -> Result<()> {
        self.check_target(target)?;

        if !self.is_primed() {
            return Err(NetworkError::MissingForward);
        }

        let t = Trace {
            x: self.x.take().unwrap_or_default(),
            activations: self
                .web
                .iter_mut()
                .map(|layer| layer.a.take().unwrap_or_default())
                .collect(),
        };

        self.descend(&t, ArrayView1::from(target));
        Ok(())
    }

    /// Backpropagates `target` through an explicit trace and takes one
    /// gradient step. The cached activations are left alone.
    pub fn backwards_trace(&mut self, t: &Trace, target: &[f64]) -> Result<()> {
        self.check_trace(t)?;
        self.check_target(target)?;

        self.descend(t, ArrayView1::from(target));
        Ok(())
    }

    /// Every delta is computed against the weights the trace was produced
    /// with, then all layers are updated.
    fn descend(&mut self, t: &Trace, target: ArrayView1<f64>) {
        let d = self.activation.d;
        let depth = self.web.len();

        let y = &t.activations[depth - 1];
        let mut delta = (&target - y) * y.mapv(d);
        let mut deltas = Vec::with_capacity(depth);

        for l in (1..depth).rev() {
            let err = self.web[l].backward(&delta);
            let next = err * t.activations[l - 1].mapv(d);
            deltas.push(std::mem::replace(&mut delta, next));
        }
        deltas.push(delta);
        deltas.reverse();

        for (l, (layer, delta)) in self.web.iter_mut().zip(deltas.iter()).enumerate() {
            layer.update(delta, t.layer_input(l), self.learning_rate);
        }

        trace!(depth, learning_rate = self.learning_rate, "gradient step");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::{dsigmoid, sigmoid};
    use ndarray::array;
    use proptest::collection::vec;
    use test_strategy::proptest;

    fn sigmoid_net(topology: Topology, learning_rate: f64, seed: u64) -> Network {
        Network::seeded(topology, learning_rate, Activation::sigmoid(), seed).unwrap()
    }

    fn closer(before: &Array1<f64>, after: &Array1<f64>, target: &Array1<f64>) -> bool {
        before
            .iter()
            .zip(after.iter())
            .zip(target.iter())
            .all(|((b, a), t)| (a - t).abs() < (b - t).abs())
    }

    #[proptest]
    fn forward_yields_one_open_unit_value_per_output(
        #[strategy(vec(1usize..12, 2..6))] topology: Vec<usize>,
        seed: u64,
        #[strategy(-0.5f64..0.5)] v: f64,
    ) {
        let d_in = topology[0];
        let d_out = topology[topology.len() - 1];
        let mut nn = sigmoid_net(topology, 0.01, seed);

        let y = nn.forward(&vec![v; d_in]).unwrap();

        assert_eq!(y.len(), d_out);
        assert!(y.iter().all(|v| *v > 0. && *v < 1.));
    }

    #[proptest]
    fn forward_is_deterministic_between_updates(
        #[strategy(vec(1usize..12, 2..6))] topology: Vec<usize>,
        seed: u64,
        #[strategy(-0.5f64..0.5)] v: f64,
    ) {
        let d_in = topology[0];
        let mut nn = sigmoid_net(topology, 0.01, seed);
        let x = vec![v; d_in];

        let first = nn.forward(&x).unwrap();
        assert_eq!(nn.forward(&x).unwrap(), first);
        assert_eq!(nn.predict(&x).unwrap(), first);
    }

    #[proptest]
    fn same_seed_weaves_the_same_network(seed: u64) {
        let a = sigmoid_net(vec![2, 5, 9], 0.01, seed);
        let b = sigmoid_net(vec![2, 5, 9], 0.01, seed);
        assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn weave_follows_the_topology() {
        let nn = sigmoid_net(vec![2, 57, 57, 57, 9], 0.01, 0);

        let shapes = nn.layers().iter().map(|l| l.w.dim()).collect::<Vec<_>>();
        assert_eq!(shapes, vec![(57, 2), (57, 57), (57, 57), (9, 57)]);
        assert_eq!((nn.d_in(), nn.d_out()), (2, 9));
        assert_eq!(nn.learning_rate(), 0.01);
        assert!(!nn.is_primed());
    }

    #[test]
    fn degenerate_topologies_are_rejected() {
        for topology in [vec![], vec![2], vec![2, 0, 9], vec![0, 9]] {
            assert!(matches!(
                Network::new(topology, 0.01, Activation::sigmoid()),
                Err(NetworkError::InvalidTopology(_))
            ));
        }
    }

    #[test]
    fn non_positive_learning_rates_are_rejected() {
        for rate in [0., -0.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Network::new(vec![2, 9], rate, Activation::sigmoid()),
                Err(NetworkError::InvalidLearningRate(_))
            ));
        }
    }

    #[test]
    fn wrong_input_length_fails_without_priming() {
        let mut nn = sigmoid_net(vec![2, 4, 9], 0.01, 1);

        for x in [vec![0.1], vec![0.1, 0.2, 0.3]] {
            assert!(matches!(
                nn.forward(&x),
                Err(NetworkError::DimensionMismatch {
                    what: "input",
                    expected: 2,
                    ..
                })
            ));
        }

        assert!(!nn.is_primed());
        assert!(nn.predict(&[0.1, 0.2, 0.3]).is_err());
    }

    #[test]
    fn rejected_forward_keeps_the_earlier_cache() {
        let mut nn = sigmoid_net(vec![2, 4, 9], 0.1, 6);
        let mut twin = nn.clone();
        let x = [0.2, -0.1];
        let target = f::onehot(2, 9).unwrap().to_vec();

        nn.forward(&x).unwrap();
        assert!(nn.forward(&[0.3]).is_err());
        assert!(nn.is_primed());
        nn.backwards(&target).unwrap();

        twin.forward(&x).unwrap();
        twin.backwards(&target).unwrap();
        assert_eq!(nn.layers(), twin.layers());
    }

    #[test]
    fn backwards_needs_a_pending_forward() {
        let mut nn = sigmoid_net(vec![2, 4, 9], 0.01, 2);
        let target = f::onehot(3, 9).unwrap().to_vec();

        assert!(matches!(
            nn.backwards(&target),
            Err(NetworkError::MissingForward)
        ));

        nn.forward(&[0.1, 0.2]).unwrap();
        assert!(nn.is_primed());
        nn.backwards(&target).unwrap();

        assert!(!nn.is_primed());
        assert!(matches!(
            nn.backwards(&target),
            Err(NetworkError::MissingForward)
        ));
    }

    #[test]
    fn wrong_target_length_leaves_everything_untouched() {
        let mut nn = sigmoid_net(vec![2, 4, 9], 0.01, 3);
        nn.forward(&[0.1, 0.2]).unwrap();
        let before = nn.layers().to_vec();

        assert!(matches!(
            nn.backwards(&[1., 0.]),
            Err(NetworkError::DimensionMismatch {
                what: "target",
                expected: 9,
                got: 2
            })
        ));

        assert_eq!(nn.layers(), &before[..]);
        assert!(nn.is_primed());
        nn.backwards(&f::onehot(0, 9).unwrap().to_vec()).unwrap();
    }

    #[test]
    fn backwards_follows_target_minus_output_on_activated_values() {
        let mut nn = sigmoid_net(vec![1, 1, 1], 0.5, 0);
        nn.web[0].w = array![[0.4]];
        nn.web[0].b = array![-0.1];
        nn.web[1].w = array![[0.8]];
        nn.web[1].b = array![0.2];

        let x = 1.5;
        let h = sigmoid(0.4 * x - 0.1);
        let y = sigmoid(0.8 * h + 0.2);
        let eps = 1e-12;
        assert!((nn.forward(&[x]).unwrap()[0] - y).abs() < eps);

        let delta_out = (1. - y) * dsigmoid(y);
        let delta_hidden = delta_out * 0.8 * dsigmoid(h);
        nn.backwards(&[1.]).unwrap();

        assert!((nn.web[1].w[[0, 0]] - (0.8 + 0.5 * delta_out * h)).abs() < eps);
        assert!((nn.web[1].b[0] - (0.2 + 0.5 * delta_out)).abs() < eps);
        assert!((nn.web[0].w[[0, 0]] - (0.4 + 0.5 * delta_hidden * x)).abs() < eps);
        assert!((nn.web[0].b[0] - (-0.1 + 0.5 * delta_hidden)).abs() < eps);
    }

    #[test]
    fn explicit_trace_matches_the_cached_protocol() {
        let mut cached = sigmoid_net(vec![2, 6, 6, 9], 0.1, 4);
        let mut explicit = cached.clone();
        let x = [0.3, -0.1];
        let target = f::onehot(5, 9).unwrap().to_vec();

        let y = cached.forward(&x).unwrap();
        cached.backwards(&target).unwrap();

        let t = explicit.trace(&x).unwrap();
        assert_eq!(t.output(), Some(&y));
        assert!(!explicit.is_primed());
        explicit.backwards_trace(&t, &target).unwrap();

        assert_eq!(cached.layers(), explicit.layers());
    }

    #[test]
    fn foreign_traces_are_rejected() {
        let small = sigmoid_net(vec![2, 3, 9], 0.1, 5);
        let mut nn = sigmoid_net(vec![2, 4, 9], 0.1, 5);
        let t = small.trace(&[0.1, 0.1]).unwrap();

        assert!(matches!(
            nn.backwards_trace(&t, &f::onehot(0, 9).unwrap().to_vec()),
            Err(NetworkError::DimensionMismatch { what: "trace", .. })
        ));
    }

    #[test]
    fn single_layer_step_moves_every_output_toward_target() {
        for seed in 0..100 {
            let mut nn = sigmoid_net(vec![2, 9], 0.01, seed);
            let x = [0.1, -0.2];
            let target = f::onehot(seed as usize % 9, 9).unwrap();

            let before = nn.forward(&x).unwrap();
            nn.backwards(target.as_slice().unwrap()).unwrap();
            let after = nn.predict(&x).unwrap();

            assert!(closer(&before, &after, &target), "seed {seed}");
        }
    }

    #[test]
    fn hidden_layer_step_moves_outputs_toward_target_for_most_seeds() {
        let improved = (0..100)
            .filter(|&seed| {
                let mut nn = sigmoid_net(vec![2, 4, 9], 0.01, seed);
                let x = [0.1, -0.2];
                let target = f::onehot(seed as usize % 9, 9).unwrap();

                let before = nn.forward(&x).unwrap();
                nn.backwards(target.as_slice().unwrap()).unwrap();
                let after = nn.predict(&x).unwrap();

                closer(&before, &after, &target)
            })
            .count();

        assert!(improved >= 95, "improved in {improved} of 100 trials");
    }
}
