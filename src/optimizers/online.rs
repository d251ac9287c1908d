use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::f;
use crate::nn::Network;
use crate::Sample;

/// Plain online gradient descent: one forward and one backward pass per
/// example, no batching, no momentum, no decay.
pub struct OnlineGradientDescent<'a> {
    network: &'a mut Network,
    samples: usize,
    pub losses: Vec<f64>,
}

impl<'a> OnlineGradientDescent<'a> {
    pub fn new(network: &'a mut Network) -> OnlineGradientDescent<'a> {
        OnlineGradientDescent {
            network,
            samples: 1,
            losses: vec![],
        }
    }

    /// Updates made per [`OnlineGradientDescent::step`].
    pub fn set_samples(&mut self, samples: usize) -> &mut Self {
        self.samples = samples;
        self
    }

    /// Trains on examples drawn at random, with replacement, from `data` and
    /// returns the mean squared error the network showed on them before each
    /// update. Nothing happens when `data` is empty.
    ///
    /// Every example is checked against the network's input and output sizes
    /// before the first update, so a rejected step leaves the weights as they
    /// were.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        data: &[Sample],
        rng: &mut R,
    ) -> Result<Option<f64>> {
        if data.is_empty() || self.samples == 0 {
            return Ok(None);
        }

        let d_in = self.network.d_in();
        let d_out = self.network.d_out();

        for (x, label) in data {
            if x.len() != d_in {
                return Err(NetworkError::DimensionMismatch {
                    what: "input",
                    expected: d_in,
                    got: x.len(),
                });
            }
            if *label >= d_out {
                return Err(NetworkError::InvalidLabel {
                    label: *label,
                    categories: d_out,
                });
            }
        }

        let mut total = 0.;

        for _ in 0..self.samples {
            if let Some((x, label)) = data.choose(rng) {
                let target = f::onehot(*label, d_out)?;
                let y = self.network.forward(x)?;
                total += f::mse(y.view(), target.view());
                self.network.backwards(&target.to_vec())?;
            }
        }

        let loss = total / self.samples as f64;
        self.losses.push(loss);
        debug!(loss, samples = self.samples, "online step");

        Ok(Some(loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network(seed: u64) -> Network {
        Network::seeded(vec![2, 8, 9], 0.5, Activation::sigmoid(), seed).unwrap()
    }

    #[test]
    fn empty_data_is_a_no_op() {
        let mut nn = network(0);
        let before = nn.layers().to_vec();
        let mut rng = StdRng::seed_from_u64(0);

        let mut sgd = OnlineGradientDescent::new(&mut nn);
        assert_eq!(sgd.set_samples(10).step(&[], &mut rng).unwrap(), None);
        assert!(sgd.losses.is_empty());
        assert_eq!(nn.layers(), &before[..]);
    }

    #[test]
    fn repeated_steps_drive_the_loss_down() {
        let mut nn = network(1);
        let mut rng = StdRng::seed_from_u64(1);
        let data = vec![(vec![-0.3, 0.2], 2), (vec![0.3, -0.2], 6)];

        let mut sgd = OnlineGradientDescent::new(&mut nn);
        sgd.set_samples(20);
        for _ in 0..100 {
            sgd.step(&data, &mut rng).unwrap();
        }

        assert_eq!(sgd.losses.len(), 100);
        assert!(sgd.losses[99] < sgd.losses[0] / 2.);
    }

    #[test]
    fn labels_outside_the_output_layer_are_rejected() {
        let mut nn = network(2);
        let mut rng = StdRng::seed_from_u64(2);

        let mut sgd = OnlineGradientDescent::new(&mut nn);
        assert!(matches!(
            sgd.step(&[(vec![0., 0.], 9)], &mut rng),
            Err(NetworkError::InvalidLabel { label: 9, .. })
        ));
        assert!(!nn.is_primed());
    }

    #[test]
    fn one_bad_example_rejects_the_whole_step() {
        let data = vec![(vec![0.1, 0.2], 0), (vec![-0.1, 0.3], 9)];

        for seed in 0..20 {
            let mut nn = network(seed);
            let before = nn.layers().to_vec();
            let mut rng = StdRng::seed_from_u64(seed);

            let mut sgd = OnlineGradientDescent::new(&mut nn);
            assert!(matches!(
                sgd.set_samples(50).step(&data, &mut rng),
                Err(NetworkError::InvalidLabel { label: 9, .. })
            ));
            assert!(sgd.losses.is_empty());
            assert_eq!(nn.layers(), &before[..], "seed {seed}");
        }
    }

    #[test]
    fn inputs_of_the_wrong_length_reject_the_whole_step() {
        let mut nn = network(3);
        let before = nn.layers().to_vec();
        let mut rng = StdRng::seed_from_u64(3);
        let data = vec![(vec![0.1, 0.2], 1), (vec![0.3], 2)];

        let mut sgd = OnlineGradientDescent::new(&mut nn);
        assert!(matches!(
            sgd.set_samples(50).step(&data, &mut rng),
            Err(NetworkError::DimensionMismatch {
                what: "input",
                expected: 2,
                got: 1
            })
        ));
        assert_eq!(nn.layers(), &before[..]);
    }
}
