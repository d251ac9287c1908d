use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::activation::Activation;

/// A fully connected layer.
///
/// `w[[i, j]]` is the weight from input `j` to neuron `i`, so `w` has one row
/// per neuron and one column per input.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    pub w: Array2<f64>,
    pub b: Array1<f64>,
    /// Output of the last forward pass that primed the network.
    pub a: Option<Array1<f64>>,
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(d_in: usize, neurons: usize, rng: &mut R) -> Dense {
        let range = Uniform::new(-1., 1.);
        Dense {
            w: Array2::random_using((neurons, d_in), range, rng),
            b: Array1::random_using(neurons, range, rng),
            a: None,
        }
    }

    pub fn neurons(&self) -> usize {
        self.w.nrows()
    }

    pub fn d_in(&self) -> usize {
        self.w.ncols()
    }

    pub fn forward(&self, x: ArrayView1<f64>, activation: &Activation) -> Array1<f64> {
        let z = self.w.dot(&x) + &self.b;
        z.mapv_into(activation.a)
    }

    /// Error handed back to the layer feeding this one, `wᵀ · delta`.
    pub fn backward(&self, delta: &Array1<f64>) -> Array1<f64> {
        self.w.t().dot(delta)
    }

    pub fn update(&mut self, delta: &Array1<f64>, x: ArrayView1<f64>, learning_rate: f64) {
        let grad_w = delta
            .view()
            .insert_axis(Axis(1))
            .dot(&x.insert_axis(Axis(0)));

        self.w.scaled_add(learning_rate, &grad_w);
        self.b.scaled_add(learning_rate, delta);
    }
}
