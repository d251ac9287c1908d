use serde::{Deserialize, Serialize};

pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// Derivative of [`sigmoid`] expressed in its output `y = sigmoid(x)`.
pub fn dsigmoid(y: f64) -> f64 {
    y * (1. - y)
}

/// Elementwise activation shared by every layer of a network, paired with its
/// derivative.
///
/// `d` is evaluated on the already activated value, not on the weighted sum,
/// so only functions whose derivative has a closed form in their own output
/// can be plugged in here. Backpropagation relies on that contract.
#[derive(Debug, Clone, Copy)]
pub struct Activation {
    pub a: fn(f64) -> f64,
    pub d: fn(f64) -> f64,
}

impl Activation {
    pub fn new(a: fn(f64) -> f64, d: fn(f64) -> f64) -> Activation {
        Activation { a, d }
    }

    pub fn sigmoid() -> Activation {
        Activation::new(sigmoid, dsigmoid)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activations {
    #[default]
    Sigmoid,
}

impl Activations {
    pub fn wake(&self) -> Activation {
        match self {
            Activations::Sigmoid => Activation::sigmoid(),
        }
    }
}
