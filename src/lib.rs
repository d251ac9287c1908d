mod activation;
pub mod canvas;
mod error;
pub mod f;
pub mod gesture;
pub mod layers;
pub mod nn;
pub mod optimizers;
pub mod palette;

pub use activation::{dsigmoid, sigmoid, Activation, Activations};
pub use error::{NetworkError, Result};
pub use nn::{Network, Topology, Trace};
pub use optimizers::Hyper;

/// Network input paired with the index of its category.
pub type Sample = (Vec<f64>, usize);
pub type Dataset = Vec<Sample>;
