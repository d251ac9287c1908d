use serde::{Deserialize, Serialize};

use crate::activation::Activations;
use crate::error::{NetworkError, Result};
use crate::nn::{Network, Topology};

/// Tunables of the canvas and of the network it trains.
///
/// Missing fields of a JSON document fall back to [`Hyper::new`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Hyper {
    pub learning_rate: f64,
    pub topology: Topology,
    pub activation: Activations,
    /// Online updates per animation tick.
    pub samples_per_tick: usize,
    pub width: usize,
    pub height: usize,
    /// Side, in canvas pixels, of one render grid cell.
    pub stride: usize,
}

impl Default for Hyper {
    fn default() -> Self {
        Hyper::new()
    }
}

impl Hyper {
    pub fn new() -> Hyper {
        Hyper {
            learning_rate: 0.01,
            topology: vec![2, 57, 57, 57, 9],
            activation: Activations::Sigmoid,
            samples_per_tick: 100,
            width: 500,
            height: 500,
            stride: 8,
        }
    }

    pub fn from_json(document: &str) -> Result<Hyper> {
        let hyper: Hyper = serde_json::from_str(document)?;
        hyper.validate()?;
        Ok(hyper)
    }

    /// Canvas pixels are divided by `width` and `height` and grouped by
    /// `stride`, none of which may be zero.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.stride == 0 {
            return Err(NetworkError::InvalidCanvas {
                width: self.width,
                height: self.height,
                stride: self.stride,
            });
        }
        Ok(())
    }

    pub fn set_learning_rate(&mut self, rate: f64) -> &mut Self {
        self.learning_rate = rate;
        self
    }

    pub fn set_topology(&mut self, topology: Topology) -> &mut Self {
        self.topology = topology;
        self
    }

    pub fn set_samples_per_tick(&mut self, samples: usize) -> &mut Self {
        self.samples_per_tick = samples;
        self
    }

    pub fn set_size(&mut self, width: usize, height: usize) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_stride(&mut self, stride: usize) -> &mut Self {
        self.stride = stride;
        self
    }

    pub fn weave(&self) -> Result<Network> {
        Network::new(
            self.topology.clone(),
            self.learning_rate,
            self.activation.wake(),
        )
    }

    pub fn weave_seeded(&self, seed: u64) -> Result<Network> {
        Network::seeded(
            self.topology.clone(),
            self.learning_rate,
            self.activation.wake(),
            seed,
        )
    }
}
