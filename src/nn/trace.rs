use ndarray::{Array1, ArrayView1};

/// Everything one forward pass produced: the input it was fed and the output
/// of every layer, in order.
///
/// A trace is what backpropagation consumes. Holding one explicitly, instead
/// of relying on the activations cached inside the layers, lets a caller run
/// any number of forward passes before deciding which one to learn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub(crate) x: Array1<f64>,
    pub(crate) activations: Vec<Array1<f64>>,
}

impl Trace {
    pub fn input(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn activations(&self) -> &[Array1<f64>] {
        &self.activations
    }

    pub fn output(&self) -> Option<&Array1<f64>> {
        self.activations.last()
    }

    pub fn into_output(mut self) -> Array1<f64> {
        self.activations.pop().unwrap_or_default()
    }

    /// Vector fed into layer `l`.
    pub(crate) fn layer_input(&self, l: usize) -> ArrayView1<'_, f64> {
        match l {
            0 => self.x.view(),
            _ => self.activations[l - 1].view(),
        }
    }
}
