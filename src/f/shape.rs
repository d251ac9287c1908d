use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;

use crate::error::{NetworkError, Result};

/// Index of the largest component, `0` for an empty or unordered vector.
pub fn argmax(d: ArrayView1<f64>) -> usize {
    d.argmax().unwrap_or(0)
}

pub fn onehot(label: usize, size: usize) -> Result<Array1<f64>> {
    if label >= size {
        return Err(NetworkError::InvalidLabel {
            label,
            categories: size,
        });
    }

    let mut oh = Array1::zeros(size);
    oh[label] = 1.;
    Ok(oh)
}
