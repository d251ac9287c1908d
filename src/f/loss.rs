use ndarray::{Array1, ArrayView1};

/// Mean of the squared componentwise error between a prediction and its target.
pub fn mse(pred: ArrayView1<f64>, target: ArrayView1<f64>) -> f64 {
    let diff: Array1<f64> = &target - &pred;
    diff.mapv_into(|x| x.powi(2)).mean().unwrap_or(0.)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mse_averages_squared_differences() {
        let pred = array![0.5, 0.5, 0.];
        let target = array![1., 0., 0.];
        assert_eq!(mse(pred.view(), target.view()), 0.5 / 3.);
    }

    #[test]
    fn mse_of_a_perfect_prediction_is_zero() {
        let y = array![0.2, 0.8];
        assert_eq!(mse(y.view(), y.view()), 0.);
    }
}
