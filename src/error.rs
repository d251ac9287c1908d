use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("topology needs at least 2 layer sizes, all non-zero, got {0:?}")]
    InvalidTopology(Vec<usize>),

    #[error("learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("{what} has length {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("backward pass requested without a pending forward pass")]
    MissingForward,

    #[error("label {label} is outside of 0..{categories}")]
    InvalidLabel { label: usize, categories: usize },

    #[error("canvas of {width}x{height} with stride {stride} has an empty side")]
    InvalidCanvas {
        width: usize,
        height: usize,
        stride: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
