pub mod loss;
pub mod shape;

pub use loss::*;
pub use shape::*;
