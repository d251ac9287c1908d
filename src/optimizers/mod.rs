mod hyper;
mod online;

pub use hyper::Hyper;
pub use online::OnlineGradientDescent;
