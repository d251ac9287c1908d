mod network;
mod trace;

pub use network::{Network, Topology};
pub use trace::Trace;
