pub mod network;
pub mod spec;

pub use network::{Deltas, Network};
pub use spec::{LayerSpec, NetworkSpec};
