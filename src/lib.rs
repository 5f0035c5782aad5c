pub mod error;
pub mod data;
pub mod activation;
pub mod neuron;
pub mod optim;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use data::idx::{IdxReader, Sample};
pub use activation::activation::{sigmoid, DeltaRule};
pub use neuron::unit::Unit;
pub use optim::momentum::Momentum;
pub use layers::dense::Layer;
pub use network::network::{Deltas, Network};
pub use network::spec::{LayerSpec, NetworkSpec};
pub use train::{train_loop, train_sample, TrainConfig, TrainProgress};
