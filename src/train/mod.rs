pub mod trainer;
pub mod progress;
pub mod train_config;
pub mod loop_fn;

pub use trainer::{train_sample, SampleStats};
pub use progress::TrainProgress;
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
