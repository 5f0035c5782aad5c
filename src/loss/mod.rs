pub mod mse;

pub use mse::{argmax, one_hot, MseLoss};
