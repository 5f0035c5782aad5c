pub mod idx;

pub use idx::{IdxReader, Sample};
