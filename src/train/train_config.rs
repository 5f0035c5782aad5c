use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::progress::TrainProgress;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `max_samples`    — stop after this many samples even if the dataset has more
/// - `progress_every` — emit a `TrainProgress` every this many samples; `0` disables
/// - `progress_tx`    — optional channel sender for progress values.  If the
///                      receiver is dropped the loop terminates early.
/// - `stop_flag`      — optional atomic flag; when set to `true` from another
///                      thread the loop terminates before the next sample.
pub struct TrainConfig {
    pub max_samples: Option<usize>,
    pub progress_every: usize,
    pub progress_tx: Option<mpsc::Sender<TrainProgress>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Sample cutoff of the classic 60k-image training run.
    pub const DEFAULT_MAX_SAMPLES: usize = 59_902;

    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(max_samples: Option<usize>, progress_every: usize) -> Self {
        TrainConfig {
            max_samples,
            progress_every,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(Some(Self::DEFAULT_MAX_SAMPLES), 1000)
    }
}
