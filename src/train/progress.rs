use serde::{Deserialize, Serialize};

/// Running training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, one value is
/// sent every `progress_every` samples; `train_loop` also returns one for the
/// whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainProgress {
    /// Samples trained on so far.
    pub seen: usize,
    /// Sample cutoff for this run, if any.
    pub limit: Option<usize>,
    /// Mean squared error over all samples seen so far.
    pub mean_loss: f64,
    /// Fraction of samples seen so far whose argmax matched the label.
    pub accuracy: f64,
}

impl TrainProgress {
    /// Percentage of the cutoff reached, when one is set.
    pub fn percent(&self) -> Option<f64> {
        self.limit
            .filter(|&l| l > 0)
            .map(|l| 100.0 * self.seen as f64 / l as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_limit() {
        let p = TrainProgress { seen: 25, limit: Some(100), mean_loss: 0.0, accuracy: 0.0 };
        assert_eq!(p.percent(), Some(25.0));
        let p = TrainProgress { limit: None, ..p };
        assert_eq!(p.percent(), None);
    }
}
