use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info};

use crate::data::idx::Sample;
use crate::error::Result;
use crate::network::network::Network;
use crate::train::progress::TrainProgress;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_sample;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online, one sample at a time, and returns statistics for
/// the whole run.
///
/// # Arguments
/// - `network` — mutable reference to the network; modified in place
/// - `samples` — any source of samples, typically an `IdxReader`
/// - `config`  — cutoff, progress interval, optional channel and stop flag
///
/// # Termination
/// The loop ends when:
/// - `samples` is exhausted, **or**
/// - `config.max_samples` samples have been trained on, **or**
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// The first failing read or training step aborts the run with its error.
pub fn train_loop<S>(network: &mut Network, samples: S, config: &TrainConfig) -> Result<TrainProgress>
where
    S: IntoIterator<Item = Result<Sample>>,
{
    let t_start = Instant::now();
    let mut seen = 0usize;
    let mut loss_sum = 0.0;
    let mut correct = 0usize;
    let mut last_label = None;

    let mut samples = samples.into_iter();
    loop {
        // Checked before pulling so the cutoff never reads past itself.
        if config.max_samples.is_some_and(|max| seen >= max) || stop_requested(config) {
            break;
        }
        let Some(sample) = samples.next() else {
            break;
        };

        let sample = sample?;
        let stats = train_sample(network, &sample)?;
        seen += 1;
        loss_sum += stats.loss;
        if stats.correct {
            correct += 1;
        }
        last_label = Some(sample.label);

        if config.progress_every > 0 && seen % config.progress_every == 0 {
            let progress = snapshot(seen, loss_sum, correct, config);
            match progress.percent() {
                Some(pct) => info!(
                    seen,
                    mean_loss = progress.mean_loss,
                    accuracy = progress.accuracy,
                    "training progress: {}/{} ({:.0}%)",
                    seen,
                    progress.limit.unwrap_or(seen),
                    pct
                ),
                None => info!(
                    seen,
                    mean_loss = progress.mean_loss,
                    accuracy = progress.accuracy,
                    "training progress: {} samples",
                    seen
                ),
            }

            if let Some(ref tx) = config.progress_tx {
                // If the receiver has been dropped, stop training.
                if tx.send(progress).is_err() {
                    break;
                }
            }
        }
    }

    if let Some(label) = last_label {
        report_last_output(network, label);
    }

    let summary = snapshot(seen, loss_sum, correct, config);
    info!(
        seen = summary.seen,
        mean_loss = summary.mean_loss,
        accuracy = summary.accuracy,
        elapsed_ms = t_start.elapsed().as_millis() as u64,
        "training finished"
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn snapshot(seen: usize, loss_sum: f64, correct: usize, config: &TrainConfig) -> TrainProgress {
    let (mean_loss, accuracy) = if seen == 0 {
        (0.0, 0.0)
    } else {
        (loss_sum / seen as f64, correct as f64 / seen as f64)
    };
    TrainProgress { seen, limit: config.max_samples, mean_loss, accuracy }
}

/// Dumps the per-unit outputs of the final forward pass along with each
/// unit's squared error.
fn report_last_output(network: &Network, label: u8) {
    debug!(expecting = label, "network results");
    for (digit, &out) in network.output().iter().enumerate() {
        let target = if digit == label as usize { 1.0 } else { 0.0 };
        let err = out - target;
        debug!(digit, output = out, sq_err = err * err, "output unit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::NetworkSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn samples(n: usize) -> Vec<Result<Sample>> {
        (0..n)
            .map(|i| Ok(Sample { pixels: vec![(i % 3) as f64 / 2.0, 1.0], label: (i % 2) as u8 }))
            .collect()
    }

    fn net() -> Network {
        let spec = NetworkSpec::from_pairs(&[(3, 2), (2, 3)]);
        Network::new(&spec, &mut ChaCha8Rng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn runs_until_exhausted() {
        let mut network = net();
        let summary = train_loop(&mut network, samples(7), &TrainConfig::new(None, 0)).unwrap();
        assert_eq!(summary.seen, 7);
        assert!(summary.mean_loss.is_finite());
        assert!((0.0..=1.0).contains(&summary.accuracy));
    }

    #[test]
    fn honours_sample_cutoff() {
        let mut network = net();
        let summary = train_loop(&mut network, samples(10), &TrainConfig::new(Some(4), 0)).unwrap();
        assert_eq!(summary.seen, 4);
        assert_eq!(summary.limit, Some(4));
    }

    #[test]
    fn sends_progress_on_interval() {
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(None, 2);
        config.progress_tx = Some(tx);
        let mut network = net();
        train_loop(&mut network, samples(5), &config).unwrap();
        drop(config);
        let seen: Vec<usize> = rx.iter().map(|p| p.seen).collect();
        assert_eq!(seen, vec![2, 4]);
    }

    #[test]
    fn stop_flag_halts_before_first_sample() {
        let mut config = TrainConfig::new(None, 0);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let mut network = net();
        let summary = train_loop(&mut network, samples(5), &config).unwrap();
        assert_eq!(summary.seen, 0);
    }

    #[test]
    fn read_error_aborts() {
        let mut input = samples(2);
        input.insert(1, Err(crate::error::Error::Format("bad".to_owned())));
        let mut network = net();
        assert!(train_loop(&mut network, input, &TrainConfig::new(None, 0)).is_err());
    }
}
