//! Trains the digit classifier on an IDX image/label pair.
//!
//! Run with:
//!   cargo run --release -- --images data/train-images-idx3-ubyte \
//!       --labels data/train-labels-idx1-ubyte --seed 1

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use digitnet::{train_loop, DeltaRule, IdxReader, Network, NetworkSpec, TrainConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "digitnet")]
#[command(about = "Online momentum training of a handwritten-digit MLP", long_about = None)]
struct Cli {
    /// IDX3 image file
    #[arg(long, default_value = "data/train-images-idx3-ubyte")]
    images: String,

    /// IDX1 label file
    #[arg(long, default_value = "data/train-labels-idx1-ubyte")]
    labels: String,

    /// Seed for weight initialization; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many samples (0 trains on the whole file)
    #[arg(long, default_value_t = TrainConfig::DEFAULT_MAX_SAMPLES)]
    max_samples: usize,

    /// Log progress every N samples (0 disables)
    #[arg(long, default_value = "1000")]
    progress_every: usize,

    /// JSON topology file; defaults to 784-16-16-10
    #[arg(long)]
    topology: Option<String>,

    /// Use the a(1-a) sigmoid derivative instead of the classic delta rule
    #[arg(long)]
    textbook_deltas: bool,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut spec = match &cli.topology {
        Some(path) => NetworkSpec::load_json(path)
            .with_context(|| format!("loading topology from {}", path))?,
        None => NetworkSpec::mnist(),
    };
    if cli.textbook_deltas {
        spec.delta_rule = DeltaRule::Textbook;
    }

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut network = Network::new(&spec, &mut rng)?;

    let reader = IdxReader::open(&cli.images, &cli.labels)
        .with_context(|| format!("opening dataset {} / {}", cli.images, cli.labels))?;
    info!(
        items = reader.len(),
        rows = reader.rows(),
        cols = reader.cols(),
        layers = spec.layers.len(),
        "starting training"
    );

    let max_samples = (cli.max_samples > 0).then_some(cli.max_samples);
    let config = TrainConfig::new(max_samples, cli.progress_every);
    let summary = train_loop(&mut network, reader, &config)?;

    println!(
        "trained on {} samples: mean loss {:.6}, accuracy {:.2}%",
        summary.seen,
        summary.mean_loss,
        summary.accuracy * 100.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_log_level() {
        let cli = Cli::try_parse_from(["digitnet", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["digitnet", "--log-level", "verbose"]).is_err());
    }

    #[test]
    fn log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["digitnet"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
    }
}
