use std::io::Cursor;

use digitnet::{
    train_loop, train_sample, Error, IdxReader, Network, NetworkSpec, TrainConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn image_file(n: i32, rows: i32, cols: i32, pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [2051, n, rows, cols] {
        out.extend_from_slice(&i32::to_be_bytes(v));
    }
    out.extend_from_slice(pixels);
    out
}

fn label_file(n: i32, labels: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [2049, n] {
        out.extend_from_slice(&i32::to_be_bytes(v));
    }
    out.extend_from_slice(labels);
    out
}

fn weights(net: &Network) -> Vec<f64> {
    net.layers
        .iter()
        .flat_map(|l| l.units.iter().flat_map(|u| u.weights().to_vec()))
        .collect()
}

#[test]
fn one_cycle_on_tiny_dataset_moves_weights() {
    let mut reader = IdxReader::new(
        Cursor::new(image_file(2, 1, 1, &[255, 255])),
        Cursor::new(label_file(2, &[0, 1])),
    )
    .unwrap();

    let spec = NetworkSpec::from_pairs(&[(1, 1), (1, 1), (2, 1)]);
    let mut net = Network::new(&spec, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let before = weights(&net);

    for _ in 0..2 {
        let sample = reader.next_sample().unwrap().unwrap();
        assert_eq!(sample.pixels, vec![1.0]);

        let out = net.forward(&sample.pixels).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|o| o.is_finite()));

        let deltas = net.backward(sample.label as usize).unwrap();
        assert!(deltas.layers.iter().flatten().all(|d| d.is_finite()));
        assert!(deltas.errors.iter().all(|e| e.is_finite()));

        net.update(&deltas).unwrap();
    }
    assert!(reader.next_sample().unwrap().is_none());

    let after = weights(&net);
    assert!(after.iter().all(|w| w.is_finite()));
    assert_ne!(before, after);
}

#[test]
fn truncated_images_fail_at_the_short_sample() {
    // Three 2x2 images declared, only two and a half present.
    let pixels: Vec<u8> = (0..10).collect();
    let mut reader = IdxReader::new(
        Cursor::new(image_file(3, 2, 2, &pixels)),
        Cursor::new(label_file(3, &[1, 2, 3])),
    )
    .unwrap();

    assert_eq!(reader.next_sample().unwrap().unwrap().label, 1);
    assert_eq!(reader.next_sample().unwrap().unwrap().label, 2);
    let err = reader.next_sample().unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.is_short_read());
}

#[test]
fn exactly_item_count_samples_then_exhausted() {
    let mut reader = IdxReader::new(
        Cursor::new(image_file(4, 1, 3, &[0; 12])),
        Cursor::new(label_file(4, &[9, 8, 7, 6])),
    )
    .unwrap();

    let mut n = 0;
    while let Some(sample) = reader.next_sample().unwrap() {
        assert_eq!(sample.pixels.len(), 3);
        n += 1;
    }
    assert_eq!(n, 4);
    assert!(reader.next_sample().unwrap().is_none());
    assert!(reader.next_sample().unwrap().is_none());
}

#[test]
fn train_loop_over_reader_respects_cutoff() {
    let n = 20;
    let pixels: Vec<u8> = (0..n * 4).map(|i| (i * 13 % 256) as u8).collect();
    let labels: Vec<u8> = (0..n).map(|i| (i % 3) as u8).collect();
    let reader = IdxReader::new(
        Cursor::new(image_file(n, 2, 2, &pixels)),
        Cursor::new(label_file(n, &labels)),
    )
    .unwrap();

    let spec = NetworkSpec::from_pairs(&[(4, 4), (4, 4), (3, 4)]);
    let mut net = Network::new(&spec, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    let summary = train_loop(&mut net, reader, &TrainConfig::new(Some(15), 5)).unwrap();

    assert_eq!(summary.seen, 15);
    assert_eq!(summary.percent(), Some(100.0));
    assert!(summary.mean_loss.is_finite() && summary.mean_loss >= 0.0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let reader = IdxReader::new(
            Cursor::new(image_file(3, 1, 2, &[10, 200, 0, 255, 128, 64])),
            Cursor::new(label_file(3, &[0, 1, 0])),
        )
        .unwrap();
        let spec = NetworkSpec::from_pairs(&[(3, 2), (2, 3)]);
        let mut net = Network::new(&spec, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        for sample in reader {
            train_sample(&mut net, &sample.unwrap()).unwrap();
        }
        weights(&net)
    };
    assert_eq!(run(), run());
}

#[test]
fn mnist_network_accepts_28x28_sample() {
    let pixels = vec![128u8; 784];
    let mut reader = IdxReader::new(
        Cursor::new(image_file(1, 28, 28, &pixels)),
        Cursor::new(label_file(1, &[4])),
    )
    .unwrap();
    let sample = reader.next_sample().unwrap().unwrap();

    let mut net = Network::new(&NetworkSpec::mnist(), &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
    let stats = train_sample(&mut net, &sample).unwrap();
    assert!(stats.predicted < 10);
    assert!(stats.loss.is_finite());
}
