//! Streaming reader for a pair of IDX binary files (images + labels), as used
//! by MNIST and its derivatives.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   magic       (2051, big-endian i32)
//! bytes  4-7:   N           (number of images, big-endian i32)
//! bytes  8-11:  rows        (image height in pixels, big-endian i32)
//! bytes 12-15:  cols        (image width in pixels, big-endian i32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   magic       (2049, big-endian i32)
//! bytes  4-7:   N           (number of labels, big-endian i32)
//! bytes  8..:   N bytes, one label each
//! ```
//!
//! Headers are checked eagerly in [`IdxReader::new`]; pixel and label bytes
//! are pulled one sample at a time, so a truncated file fails exactly at the
//! sample where its data runs out.
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub const IMAGE_MAGIC: i32 = 2051;
pub const LABEL_MAGIC: i32 = 2049;

/// One decoded training example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// `rows * cols` pixels, row-major, each `byte / 255.0`.
    pub pixels: Vec<f64>,
    pub label: u8,
}

/// Forward-only reader over an image source and a label source, advanced in
/// lock-step.
pub struct IdxReader<I, L> {
    images: I,
    labels: L,
    n_items: usize,
    rows: usize,
    cols: usize,
    n_pixels: usize,
    next_item: usize,
    buf: Vec<u8>,
}

impl IdxReader<BufReader<File>, BufReader<File>> {
    /// Opens both files from disk and validates their headers.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(images: P, labels: Q) -> Result<Self> {
        let images = BufReader::new(File::open(images)?);
        let labels = BufReader::new(File::open(labels)?);
        IdxReader::new(images, labels)
    }
}

impl<I: Read, L: Read> IdxReader<I, L> {
    pub fn new(mut images: I, mut labels: L) -> Result<Self> {
        let magic = read_be_i32(&mut images, "image magic")?;
        if magic != IMAGE_MAGIC {
            return Err(Error::Format(format!(
                "image file magic number mismatch: expected {}, got {}",
                IMAGE_MAGIC, magic
            )));
        }

        let magic = read_be_i32(&mut labels, "label magic")?;
        if magic != LABEL_MAGIC {
            return Err(Error::Format(format!(
                "label file magic number mismatch: expected {}, got {}",
                LABEL_MAGIC, magic
            )));
        }

        let image_count = read_be_i32(&mut images, "image count")?;
        let label_count = read_be_i32(&mut labels, "label count")?;
        if image_count != label_count {
            return Err(Error::Format(format!(
                "image file declares {} items but label file declares {}",
                image_count, label_count
            )));
        }
        let n_items = usize::try_from(image_count).map_err(|_| {
            Error::Format(format!("negative item count {}", image_count))
        })?;

        let rows = read_be_i32(&mut images, "row count")?;
        let cols = read_be_i32(&mut images, "column count")?;
        if rows <= 0 || cols <= 0 {
            return Err(Error::Format(format!(
                "invalid image dimensions {}x{}",
                rows, cols
            )));
        }
        let (rows, cols) = (rows as usize, cols as usize);
        let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
            Error::Format(format!("rows * cols overflows usize (rows={}, cols={})", rows, cols))
        })?;

        debug!(items = n_items, rows, cols, "opened IDX dataset");

        Ok(IdxReader {
            images,
            labels,
            n_items,
            rows,
            cols,
            n_pixels,
            next_item: 0,
            buf: Vec::new(),
        })
    }

    /// Reads the next sample, or `Ok(None)` once the declared item count has
    /// been consumed. Exhaustion is sticky: no further reads are attempted.
    pub fn next_sample(&mut self) -> Result<Option<Sample>> {
        if self.next_item >= self.n_items {
            return Ok(None);
        }

        // Grows with the bytes actually present, so a huge declared size
        // on a short file surfaces as a short read, not an allocation failure.
        self.buf.clear();
        let what = format!("pixel data of image {}", self.next_item);
        let got = (&mut self.images)
            .take(self.n_pixels as u64)
            .read_to_end(&mut self.buf)
            .map_err(|e| with_context(e, &what))?;
        if got < self.n_pixels {
            return Err(with_context(
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("expected {} bytes, got {}", self.n_pixels, got),
                ),
                &what,
            ));
        }
        let pixels = self.buf.iter().map(|&px| normalize(px)).collect();

        let mut label = [0u8; 1];
        self.labels.read_exact(&mut label).map_err(|e| {
            with_context(e, &format!("label {}", self.next_item))
        })?;

        self.next_item += 1;
        Ok(Some(Sample { pixels, label: label[0] }))
    }

    /// Number of items declared by the headers.
    pub fn len(&self) -> usize {
        self.n_items
    }

    pub fn is_empty(&self) -> bool {
        self.n_items == 0
    }

    /// Items not yet read.
    pub fn remaining(&self) -> usize {
        self.n_items - self.next_item
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Yields `Err` at most once: after a failed read the reader is treated as
/// exhausted.
impl<I: Read, L: Read> Iterator for IdxReader<I, L> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_sample() {
            Ok(sample) => sample.map(Ok),
            Err(e) => {
                self.next_item = self.n_items;
                Some(Err(e))
            }
        }
    }
}

/// Maps a raw pixel byte into `[0.0, 1.0]`.
pub fn normalize(byte: u8) -> f64 {
    byte as f64 / 255.0
}

fn read_be_i32<R: Read>(source: &mut R, what: &str) -> Result<i32> {
    let mut buf4 = [0u8; 4];
    source.read_exact(&mut buf4).map_err(|e| with_context(e, what))?;
    Ok(i32::from_be_bytes(buf4))
}

fn with_context(e: io::Error, what: &str) -> Error {
    Error::Io(io::Error::new(e.kind(), format!("failed to read {}: {}", what, e)))
}
