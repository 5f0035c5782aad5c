use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A read from an underlying stream failed or came up short.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic number, item-count mismatch or non-positive image dimensions.
    #[error("invalid dataset format: {0}")]
    Format(String),

    /// A unit was handed fewer inputs than its declared arity.
    #[error("wrong input size: unit expects {expected} inputs, got {actual}")]
    Size { expected: usize, actual: usize },

    /// The layer chain of a `NetworkSpec` does not line up.
    #[error("invalid topology: {0}")]
    Topology(String),

    /// Backward or update was requested before any forward pass.
    #[error("no forward pass has been run on this network")]
    NoForwardPass,

    /// A topology file could not be (de)serialized.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// True for truncated input, i.e. the dataset ended before its header said it would.
    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}
