use thiserror::Error;

/// Errors produced by the adaptive Huffman encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The alphabet size is zero, or too large for the node id range.
    #[error("invalid alphabet size {0}: must be positive and 2 * size must fit in usize")]
    InvalidAlphabetSize(usize),

    /// An unseen symbol arrived after every slot of the alphabet was taken.
    #[error("alphabet of {alphabet_size} symbols is exhausted, cannot add {symbol:?}")]
    AlphabetExhausted { symbol: char, alphabet_size: usize },
}

/// Result type for encoder operations
pub type Result<T> = std::result::Result<T, Error>;
