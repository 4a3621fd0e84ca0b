//! Adaptive (one-pass) Huffman coding.
//!
//! [`AdaptiveHuffman`] encodes a stream one `char` at a time, growing and
//! rebalancing its code tree as it goes, so no frequency pass over the input
//! is needed. Renderers read the tree through [`AdaptiveHuffman::root`] and
//! follow changes through an [`Observer`].

pub mod code;
pub mod encoder;
pub mod error;
pub mod event;
pub mod stats;
pub mod tree;

pub use code::Code;
pub use encoder::AdaptiveHuffman;
pub use error::{Error, Result};
pub use event::{Event, Observer};
pub use stats::CompressionStats;
pub use tree::{NodeRef, Nodes, Tree};
