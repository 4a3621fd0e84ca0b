//! One-pass adaptive Huffman encoder (FGK style).
//!
//! The encoder starts from a tree holding only the NYT leaf and grows it one
//! symbol at a time. A symbol seen for the first time is sent as the NYT path
//! code followed by the literal symbol, and a new leaf is hung under the old
//! NYT. A repeated symbol is sent as the path code of its leaf. After either,
//! the leaf's weight and its ancestors' weights go up by one, and nodes trade
//! places with the highest-id member of their weight block so that
//! higher-numbered nodes never weigh less than lower-numbered ones.
//!
//! # Example
//! ```
//! use adaptive_huffman::AdaptiveHuffman;
//!
//! let mut encoder = AdaptiveHuffman::new(4).unwrap();
//! assert_eq!(encoder.encode('a'), "a");
//! assert_eq!(encoder.encode('a'), "1");
//! assert_eq!(encoder.encode('b'), "0b");
//! assert_eq!(encoder.encode('b'), "01");
//! assert_eq!(encoder.root().weight(), 4);
//! assert_eq!(encoder.compression_ratio(), "3.50");
//! ```

use crate::code::Code;
use crate::error::{Error, Result};
use crate::event::{Event, Observer};
use crate::stats::{symbol_bit_length, CompressionStats};
use crate::tree::{NodeRef, Nodes, Tree};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};


/// Adaptive Huffman encoder over an alphabet of at most `alphabet_size`
/// distinct `char`s.
pub struct AdaptiveHuffman {
    alphabet_size: usize,
    tree: Tree,
    /// Symbols seen so far, with the bit length recorded on first sight.
    /// The raw-bit counter is charged from this record.
    symbols: HashMap<char, u32>,
    /// Set once an unseen symbol arrives after the alphabet filled up.
    full: bool,
    stats: CompressionStats,
    observer: Option<Box<dyn Observer>>,
    /// Events raised by the current call, delivered once the tree is consistent.
    pending: Vec<Event>,
}

impl AdaptiveHuffman {
    /// Creates an encoder for at most `alphabet_size` distinct symbols.
    ///
    /// The root gets id `2 * alphabet_size`, which must fit in a `usize`.
    pub fn new(alphabet_size: usize) -> Result<Self> {
        let root_id = alphabet_size
            .checked_mul(2)
            .filter(|_| alphabet_size > 0)
            .ok_or(Error::InvalidAlphabetSize(alphabet_size))?;

        log::debug!(
            "Initializing Adaptive Huffman encoder with alphabet size of {alphabet_size}"
        );
        Ok(AdaptiveHuffman {
            alphabet_size,
            tree: Tree::new(root_id),
            symbols: HashMap::new(),
            full: false,
            stats: CompressionStats::default(),
            observer: None,
            pending: Vec::new(),
        })
    }

    /// Creates an encoder that reports to `observer`, starting with a `Log`
    /// event announcing the alphabet size.
    pub fn with_observer<O>(alphabet_size: usize, observer: O) -> Result<Self>
    where
        O: Observer + 'static,
    {
        let mut encoder = Self::new(alphabet_size)?;
        encoder.set_observer(observer);
        encoder.deliver(&[Event::Log(format!(
            "Initializing Adaptive Huffman encoder with alphabet size of {alphabet_size}"
        ))]);
        Ok(encoder)
    }

    /// Attaches `observer`, replacing any previous one.
    pub fn set_observer<O: Observer + 'static>(&mut self, observer: O) {
        self.observer = Some(Box::new(observer));
    }

    /// Detaches and returns the current observer.
    pub fn take_observer(&mut self) -> Option<Box<dyn Observer>> {
        self.observer.take()
    }

    /// Encodes one symbol and returns what was emitted for it.
    ///
    /// A first occurrence yields the NYT path code followed by the symbol
    /// itself (just the symbol for the very first one). A repeat yields the
    /// path code of the symbol's leaf. An unseen symbol arriving once the
    /// alphabet is exhausted yields an empty string and changes nothing; see
    /// [`AdaptiveHuffman::is_full`] and [`AdaptiveHuffman::try_encode`].
    pub fn encode(&mut self, symbol: char) -> String {
        let output = self.update(symbol);
        self.publish();
        output.unwrap_or_default()
    }

    /// Like [`AdaptiveHuffman::encode`], but reports exhaustion as an error.
    pub fn try_encode(&mut self, symbol: char) -> Result<String> {
        let output = self.update(symbol);
        self.publish();
        output.ok_or(Error::AlphabetExhausted {
            symbol,
            alphabet_size: self.alphabet_size,
        })
    }

    /// Applies one symbol to the tree. `None` when the symbol was rejected.
    fn update(&mut self, symbol: char) -> Option<String> {
        let mut output = String::new();

        let leaf = if self.symbols.contains_key(&symbol) {
            let leaf = self.leaf(symbol);
            self.trace(format!("Symbol {symbol} is already in the tree ( {leaf} )"));
            self.promote_leaf(leaf);

            let leaf = self.leaf(symbol);
            let code = self.path_code(leaf);
            self.stats.output_bits += code.len() as u64;
            output.push_str(&code.to_string());
            leaf
        } else {
            self.trace(format!("Symbol {symbol} not in tree yet"));
            if self.symbols.len() >= self.alphabet_size {
                self.full = true;
                log::warn!(
                    "alphabet of {} symbols is full, dropping {symbol:?}",
                    self.alphabet_size
                );
                self.pending.push(Event::Log(
                    "ERROR: No more symbols can be added to the tree.".to_string(),
                ));
                self.tree.refresh_weights();
                return None;
            }

            let first = self.symbols.is_empty();
            let nyt_code = self.path_code(self.tree.nyt_id());
            let leaf = self.insert(symbol);

            // Nothing precedes the first symbol: the decoder has no tree yet.
            if !first {
                self.stats.output_bits += nyt_code.len() as u64;
                output.push_str(&nyt_code.to_string());
            }
            output.push(symbol);
            leaf
        };
        self.pending.push(Event::Encode(output.clone()));

        self.increment(leaf);
        self.trace("Fixing Huffman tree properties".to_string());
        let mut node = leaf;
        while let Some(parent) = self.tree.parent(node) {
            node = parent;
            if let Some(highest) = self.tree.highest_in_block(self.tree.weight(node)) {
                if highest > node && self.can_swap(node, highest) {
                    self.swap(node, highest);
                    node = highest;
                }
            }
            self.increment(node);
        }

        self.tree.refresh_weights();
        Some(output)
    }

    /// Registers `symbol` and hangs its leaf under the NYT node.
    fn insert(&mut self, symbol: char) -> usize {
        let bits = *self
            .symbols
            .entry(symbol)
            .or_insert_with(|| symbol_bit_length(symbol));
        self.stats.raw_bits += u64::from(bits);

        let (nyt, leaf) = self.tree.split_nyt(symbol);
        self.trace(format!("New node created ( id: {leaf} symbol: {symbol} )"));
        self.trace(format!("New node created ( id: {nyt} )"));
        leaf
    }

    /// Moves a repeated symbol's leaf to the top of its weight block.
    fn promote_leaf(&mut self, leaf: usize) {
        if let Some(highest) = self.tree.highest_in_block(self.tree.weight(leaf)) {
            if highest != leaf && self.can_swap(leaf, highest) {
                self.swap(leaf, highest);
            }
        }
    }

    /// Two nodes may trade places unless one sits above the other. The root
    /// is an ancestor of everything, so it never moves.
    fn can_swap(&self, a: usize, b: usize) -> bool {
        a != b && !self.tree.is_ancestor(a, b) && !self.tree.is_ancestor(b, a)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.tree.swap(a, b);
        self.trace(format!("Swapped node {a} with {b}"));
    }

    fn increment(&mut self, id: usize) {
        self.tree.increment(id);
        log::trace!("node {id} weight -> {}", self.tree.weight(id));
        self.pending.push(Event::Log(format!("Increasing weight of node {id}")));
    }

    fn leaf(&self, symbol: char) -> usize {
        match self.tree.leaf_of(symbol) {
            Some(id) => id,
            None => unreachable!("registered symbol {symbol:?} has no leaf"),
        }
    }

    fn path_code(&self, id: usize) -> Code {
        match self.tree.code_of(id) {
            Some(code) => code,
            None => unreachable!("node {id} is not in the tree"),
        }
    }

    fn trace(&mut self, message: String) {
        log::debug!("{message}");
        self.pending.push(Event::Log(message));
    }

    /// Closes the current call with an `Update` and hands every pending event
    /// to the observer. A panicking observer loses the rest of the batch.
    fn publish(&mut self) {
        self.pending.push(Event::Update);
        let events = std::mem::take(&mut self.pending);
        self.deliver(&events);
    }

    fn deliver(&mut self, events: &[Event]) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        for event in events {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.notify(event)));
            if delivered.is_err() {
                log::warn!("observer panicked, dropping remaining events");
                break;
            }
        }
    }

    /// Read-only view of the root, for renderers.
    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    /// Read-only view of the NYT leaf.
    pub fn nyt(&self) -> NodeRef<'_> {
        self.tree.nyt()
    }

    pub fn node(&self, id: usize) -> Option<NodeRef<'_>> {
        self.tree.node(id)
    }

    /// Every node in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        self.tree.nodes()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Path code of node `id` in the current tree.
    pub fn code_of(&self, id: usize) -> Option<Code> {
        self.tree.code_of(id)
    }

    /// Raw input bits over emitted code bits, with two fractional digits.
    /// `"NaN"` before anything was counted, `"Infinity"` before the first
    /// code bit was emitted.
    pub fn compression_ratio(&self) -> String {
        self.stats.ratio_string()
    }

    pub fn stats(&self) -> CompressionStats {
        self.stats
    }

    /// True once an unseen symbol was turned away for lack of room.
    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Number of distinct symbols encoded so far.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl fmt::Debug for AdaptiveHuffman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveHuffman")
            .field("alphabet_size", &self.alphabet_size)
            .field("tree", &self.tree)
            .field("symbols", &self.symbols)
            .field("full", &self.full)
            .field("stats", &self.stats)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
