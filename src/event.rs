//! Change notifications for tree observers.
//!
//! An encoder publishes three kinds of [`Event`]: a free-form `Log` line for
//! every tree mutation, an `Encode` event for every emitted fragment, and one
//! `Update` per completed `encode` call telling renderers to re-read the tree.
//! Delivery is best-effort. Nothing an observer does can change the encoder.

use std::sync::mpsc::Sender;

/// A notification raised by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Diagnostic trace of a tree mutation.
    Log(String),
    /// A fragment of encoder output: path code bits, possibly followed by a
    /// literal symbol.
    Encode(String),
    /// The tree changed; re-read it through `AdaptiveHuffman::root`.
    Update,
}

/// Receives encoder events.
pub trait Observer: Send {
    fn notify(&mut self, event: &Event);
}

impl<F> Observer for F
where
    F: FnMut(&Event) + Send,
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

impl Observer for Sender<Event> {
    fn notify(&mut self, event: &Event) {
        // A hung-up receiver just stops listening.
        let _ = self.send(event.clone());
    }
}
