//! Path codes read off the adaptive Huffman tree.

use bitvec::prelude::*;
use std::fmt;

/// A root-to-node path: `0` for every left turn, `1` for every right turn.
///
/// The root's code is empty. Codes are plain in-memory values; rendering
/// them with [`fmt::Display`] gives the `'0'`/`'1'` string the encoder emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code(BitVec<u8, Msb0>);

impl Code {
    /// Creates an empty code.
    pub fn new() -> Self {
        Code(BitVec::new())
    }

    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends one turn; `true` is a right turn.
    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Reverses the code in place. Code derivation collects turns leaf-first.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Iterates the turns from the root downward.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().by_vals()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for Code {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Code(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_code() {
        let code = Code::new();
        assert!(code.is_empty());
        assert_eq!(code.to_string(), "");
    }

    #[test]
    fn test_push_and_reverse() {
        let mut code = Code::new();
        // Leaf-first turns: right, left, left
        code.push(true);
        code.push(false);
        code.push(false);
        code.reverse();
        assert_eq!(code.len(), 3);
        assert_eq!(code.to_string(), "001");
        assert_eq!(code.bits().collect::<Vec<_>>(), vec![false, false, true]);
    }

    #[test]
    fn test_from_iterator() {
        let code: Code = [true, true, false].into_iter().collect();
        assert_eq!(code.to_string(), "110");
        assert_eq!(code.as_bitslice().count_ones(), 2);
    }
}
