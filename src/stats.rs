//! Running input/output bit counts and the compression ratio derived from them.

/// Bit counters maintained by the encoder.
///
/// `raw_bits` grows once per newly registered symbol, by the length of that
/// symbol's own binary representation (so `'a'`, 97, counts 7 bits). It is
/// not a fixed-width baseline, which makes the ratio an approximation.
/// `output_bits` grows by the length of every path code the encoder emits;
/// the literal symbols that follow NYT codes are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub raw_bits: u64,
    pub output_bits: u64,
}

impl CompressionStats {
    /// `raw_bits / output_bits`; `NaN` when both are zero and infinite when
    /// only the output is empty.
    pub fn ratio(&self) -> f64 {
        self.raw_bits as f64 / self.output_bits as f64
    }

    /// The ratio with two fractional digits.
    pub fn ratio_string(&self) -> String {
        let ratio = self.ratio();
        if ratio.is_nan() {
            "NaN".to_string()
        } else if ratio.is_infinite() {
            "Infinity".to_string()
        } else {
            format!("{ratio:.2}")
        }
    }
}

/// Length of the natural binary representation of `symbol`'s code point.
/// `'\0'` is written as a single `0` bit.
pub fn symbol_bit_length(symbol: char) -> u32 {
    (u32::BITS - u32::from(symbol).leading_zeros()).max(1)
}
