//! Canonical Huffman tables
//!
//! A table is described by one code length per symbol. Codes of equal length
//! are consecutive integers and shorter codes precede longer ones, so only the
//! number of codes per length and the symbols sorted by length are stored.
//!
//! The codes as stored in the stream are bit-inverted relative to that
//! ordering: the first code of the shortest length is all ones and the last
//! code of the longest length is all zeros. Decoding inverts each bit as it is
//! pulled so plain integer comparisons work.

use super::BitReader;
use crate::{ExtractError, Result, MAX_BITS};
use std::io::Read;

/// Largest alphabet a table can hold
pub const MAX_SYMBOLS: usize = 256;

/// Result of validating a set of code lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStatus {
    /// Every bit pattern of sufficient length maps to a symbol
    Complete,
    /// Some codes are unused; carries the number of unused codes at length 16
    Incomplete(u32),
    /// More codes than fit; carries the (negative) remaining count. Unusable.
    OverSubscribed(i32),
    /// A length above 15, or more than [`MAX_SYMBOLS`] symbols. Unusable.
    InvalidLengths,
}

impl CodeStatus {
    /// Whether a table with this status may be used for decoding
    pub fn is_usable(&self) -> bool {
        !matches!(
            self,
            CodeStatus::OverSubscribed(_) | CodeStatus::InvalidLengths
        )
    }
}

/// Decode table for one alphabet
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Number of codes of each length, index 0 counts unused symbols
    count: [u16; MAX_BITS + 1],
    /// Symbols ordered by code length, then by symbol value
    symbol: Vec<u16>,
}

impl HuffmanTable {
    /// Build a table from compact run-length code lengths
    ///
    /// Each byte of `compact` holds a repeat count minus one in its high
    /// nibble and a code length in its low nibble. Expansion stops at
    /// `symbols` entries; symbols past the end of the list get length zero.
    pub fn construct(compact: &[u8], symbols: usize) -> (Self, CodeStatus) {
        let symbols = symbols.min(MAX_SYMBOLS);

        let mut length = [0u8; MAX_SYMBOLS];
        let mut n = 0;
        'expand: for &rep in compact {
            for _ in 0..=(rep >> 4) {
                if n == symbols {
                    break 'expand;
                }
                length[n] = rep & 0x0F;
                n += 1;
            }
        }
        Self::from_lengths(&length[..symbols])
    }

    /// Build a table from one code length (0..=15) per symbol
    ///
    /// Out of range input yields an empty table and
    /// [`CodeStatus::InvalidLengths`].
    pub fn from_lengths(length: &[u8]) -> (Self, CodeStatus) {
        let mut count = [0u16; MAX_BITS + 1];
        if length.len() > MAX_SYMBOLS || length.iter().any(|&len| len as usize >= MAX_BITS) {
            let empty = Self {
                count,
                symbol: Vec::new(),
            };
            return (empty, CodeStatus::InvalidLengths);
        }

        for &len in length {
            count[len as usize] += 1;
        }

        let mut table = Self {
            count,
            symbol: Vec::new(),
        };

        // No codes at all: complete, but decode() will always fail
        if count[0] as usize == length.len() {
            return (table, CodeStatus::Complete);
        }

        let mut left: i32 = 1;
        for len in 1..=MAX_BITS {
            left <<= 1;
            left -= count[len] as i32;
            if left < 0 {
                return (table, CodeStatus::OverSubscribed(left));
            }
        }

        let mut offs = [0usize; MAX_BITS + 1];
        for len in 1..MAX_BITS {
            offs[len + 1] = offs[len] + count[len] as usize;
        }

        let coded = length.len() - count[0] as usize;
        table.symbol = vec![0; coded];
        for (sym, &len) in length.iter().enumerate() {
            if len != 0 {
                table.symbol[offs[len as usize]] = sym as u16;
                offs[len as usize] += 1;
            }
        }

        let status = if left == 0 {
            CodeStatus::Complete
        } else {
            CodeStatus::Incomplete(left as u32)
        };
        (table, status)
    }

    /// Decode one symbol from the bit stream
    pub fn decode<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        let mut code: u32 = 0; // bits decoded so far
        let mut first: u32 = 0; // first code of the current length
        let mut index: usize = 0; // index of the first code of the current length

        for len in 1..=MAX_BITS {
            code |= bits.bit()? ^ 1;
            let count = self.count[len] as u32;
            if code < first + count {
                return Ok(self.symbol[index + (code - first) as usize]);
            }
            index += count as usize;
            first += count;
            first <<= 1;
            code <<= 1;
        }

        Err(ExtractError::InvalidCode)
    }

    /// Number of codes of each length, index 0 being unused symbols
    pub fn counts(&self) -> &[u16; MAX_BITS + 1] {
        &self.count
    }

    /// Coded symbols sorted by code length
    pub fn symbols(&self) -> &[u16] {
        &self.symbol
    }

    /// Length of the longest code, 0 for an empty table
    pub fn max_length(&self) -> usize {
        (1..=MAX_BITS).rev().find(|&len| self.count[len] != 0).unwrap_or(0)
    }
}
