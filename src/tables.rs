//! Fixed code tables for the PKWare DCL format
//!
//! The compact length lists pack a repeat count minus one in the high nibble
//! and a code length in the low nibble. The length base and extra bit tables
//! are format constants and must not be re-derived.

use crate::explode::{CodeStatus, HuffmanTable};
use std::sync::OnceLock;

/// Number of symbols in the literal alphabet
pub const LITERAL_SYMBOLS: usize = 256;

/// Number of symbols in the length alphabet
pub const LENGTH_SYMBOLS: usize = 16;

/// Number of symbols in the distance alphabet
pub const DISTANCE_SYMBOLS: usize = 64;

/// Compact code lengths of the literal alphabet
pub const LITERAL_LENGTHS: [u8; 98] = [
    11, 124, 8, 7, 28, 7, 188, 13, 76, 4, 10, 8, 12, 10, 12, 10, 8, 23, 8, 9, 7, 6, 7, 8, 7, 6,
    55, 8, 23, 24, 12, 11, 7, 9, 11, 12, 6, 7, 22, 5, 7, 24, 6, 11, 9, 6, 7, 22, 7, 11, 38, 7, 9,
    8, 25, 11, 8, 11, 9, 12, 8, 12, 5, 38, 5, 38, 5, 11, 7, 5, 6, 21, 6, 10, 53, 8, 7, 24, 10, 27,
    44, 253, 253, 253, 252, 252, 252, 13, 12, 45, 12, 45, 12, 61, 12, 45, 44, 173,
];

/// Compact code lengths of the length alphabet
pub const LENGTH_LENGTHS: [u8; 6] = [2, 35, 36, 53, 38, 23];

/// Compact code lengths of the distance alphabet
pub const DISTANCE_LENGTHS: [u8; 7] = [2, 20, 53, 230, 247, 151, 248];

/// Base copy length for each length symbol
pub const LEN_BASE: [u16; LENGTH_SYMBOLS] = [
    3, 2, 4, 5, 6, 7, 8, 9, 10, 12, 16, 24, 40, 72, 136, 264,
];

/// Extra raw bits following each length symbol
pub const LEN_EXTRA: [u8; LENGTH_SYMBOLS] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];

/// The three fixed decode tables, shared read-only by every session
#[derive(Debug)]
pub struct FixedTables {
    /// Literal table, used when literals are coded
    pub literal: HuffmanTable,
    /// Length table
    pub length: HuffmanTable,
    /// Distance table
    pub distance: HuffmanTable,
}

impl FixedTables {
    fn build() -> Self {
        let (literal, lit_status) = HuffmanTable::construct(&LITERAL_LENGTHS, LITERAL_SYMBOLS);
        let (length, len_status) = HuffmanTable::construct(&LENGTH_LENGTHS, LENGTH_SYMBOLS);
        let (distance, dist_status) = HuffmanTable::construct(&DISTANCE_LENGTHS, DISTANCE_SYMBOLS);

        debug_assert_eq!(lit_status, CodeStatus::Complete);
        debug_assert_eq!(len_status, CodeStatus::Complete);
        debug_assert_eq!(dist_status, CodeStatus::Complete);
        log::trace!("Built fixed literal, length and distance tables");

        Self {
            literal,
            length,
            distance,
        }
    }
}

/// Get the fixed tables, building them on first use
pub fn fixed_tables() -> &'static FixedTables {
    static TABLES: OnceLock<FixedTables> = OnceLock::new();
    TABLES.get_or_init(FixedTables::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expanded_len(compact: &[u8]) -> usize {
        compact.iter().map(|&b| (b >> 4) as usize + 1).sum()
    }

    #[test]
    fn test_compact_lists_cover_alphabets() {
        assert_eq!(expanded_len(&LITERAL_LENGTHS), LITERAL_SYMBOLS);
        assert_eq!(expanded_len(&LENGTH_LENGTHS), LENGTH_SYMBOLS);
        assert_eq!(expanded_len(&DISTANCE_LENGTHS), DISTANCE_SYMBOLS);
    }

    #[test]
    fn test_fixed_codes_are_complete() {
        for (compact, n) in [
            (&LITERAL_LENGTHS[..], LITERAL_SYMBOLS),
            (&LENGTH_LENGTHS[..], LENGTH_SYMBOLS),
            (&DISTANCE_LENGTHS[..], DISTANCE_SYMBOLS),
        ] {
            let (_, status) = HuffmanTable::construct(compact, n);
            assert_eq!(status, CodeStatus::Complete);
        }
    }

    #[test]
    fn test_longest_length_is_end_marker() {
        let max = LEN_BASE[15] as usize + (1 << LEN_EXTRA[15]) - 1;
        assert_eq!(max, crate::END_OF_STREAM);
    }

    #[test]
    fn test_fixed_tables_shared() {
        let a = fixed_tables() as *const FixedTables;
        let b = fixed_tables() as *const FixedTables;
        assert_eq!(a, b);
        assert_eq!(fixed_tables().literal.max_length(), 13);
        assert_eq!(fixed_tables().length.max_length(), 7);
        assert_eq!(fixed_tables().distance.max_length(), 8);
    }
}
