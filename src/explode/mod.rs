//! PKWare DCL explode (decompression)
//!
//! The decoder reads a two-byte header followed by a bit stream of literals
//! and length/distance pairs, expanding them through a 4 KB sliding window.
//! Input comes from any [`Read`] and output goes to any [`Write`]; the working
//! set stays the same regardless of stream size.

mod bits;
mod decoder;
mod huffman;
mod state;
mod window;

pub use bits::BitReader;
pub use huffman::{CodeStatus, HuffmanTable, MAX_SYMBOLS};
pub use state::ExplodeState;
pub use window::Window;

use crate::{DecodeStats, Result};
use std::io::{Read, Write};

/// Decompress one stream from `reader` into `writer`
pub fn explode<R: Read, W: Write>(reader: R, writer: &mut W) -> Result<DecodeStats> {
    ExplodeState::new(reader).run(writer)
}

/// Convenience function to decompress data in memory
pub fn explode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    explode(data, &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompressionMode, DictionarySize, ExtractError};

    const AIAIA: [u8; 8] = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f];

    #[test]
    fn test_reference_example() {
        assert_eq!(explode_bytes(&AIAIA).unwrap(), b"AIAIAIAIAIAIA");
    }

    #[test]
    fn test_stats() {
        let mut out = Vec::new();
        let stats = explode(&AIAIA[..], &mut out).unwrap();
        assert_eq!(stats.literal_count, 2);
        assert_eq!(stats.match_count, 1);
        assert_eq!(stats.longest_match, 11);
        assert_eq!(stats.input_bytes, 8);
        assert_eq!(stats.output_bytes, 13);
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(
            explode_bytes(&[0x02, 0x04]),
            Err(ExtractError::InvalidCompressionMode(2))
        ));
        assert!(matches!(
            explode_bytes(&[0x00, 0x07]),
            Err(ExtractError::InvalidDictionaryBits(7))
        ));
        assert!(matches!(
            explode_bytes(&[0x00]),
            Err(ExtractError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_read_header() {
        let mut state = ExplodeState::new(&[0x01u8, 0x06][..]);
        let header = state.read_header().unwrap();
        assert_eq!(header.mode, CompressionMode::ASCII);
        assert_eq!(header.dict_size, DictionarySize::Size4K);
        assert_eq!(state.header(), Some(header));
    }

    #[test]
    fn test_truncated_stream() {
        for cut in 2..AIAIA.len() {
            let result = explode_bytes(&AIAIA[..cut]);
            assert!(
                matches!(result, Err(ExtractError::UnexpectedEof)),
                "cut at {cut}: {result:?}"
            );
        }
    }
}
