//! Common types and constants for the PKWare DCL explode decoder
//!
//! This module defines the header types, the shared error type and the fixed
//! format constants used by the decoder and the archive layer.

use thiserror::Error;

/// Literal coding mode stored in the first header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Literals are stored as raw 8-bit values
    Binary = 0,
    /// Literals are Huffman coded with the fixed literal table
    ASCII = 1,
}

impl CompressionMode {
    /// Create a CompressionMode from a raw header byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CompressionMode::Binary),
            1 => Ok(CompressionMode::ASCII),
            _ => Err(ExtractError::InvalidCompressionMode(value)),
        }
    }
}

/// Dictionary size selected by the second header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionarySize {
    /// 1024 bytes (1KB) dictionary
    Size1K = 1024,
    /// 2048 bytes (2KB) dictionary
    Size2K = 2048,
    /// 4096 bytes (4KB) dictionary
    Size4K = 4096,
}

impl DictionarySize {
    /// Number of extra distance bits, which is also the raw header value
    pub fn bits(&self) -> u8 {
        match self {
            DictionarySize::Size1K => 4, // 2^10 = 1024, 10-6=4
            DictionarySize::Size2K => 5, // 2^11 = 2048, 11-6=5
            DictionarySize::Size4K => 6, // 2^12 = 4096, 12-6=6
        }
    }

    /// Create a DictionarySize from the header selector
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            4 => Ok(DictionarySize::Size1K),
            5 => Ok(DictionarySize::Size2K),
            6 => Ok(DictionarySize::Size4K),
            _ => Err(ExtractError::InvalidDictionaryBits(bits)),
        }
    }

    /// Largest back-reference distance this dictionary can express
    pub fn max_distance(&self) -> usize {
        *self as usize
    }
}

/// Parsed two-byte stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionHeader {
    /// Literal coding mode
    pub mode: CompressionMode,
    /// Dictionary size
    pub dict_size: DictionarySize,
}

impl CompressionHeader {
    /// Validate the two raw header bytes
    pub fn from_bytes(mode: u8, dict_bits: u8) -> Result<Self> {
        Ok(Self {
            mode: CompressionMode::from_u8(mode)?,
            dict_size: DictionarySize::from_bits(dict_bits)?,
        })
    }
}

/// Error type for decoding and extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid literal coding flag in the stream header
    #[error("Invalid compression mode: {0} (expected 0 or 1)")]
    InvalidCompressionMode(u8),

    /// Invalid dictionary size selector in the stream header
    #[error("Invalid dictionary bits: {0} (expected 4, 5, or 6)")]
    InvalidDictionaryBits(u8),

    /// No code of up to 16 bits matched the Huffman table
    #[error("Invalid Huffman code in compressed stream")]
    InvalidCode,

    /// Back-reference before the start of the output
    #[error("Distance {distance} too far back (only {available} bytes written)")]
    DistanceTooFar {
        /// Decoded distance
        distance: usize,
        /// Bytes emitted so far
        available: usize,
    },

    /// Input ended before the end-of-stream code
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// Reading compressed input failed
    #[error("Input error: {0}")]
    Input(#[source] std::io::Error),

    /// The output sink rejected a write
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),

    /// Archive signature mismatch
    #[error("Not an InstallShield 3 archive (signature {0:08X})")]
    NotAnArchive(u32),

    /// Directory or file record inconsistent with its declared size
    #[error("Malformed table of contents: {0}")]
    MalformedToc(String),

    /// Entry data does not fit inside the archive
    #[error("Entry '{name}' extent {offset}+{length} exceeds archive size {archive_len}")]
    ExtentOutOfBounds {
        /// Entry name
        name: String,
        /// Absolute data offset
        offset: u64,
        /// Compressed length
        length: u64,
        /// Total archive length
        archive_len: u64,
    },

    /// No entry with the requested name
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Output file already present and overwriting not requested
    #[error("Output file {} already exists (overwrite not enabled)", .0.display())]
    OutputExists(std::path::PathBuf),

    /// Entry name that cannot be used as a file name
    #[error("Refusing to extract unsafe entry name: {0:?}")]
    UnsafeEntryName(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decoding and extraction
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Longest Huffman code in any of the fixed alphabets
pub const MAX_BITS: usize = 16;

/// Sliding window size, the largest distance reachable with selector 6
pub const WINDOW_SIZE: usize = 4096;

/// Raw length value reserved as the end-of-stream marker
pub const END_OF_STREAM: usize = 519;

/// Size of the decoder's input chunk buffer
pub const IN_BUFF_SIZE: usize = 0x800;

/// Statistics for a decode session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Number of literal bytes decoded
    pub literal_count: usize,
    /// Number of back-references decoded
    pub match_count: usize,
    /// Longest back-reference
    pub longest_match: usize,
    /// Compressed bytes consumed, including the header
    pub input_bytes: u64,
    /// Decompressed bytes produced
    pub output_bytes: u64,
}

impl DecodeStats {
    /// Compressed size as a percentage of decompressed size
    pub fn ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            0.0
        } else {
            (self.input_bytes as f64 / self.output_bytes as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_mode() {
        assert_eq!(
            CompressionMode::from_u8(0).unwrap(),
            CompressionMode::Binary
        );
        assert_eq!(CompressionMode::from_u8(1).unwrap(), CompressionMode::ASCII);
        assert!(matches!(
            CompressionMode::from_u8(2),
            Err(ExtractError::InvalidCompressionMode(2))
        ));
    }

    #[test]
    fn test_dictionary_size() {
        assert_eq!(DictionarySize::Size1K.bits(), 4);
        assert_eq!(DictionarySize::Size2K.bits(), 5);
        assert_eq!(DictionarySize::Size4K.bits(), 6);

        assert_eq!(
            DictionarySize::from_bits(4).unwrap(),
            DictionarySize::Size1K
        );
        assert_eq!(
            DictionarySize::from_bits(6).unwrap(),
            DictionarySize::Size4K
        );
        assert!(DictionarySize::from_bits(3).is_err());
        assert!(DictionarySize::from_bits(7).is_err());

        assert_eq!(DictionarySize::Size4K.max_distance(), WINDOW_SIZE);
    }

    #[test]
    fn test_header() {
        let header = CompressionHeader::from_bytes(1, 5).unwrap();
        assert_eq!(header.mode, CompressionMode::ASCII);
        assert_eq!(header.dict_size, DictionarySize::Size2K);
        assert!(CompressionHeader::from_bytes(0, 0).is_err());
    }

    #[test]
    fn test_window_covers_largest_distance() {
        // distance symbol 63 with six extra bits all set
        assert_eq!(((63usize << 6) | 63) + 1, WINDOW_SIZE);
    }
}
