//! isextract - InstallShield 3 archive extraction with a PKWare DCL decoder
//!
//! This crate provides a pure Rust decoder for the PKWare Data Compression
//! Library "implode" format (the decompressor is often called "explode" or
//! "blast"), and a reader for the InstallShield 3 archives that store their
//! files in that format.
//!
//! # Features
//!
//! - Raw (binary) and Huffman coded (ASCII) literals
//! - Dictionary sizes: 1KB, 2KB, and 4KB
//! - Streaming through a fixed 4 KB window via `Read`/`Write`
//! - InstallShield 3 table of contents parsing and bulk extraction
//!
//! # Example - Decompression
//!
//! ```
//! use isextract::explode_bytes;
//!
//! let compressed = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f];
//! let decompressed = explode_bytes(&compressed)?;
//! assert_eq!(decompressed, b"AIAIAIAIAIAIA");
//! # Ok::<(), isextract::ExtractError>(())
//! ```
//!
//! # Example - Archive extraction
//!
//! ```no_run
//! use isextract::{Archive, ExtractOptions};
//!
//! let archive = Archive::open("DATA.Z")?;
//! for entry in archive.entries() {
//!     println!("{} ({} bytes)", entry.name, entry.uncompressed_size);
//! }
//! let report = archive.extract_all("out", &ExtractOptions::default())?;
//! println!("{} extracted, {} failed", report.extracted.len(), report.failed.len());
//! # Ok::<(), isextract::ExtractError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod archive;
pub mod common;
pub mod error;
pub mod explode;
pub mod tables;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_extract;

// Re-export commonly used types
pub use archive::{Archive, Entry, ExtractOptions, ExtractReport};
pub use common::{
    CompressionHeader, CompressionMode, DecodeStats, DictionarySize, ExtractError, Result,
    END_OF_STREAM, IN_BUFF_SIZE, MAX_BITS, WINDOW_SIZE,
};
pub use error::ErrorKind;
pub use explode::{explode, explode_bytes, ExplodeState};

#[cfg(feature = "async")]
pub use async_extract::AsyncBatchExtractor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _ = CompressionMode::Binary;
        let _ = DictionarySize::Size2K;
        let _ = ExtractOptions::default();

        let data = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f];
        assert_eq!(explode_bytes(&data).unwrap(), b"AIAIAIAIAIAIA");
        assert!(matches!(
            explode_bytes(&data[..5]),
            Err(ExtractError::UnexpectedEof)
        ));
    }
}
