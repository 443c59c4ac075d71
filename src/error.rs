//! Error handling for decoding and extraction
//!
//! The error type itself lives in [`crate::common`]; this module adds the
//! coarse classification callers use to decide how to report a failed entry.

pub use crate::common::ExtractError;
pub use crate::common::Result;

/// Coarse classification of an [`ExtractError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid stream header field
    Format,
    /// Huffman code not mapped within 16 bits
    InvalidCode,
    /// Back-reference before the start of output
    DistanceTooFar,
    /// The output sink rejected a write
    Output,
    /// Input exhausted (or unreadable) before the end code
    EndOfInput,
    /// Archive structure problem
    Archive,
    /// File-system setup failure
    Io,
}

impl ExtractError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::InvalidCompressionMode(_) | ExtractError::InvalidDictionaryBits(_) => {
                ErrorKind::Format
            }
            ExtractError::InvalidCode => ErrorKind::InvalidCode,
            ExtractError::DistanceTooFar { .. } => ErrorKind::DistanceTooFar,
            ExtractError::Output(_) => ErrorKind::Output,
            ExtractError::UnexpectedEof | ExtractError::Input(_) => ErrorKind::EndOfInput,
            ExtractError::NotAnArchive(_)
            | ExtractError::MalformedToc(_)
            | ExtractError::ExtentOutOfBounds { .. }
            | ExtractError::EntryNotFound(_)
            | ExtractError::UnsafeEntryName(_) => ErrorKind::Archive,
            ExtractError::Io(_) | ExtractError::OutputExists(_) => ErrorKind::Io,
        }
    }

    /// True for errors raised by the stream decoder itself
    pub fn is_decode_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Archive | ErrorKind::Io)
    }
}
