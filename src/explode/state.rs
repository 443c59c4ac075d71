//! Decompression session state
//!
//! One session owns the bit reader and the output window for a single stream.
//! The fixed decode tables are shared and never mutated.

use super::{BitReader, Window};
use crate::tables::{fixed_tables, FixedTables};
use crate::{CompressionHeader, DecodeStats, Result};
use std::io::Read;

/// State of one explode session
#[derive(Debug)]
pub struct ExplodeState<R: Read> {
    /// Bit input
    pub(super) bits: BitReader<R>,
    /// Output window
    pub(super) window: Window,
    /// Fixed literal, length and distance tables
    pub(super) tables: &'static FixedTables,
    /// Header, once read
    pub(super) header: Option<CompressionHeader>,
    /// Running statistics
    pub(super) stats: DecodeStats,
}

impl<R: Read> ExplodeState<R> {
    /// Create a session reading compressed data from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            bits: BitReader::new(reader),
            window: Window::new(),
            tables: fixed_tables(),
            header: None,
            stats: DecodeStats::default(),
        }
    }

    /// Read and validate the two header bytes
    pub fn read_header(&mut self) -> Result<CompressionHeader> {
        if let Some(header) = self.header {
            return Ok(header);
        }

        let mode = self.bits.bits(8)? as u8;
        let dict_bits = self.bits.bits(8)? as u8;
        let header = CompressionHeader::from_bytes(mode, dict_bits)?;
        log::debug!(
            "Stream header: mode={:?}, dictionary={:?}",
            header.mode,
            header.dict_size
        );

        self.header = Some(header);
        Ok(header)
    }

    /// Header of the stream, if already read
    pub fn header(&self) -> Option<CompressionHeader> {
        self.header
    }

    /// Statistics so far
    pub fn stats(&self) -> DecodeStats {
        DecodeStats {
            input_bytes: self.bits.consumed(),
            output_bytes: self.window.total(),
            ..self.stats.clone()
        }
    }

    /// Give back the compressed data source
    pub fn into_inner(self) -> R {
        self.bits.into_inner()
    }
}
