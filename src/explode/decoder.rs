//! Literal, length and distance decoding and the main expansion loop
//!
//! Compressed data is a sequence of literals and length/distance pairs ended
//! by a length of 519. A single bit before each item tells which follows: 0
//! for a literal, 1 for a length/distance pair. Raw literals and all extra
//! bits are stored without bit reversal.

use super::state::ExplodeState;
use crate::tables::{LEN_BASE, LEN_EXTRA};
use crate::{CompressionMode, DecodeStats, DictionarySize, Result, END_OF_STREAM};
use std::io::{Read, Write};

impl<R: Read> ExplodeState<R> {
    /// Decode one literal byte
    pub fn decode_literal(&mut self, mode: CompressionMode) -> Result<u8> {
        match mode {
            CompressionMode::Binary => Ok(self.bits.bits(8)? as u8),
            CompressionMode::ASCII => Ok(self.tables.literal.decode(&mut self.bits)? as u8),
        }
    }

    /// Decode a copy length, or [`END_OF_STREAM`]
    pub fn decode_length(&mut self) -> Result<usize> {
        let symbol = self.tables.length.decode(&mut self.bits)? as usize;
        let extra = self.bits.bits(LEN_EXTRA[symbol] as u32)?;
        Ok(LEN_BASE[symbol] as usize + extra as usize)
    }

    /// Decode the distance of a copy of length `len`
    ///
    /// Two-byte copies always carry two extra bits; longer ones carry as many
    /// as the dictionary size selector.
    pub fn decode_distance(&mut self, len: usize, dict_size: DictionarySize) -> Result<usize> {
        let extra = if len == 2 { 2 } else { dict_size.bits() as u32 };
        let symbol = self.tables.distance.decode(&mut self.bits)? as usize;
        let low = self.bits.bits(extra)? as usize;
        Ok(((symbol << extra) | low) + 1)
    }

    /// Decode the whole stream into `sink`
    ///
    /// The sink receives a full window whenever it fills and the remainder
    /// once the end code is read. On error nothing past the last full window
    /// is written.
    pub fn run<W: Write>(mut self, sink: &mut W) -> Result<DecodeStats> {
        let header = self.read_header()?;

        loop {
            if self.bits.bit()? == 1 {
                let len = self.decode_length()?;
                if len == END_OF_STREAM {
                    break;
                }
                let dist = self.decode_distance(len, header.dict_size)?;
                self.window.copy(dist, len, sink)?;

                self.stats.match_count += 1;
                self.stats.longest_match = self.stats.longest_match.max(len);
            } else {
                let byte = self.decode_literal(header.mode)?;
                self.window.push(byte, sink)?;

                self.stats.literal_count += 1;
            }
        }

        self.window.finish(sink)?;

        let stats = self.stats();
        log::debug!(
            "End of stream: {} -> {} bytes ({} literals, {} matches)",
            stats.input_bytes,
            stats.output_bytes,
            stats.literal_count,
            stats.match_count
        );
        Ok(stats)
    }
}
