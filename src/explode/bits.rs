//! Bit input for the explode decoder
//!
//! Bits are stored in bytes from the least significant bit upward, so new
//! bytes are appended to the top of the bit buffer and bits are dropped from
//! the bottom.

use crate::{ExtractError, Result, IN_BUFF_SIZE};
use std::io::{ErrorKind, Read};

/// LSB-first bit reader over any input source
#[derive(Debug)]
pub struct BitReader<R: Read> {
    reader: R,
    /// Bit buffer
    bit_buff: u32,
    /// Number of valid bits in the bit buffer, always 0..=7 between calls
    bit_count: u32,
    /// Input chunk buffer
    in_buff: Box<[u8; IN_BUFF_SIZE]>,
    /// Next unread position in the chunk buffer
    in_pos: usize,
    /// Number of valid bytes in the chunk buffer
    in_bytes: usize,
    /// Bytes moved from the chunk buffer into the bit buffer
    consumed: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new bit reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bit_buff: 0,
            bit_count: 0,
            in_buff: Box::new([0; IN_BUFF_SIZE]),
            in_pos: 0,
            in_bytes: 0,
            consumed: 0,
        }
    }

    /// Take `need` bits (0..=16) from the stream
    pub fn bits(&mut self, need: u32) -> Result<u32> {
        debug_assert!(need <= 16);

        let mut val = self.bit_buff;
        while self.bit_count < need {
            val |= (self.next_byte()? as u32) << self.bit_count;
            self.bit_count += 8;
        }

        self.bit_buff = val >> need;
        self.bit_count -= need;

        Ok(val & ((1 << need) - 1))
    }

    /// Take a single bit
    #[inline]
    pub fn bit(&mut self) -> Result<u32> {
        self.bits(1)
    }

    /// Number of compressed bytes consumed so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Number of bytes read from the source but not yet consumed
    pub fn buffered(&self) -> usize {
        self.in_bytes - self.in_pos
    }

    /// Give back the underlying source
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.in_pos >= self.in_bytes {
            self.refill()?;
        }
        let byte = self.in_buff[self.in_pos];
        self.in_pos += 1;
        self.consumed += 1;
        Ok(byte)
    }

    fn refill(&mut self) -> Result<()> {
        loop {
            match self.reader.read(&mut self.in_buff[..]) {
                Ok(0) => return Err(ExtractError::UnexpectedEof),
                Ok(n) => {
                    self.in_pos = 0;
                    self.in_bytes = n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ExtractError::Input(e)),
            }
        }
    }
}
