//! Test helpers: a minimal PKWare DCL stream writer
//!
//! The writer emits literals and back-references exactly as the format
//! stores them, using the fixed canonical codes. It makes no attempt to find
//! matches; callers decide what to emit.

#![allow(dead_code)]

use isextract::explode::HuffmanTable;
use isextract::tables::{fixed_tables, LEN_BASE, LEN_EXTRA};
use isextract::{CompressionMode, DictionarySize, END_OF_STREAM};

/// Bit-level stream writer
#[derive(Debug)]
pub struct StreamBuilder {
    mode: CompressionMode,
    dict_size: DictionarySize,
    out: Vec<u8>,
    bit_buff: u32,
    bit_count: u32,
}

impl StreamBuilder {
    /// Start a stream with the given header
    pub fn new(mode: CompressionMode, dict_size: DictionarySize) -> Self {
        Self {
            mode,
            dict_size,
            out: vec![mode as u8, dict_size.bits()],
            bit_buff: 0,
            bit_count: 0,
        }
    }

    /// Append `count` bits of `value`, least significant first
    pub fn put_bits(&mut self, value: u32, count: u32) {
        for i in 0..count {
            self.bit_buff |= ((value >> i) & 1) << self.bit_count;
            self.bit_count += 1;
            if self.bit_count == 8 {
                self.out.push(self.bit_buff as u8);
                self.bit_buff = 0;
                self.bit_count = 0;
            }
        }
    }

    /// Append the code of `symbol` in `table`
    pub fn put_code(&mut self, table: &HuffmanTable, symbol: u16) {
        let (code, len) = code_for(table, symbol);
        // Most significant bit first, each bit inverted
        for i in (0..len).rev() {
            self.put_bits(((code >> i) & 1) ^ 1, 1);
        }
    }

    /// Append a literal byte
    pub fn literal(&mut self, byte: u8) -> &mut Self {
        self.put_bits(0, 1);
        match self.mode {
            CompressionMode::Binary => self.put_bits(byte as u32, 8),
            CompressionMode::ASCII => self.put_code(&fixed_tables().literal, byte as u16),
        }
        self
    }

    /// Append literal bytes
    pub fn literals(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.literal(b);
        }
        self
    }

    /// Append a raw length value (2..=519) without a distance
    fn put_length(&mut self, len: usize) {
        let symbol = (0..16)
            .rev()
            .find(|&s| {
                let base = LEN_BASE[s] as usize;
                len >= base && len < base + (1 << LEN_EXTRA[s])
            })
            .expect("length out of range");
        self.put_bits(1, 1);
        self.put_code(&fixed_tables().length, symbol as u16);
        self.put_bits((len - LEN_BASE[symbol] as usize) as u32, LEN_EXTRA[symbol] as u32);
    }

    /// Append a back-reference of `len` bytes (2..=518) from `dist` bytes back
    pub fn copy(&mut self, dist: usize, len: usize) -> &mut Self {
        assert!((2..END_OF_STREAM).contains(&len));
        self.put_length(len);

        let extra = if len == 2 { 2 } else { self.dict_size.bits() as u32 };
        let d = dist - 1;
        assert!(d >> extra < 64, "distance {dist} not encodable");
        self.put_code(&fixed_tables().distance, (d >> extra) as u16);
        self.put_bits((d & ((1 << extra) - 1)) as u32, extra);
        self
    }

    /// Append the end code and return the stream bytes
    pub fn finish(&mut self) -> Vec<u8> {
        self.put_length(END_OF_STREAM);
        let mut out = std::mem::take(&mut self.out);
        if self.bit_count > 0 {
            out.push(self.bit_buff as u8);
            self.bit_buff = 0;
            self.bit_count = 0;
        }
        out
    }

    /// Current stream bytes without an end code, padding the last byte
    pub fn unfinished(&self) -> Vec<u8> {
        let mut out = self.out.clone();
        if self.bit_count > 0 {
            out.push(self.bit_buff as u8);
        }
        out
    }
}

/// Canonical code and length of `symbol`
pub fn code_for(table: &HuffmanTable, symbol: u16) -> (u32, u32) {
    let counts = table.counts();
    let symbols = table.symbols();
    let mut first = 0u32;
    let mut index = 0usize;
    for len in 1..counts.len() {
        let count = counts[len] as usize;
        if let Some(pos) = symbols[index..index + count].iter().position(|&s| s == symbol) {
            return (first + pos as u32, len as u32);
        }
        index += count;
        first = (first + count as u32) << 1;
    }
    panic!("symbol {symbol} has no code");
}

/// Encode `data` greedily, finding repeats within the window
///
/// Slow and simple; only meant to produce valid streams for tests.
pub fn encode(data: &[u8], mode: CompressionMode, dict_size: DictionarySize) -> Vec<u8> {
    let mut builder = StreamBuilder::new(mode, dict_size);
    let max_dist = dict_size.max_distance();
    let mut pos = 0;
    while pos < data.len() {
        let mut best_len = 0;
        let mut best_dist = 0;
        for dist in 1..=pos.min(max_dist) {
            let cand = pos - dist;
            let mut len = 0;
            while len < END_OF_STREAM - 1
                && pos + len < data.len()
                && data[cand + len] == data[pos + len]
            {
                len += 1;
            }
            let usable = if len == 2 { dist <= 256 } else { len >= 3 };
            if usable && len > best_len {
                best_len = len;
                best_dist = dist;
            }
            if best_len == END_OF_STREAM - 1 {
                break;
            }
        }
        if best_len >= 2 {
            builder.copy(best_dist, best_len);
            pos += best_len;
        } else {
            builder.literal(data[pos]);
            pos += 1;
        }
    }
    builder.finish()
}
