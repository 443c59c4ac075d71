//! Sliding output window
//!
//! Decoded bytes go into a fixed circular buffer which doubles as the history
//! for back-references. Every time it fills, the whole buffer is handed to the
//! sink and writing restarts at the front.

use crate::{ExtractError, Result, WINDOW_SIZE};
use std::io::Write;

/// Output buffer and back-reference history
#[derive(Debug)]
pub struct Window {
    out: Box<[u8; WINDOW_SIZE]>,
    /// Index of the next write location
    next: usize,
    /// Set until the window wraps; distances are checked only while set
    first: bool,
    /// Bytes already handed to the sink
    flushed: u64,
}

impl Window {
    /// Create an empty window
    pub fn new() -> Self {
        Self {
            out: Box::new([0; WINDOW_SIZE]),
            next: 0,
            first: true,
            flushed: 0,
        }
    }

    /// Append one byte
    pub fn push<W: Write>(&mut self, byte: u8, sink: &mut W) -> Result<()> {
        self.out[self.next] = byte;
        self.next += 1;
        if self.next == WINDOW_SIZE {
            self.wrap(sink)?;
        }
        Ok(())
    }

    /// Copy `len` bytes starting `dist` bytes back
    ///
    /// The copy runs forward one byte at a time, so a length greater than the
    /// distance repeats the last `dist` bytes.
    pub fn copy<W: Write>(&mut self, dist: usize, len: usize, sink: &mut W) -> Result<()> {
        if self.first && dist > self.next {
            return Err(ExtractError::DistanceTooFar {
                distance: dist,
                available: self.next,
            });
        }
        debug_assert!(dist >= 1 && dist <= WINDOW_SIZE);

        for _ in 0..len {
            let from = (self.next + WINDOW_SIZE - dist) % WINDOW_SIZE;
            self.out[self.next] = self.out[from];
            self.next += 1;
            if self.next == WINDOW_SIZE {
                self.wrap(sink)?;
            }
        }
        Ok(())
    }

    /// Hand the pending partial window to the sink
    pub fn finish<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        if self.next > 0 {
            self.emit(self.next, sink)?;
            self.next = 0;
        }
        sink.flush().map_err(ExtractError::Output)
    }

    /// Total bytes produced, flushed or not
    pub fn total(&self) -> u64 {
        self.flushed + self.next as u64
    }

    /// Whether the window has not wrapped yet
    pub fn is_first_fill(&self) -> bool {
        self.first
    }

    fn wrap<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        self.emit(WINDOW_SIZE, sink)?;
        self.next = 0;
        self.first = false;
        Ok(())
    }

    fn emit<W: Write>(&mut self, len: usize, sink: &mut W) -> Result<()> {
        log::trace!("Flushing {} bytes from window", len);
        sink.write_all(&self.out[..len]).map_err(ExtractError::Output)?;
        self.flushed += len as u64;
        Ok(())
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that fails after accepting a fixed number of writes
    struct FailingSink {
        writes_left: usize,
        data: Vec<u8>,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.writes_left == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            self.writes_left -= 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_overlapping_copy() {
        let mut window = Window::new();
        let mut sink = Vec::new();
        for &b in b"abcd" {
            window.push(b, &mut sink).unwrap();
        }
        window.copy(4, 12, &mut sink).unwrap();
        window.finish(&mut sink).unwrap();
        assert_eq!(sink, b"abcdabcdabcdabcd");
    }

    #[test]
    fn test_run_of_one_byte() {
        let mut window = Window::new();
        let mut sink = Vec::new();
        window.push(b'z', &mut sink).unwrap();
        window.copy(1, 518, &mut sink).unwrap();
        window.finish(&mut sink).unwrap();
        assert_eq!(sink.len(), 519);
        assert!(sink.iter().all(|&b| b == b'z'));
    }

    #[test]
    fn test_distance_checked_before_wrap() {
        let mut window = Window::new();
        let mut sink = Vec::new();
        window.push(1, &mut sink).unwrap();
        window.push(2, &mut sink).unwrap();
        assert!(matches!(
            window.copy(3, 2, &mut sink),
            Err(ExtractError::DistanceTooFar {
                distance: 3,
                available: 2
            })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_wrap_flushes_and_allows_full_distance() {
        let mut window = Window::new();
        let mut sink = Vec::new();
        for i in 0..WINDOW_SIZE + 10 {
            window.push(i as u8, &mut sink).unwrap();
        }
        assert_eq!(sink.len(), WINDOW_SIZE);
        assert!(!window.is_first_fill());

        // Reaches into the overwritten history of the previous fill
        window.copy(WINDOW_SIZE, 3, &mut sink).unwrap();
        window.finish(&mut sink).unwrap();

        let n = sink.len();
        assert_eq!(n, WINDOW_SIZE + 13);
        assert_eq!(&sink[n - 3..], &sink[n - 3 - WINDOW_SIZE..n - WINDOW_SIZE]);
    }

    #[test]
    fn test_copy_continues_across_wrap() {
        let mut window = Window::new();
        let mut sink = Vec::new();
        for _ in 0..WINDOW_SIZE - 2 {
            window.push(7, &mut sink).unwrap();
        }
        window.push(8, &mut sink).unwrap();
        window.copy(2, 6, &mut sink).unwrap();
        window.finish(&mut sink).unwrap();
        assert_eq!(sink.len(), WINDOW_SIZE + 5);
        assert_eq!(&sink[WINDOW_SIZE - 2..], &[8, 7, 8, 7, 8, 7, 8]);
    }

    #[test]
    fn test_sink_failure() {
        let mut window = Window::new();
        let mut sink = FailingSink {
            writes_left: 0,
            data: Vec::new(),
        };
        let mut result = Ok(());
        for _ in 0..WINDOW_SIZE {
            result = window.push(0, &mut sink);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(ExtractError::Output(_))));
        assert!(sink.data.is_empty());
    }
}
