//! Checked big-endian reads and fixed-width writes over byte buffers.

use byteorder::{BigEndian, ByteOrder};

use crate::error::PofError;

/// Bounds-checked reader over a borrowed buffer. Short reads surface as
/// `PofError::TruncatedInput` instead of panicking.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf: buf, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume and return the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], PofError> {
        if self.remaining() < n {
            return Err(PofError::TruncatedInput {
                needed: n,
                available: self.remaining(),
            });
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    /// Consume `n` padding bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<(), PofError> {
        self.take(n).map(|_| ())
    }

    /// Consume everything left in the buffer.
    pub fn rest(&mut self) -> &'a [u8] {
        let s = &self.buf[self.pos..];
        self.pos = self.buf.len();
        s
    }

    pub fn read_u8(&mut self) -> Result<u8, PofError> {
        self.take(1).map(|s| s[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, PofError> {
        self.take(2).map(BigEndian::read_u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, PofError> {
        self.take(4).map(BigEndian::read_u32)
    }

    pub fn read_i32(&mut self) -> Result<i32, PofError> {
        self.take(4).map(BigEndian::read_i32)
    }

    pub fn read_u64(&mut self) -> Result<u64, PofError> {
        self.take(8).map(BigEndian::read_u64)
    }
}

/// Append `n` zero bytes.
pub fn write_zero(bytes: &mut Vec<u8>, n: usize) {
    bytes.resize(bytes.len() + n, 0);
}

/// Append exactly `n` bytes from `src`, truncating an oversize source and
/// zero-padding a short one.
pub fn write_fixed(bytes: &mut Vec<u8>, src: &[u8], n: usize) {
    if src.len() >= n {
        bytes.extend_from_slice(&src[..n]);
    } else {
        bytes.extend_from_slice(src);
        write_zero(bytes, n - src.len());
    }
}
