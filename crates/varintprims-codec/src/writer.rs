use std::io::{ErrorKind, Write};

use crate::error::{Result, VarintError};
use crate::varint::encode_to;
use crate::zigzag::zigzag_encode_64;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes varints to any `Write` stream.
pub struct VarintWriter<T> {
    inner: T,
    buf: Vec<u8>,
    written: usize,
}

impl<T: Write> VarintWriter<T> {
    /// Create a new varint writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            written: 0,
        }
    }

    /// Encode and write one value (blocking).
    pub fn write_value(&mut self, value: u64) -> Result<()> {
        self.buf.clear();
        encode_to(value, &mut self.buf);
        self.write_buf()
    }

    /// ZigZag-map, encode and write one signed value.
    pub fn write_signed(&mut self, value: i64) -> Result<()> {
        self.write_value(zigzag_encode_64(value))
    }

    /// Encode every value in order as one concatenated stream, then flush.
    pub fn write_all(&mut self, values: &[u64]) -> Result<()> {
        self.buf.clear();
        for &value in values {
            encode_to(value, &mut self.buf);
        }
        self.write_buf()?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(VarintError::Io(err)),
            }
        }
    }

    /// Total encoded bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn write_buf(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(VarintError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => {
                    offset += n;
                    self.written += n;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(VarintError::Io(err)),
            }
        }
        Ok(())
    }
}
