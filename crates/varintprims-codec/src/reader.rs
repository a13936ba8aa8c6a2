use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use bytes::BytesMut;

use crate::error::{Result, VarintError};
use crate::stream::{decode_buf, StreamConfig};
use crate::zigzag::zigzag_decode_64;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads varints from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete values.
pub struct VarintReader<T> {
    inner: T,
    buf: BytesMut,
    config: StreamConfig,
    consumed: usize,
    values_read: usize,
    failed: bool,
}

impl<T: Read> VarintReader<T> {
    /// Create a new varint reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a new varint reader with explicit configuration.
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            consumed: 0,
            values_read: 0,
            failed: false,
        }
    }

    /// Read the next value (blocking).
    ///
    /// Returns `Ok(None)` when EOF is reached on a value boundary and
    /// `Err(VarintError::TruncatedInput)` when EOF cuts a varint short.
    pub fn read_value(&mut self) -> Result<Option<u64>> {
        loop {
            let before = self.buf.len();
            let decoded = decode_buf(&mut self.buf).map_err(|err| self.rebase(err))?;
            if let Some(value) = decoded {
                self.consumed += before - self.buf.len();
                self.values_read += 1;
                self.config.check_count(self.values_read)?;
                return Ok(Some(value));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(VarintError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                tracing::debug!(offset = self.consumed, "eof inside varint");
                return Err(VarintError::TruncatedInput {
                    offset: self.consumed,
                });
            }

            tracing::trace!(bytes = read, "refilled varint buffer");
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read the next value and undo the ZigZag mapping.
    pub fn read_signed(&mut self) -> Result<Option<i64>> {
        Ok(self.read_value()?.map(zigzag_decode_64))
    }

    /// Read values until EOF.
    pub fn read_all(&mut self) -> Result<Vec<u64>> {
        let mut values = Vec::new();
        while let Some(value) = self.read_value()? {
            values.push(value);
        }
        Ok(values)
    }

    /// Total bytes consumed by the values returned so far.
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the value limit for subsequent reads.
    pub fn set_max_values(&mut self, max_values: Option<usize>) {
        self.config.max_values = max_values;
    }

    /// Current varint reader configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    // Offsets reported by the buffer decoder are relative to the buffer front.
    fn rebase(&self, err: VarintError) -> VarintError {
        match err {
            VarintError::Overflow { offset } => VarintError::Overflow {
                offset: self.consumed + offset,
            },
            other => other,
        }
    }
}

/// Yields values until EOF or the first error, then stops.
impl<T: Read> Iterator for VarintReader<T> {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.read_value().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}

impl<T: Read> FusedIterator for VarintReader<T> {}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::stream::encode_all;
    use crate::zigzag::encode_signed;

    #[test]
    fn read_single_value() {
        let mut reader = VarintReader::new(Cursor::new(vec![0x96u8, 0x01]));

        assert_eq!(reader.read_value().unwrap(), Some(150));
        assert_eq!(reader.read_value().unwrap(), None);
        assert_eq!(reader.bytes_consumed(), 2);
    }

    #[test]
    fn read_multiple_values() {
        let wire = encode_all(&[1, 150, 300, u64::MAX]);
        let mut reader = VarintReader::new(Cursor::new(wire));

        assert_eq!(reader.read_all().unwrap(), vec![1, 150, 300, u64::MAX]);
    }

    #[test]
    fn read_large_stream() {
        let values: Vec<u64> = (0..20_000u64).map(|i| i * 7919).collect();
        let wire = encode_all(&values);
        assert!(wire.len() > READ_CHUNK_SIZE);

        let mut reader = VarintReader::new(Cursor::new(wire));
        assert_eq!(reader.read_all().unwrap(), values);
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: encode_all(&[16384, 0, u64::MAX]),
            pos: 0,
        };
        let reader = VarintReader::new(byte_reader);

        let values: Vec<u64> = reader.map(|v| v.unwrap()).collect();
        assert_eq!(values, vec![16384, 0, u64::MAX]);
    }

    #[test]
    fn empty_stream_is_clean_eof() {
        let mut reader = VarintReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(reader.read_value().unwrap(), None);
    }

    #[test]
    fn eof_mid_varint() {
        let mut reader = VarintReader::new(Cursor::new(vec![0x01u8, 0x96]));

        assert_eq!(reader.read_value().unwrap(), Some(1));
        let err = reader.read_value().unwrap_err();
        assert!(matches!(err, VarintError::TruncatedInput { offset: 1 }));
    }

    #[test]
    fn overflow_in_stream() {
        let mut wire = vec![0x05u8];
        wire.extend_from_slice(&[0xFF; 11]);
        let mut reader = VarintReader::new(Cursor::new(wire));

        assert_eq!(reader.read_value().unwrap(), Some(5));
        let err = reader.read_value().unwrap_err();
        assert!(matches!(err, VarintError::Overflow { offset: 1 }));
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let truncated = VarintReader::new(Cursor::new(vec![0x01u8, 0x80]));
        let items: Vec<Result<u64>> = truncated.take(6).collect();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Ok(1)));
        assert!(matches!(items[1], Err(VarintError::TruncatedInput { offset: 1 })));

        let overflow = VarintReader::new(Cursor::new(vec![0xFFu8; 11]));
        let items: Vec<Result<u64>> = overflow.take(6).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(VarintError::Overflow { offset: 0 })));
    }

    #[test]
    fn skipping_errors_terminates() {
        let reader = VarintReader::new(Cursor::new(vec![0x05u8, 0x80]));
        let values: Vec<u64> = reader.filter_map(|v| v.ok()).collect();
        assert_eq!(values, vec![5]);
    }

    #[test]
    fn value_limit_enforced() {
        let wire = encode_all(&[1, 2, 3]);
        let cfg = StreamConfig::with_max_values(2);
        let mut reader = VarintReader::with_config(Cursor::new(wire), cfg);

        let err = reader.read_all().unwrap_err();
        assert!(matches!(err, VarintError::TooManyValues { max: 2 }));
    }

    #[test]
    fn read_signed_values() {
        let mut wire = encode_signed(-3);
        wire.extend(encode_signed(i64::MIN));
        let mut reader = VarintReader::new(Cursor::new(wire));

        assert_eq!(reader.read_signed().unwrap(), Some(-3));
        assert_eq!(reader.read_signed().unwrap(), Some(i64::MIN));
        assert_eq!(reader.read_signed().unwrap(), None);
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: vec![0xAC, 0x02],
            pos: 0,
        };
        let mut reader = VarintReader::new(reader);
        assert_eq!(reader.read_value().unwrap(), Some(300));
    }

    #[test]
    fn read_error_propagates() {
        let mut reader = VarintReader::new(FailingReader);
        let err = reader.read_value().unwrap_err();
        assert!(matches!(err, VarintError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = VarintReader::new(Cursor::new(Vec::<u8>::new()));

        reader.set_max_values(Some(4));
        assert_eq!(reader.config().max_values, Some(4));
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }
}
