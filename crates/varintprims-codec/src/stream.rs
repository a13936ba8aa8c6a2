use bytes::{Buf, BytesMut};

use crate::error::{Result, VarintError};
use crate::varint::{decode_one, encode_to, encoded_len};

/// Configuration for stream decoding.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Maximum number of values accepted from one stream. Default: unlimited.
    pub max_values: Option<usize>,
}

impl StreamConfig {
    /// Reject streams holding more than `max_values` values.
    pub fn with_max_values(max_values: usize) -> Self {
        Self {
            max_values: Some(max_values),
        }
    }

    /// Fail with [`VarintError::TooManyValues`] once `count` exceeds the limit.
    pub fn check_count(&self, count: usize) -> Result<()> {
        match self.max_values {
            Some(max) if count > max => Err(VarintError::TooManyValues { max }),
            _ => Ok(()),
        }
    }
}

/// Encode a sequence as the direct concatenation of its varints.
///
/// There are no separators or length prefixes; value boundaries are found
/// only by decoding from the start.
pub fn encode_all(values: &[u64]) -> Vec<u8> {
    let len = values.iter().map(|&v| encoded_len(v)).sum();
    let mut out = Vec::with_capacity(len);
    for &value in values {
        encode_to(value, &mut out);
    }
    out
}

/// Decode a concatenated buffer into its values, in order.
///
/// An empty buffer yields an empty vector. The first error is returned and
/// the values decoded before it are discarded; use [`iter`] to keep them.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<u64>> {
    decode_all_with(bytes, &StreamConfig::default())
}

/// Like [`decode_all`], enforcing the limits in `config`.
pub fn decode_all_with(bytes: &[u8], config: &StreamConfig) -> Result<Vec<u64>> {
    let mut values = Vec::new();
    for value in iter(bytes) {
        values.push(value?);
        config.check_count(values.len())?;
    }
    Ok(values)
}

/// Iterate over the values of a concatenated buffer.
///
/// Yields each value as it is decoded. After the first error the iterator
/// is exhausted, so everything yielded before it is the valid prefix.
pub fn iter(bytes: &[u8]) -> DecodeAll<'_> {
    DecodeAll {
        bytes,
        offset: 0,
        failed: false,
    }
}

/// Iterator returned by [`iter`].
#[derive(Debug, Clone)]
pub struct DecodeAll<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl DecodeAll<'_> {
    /// Offset of the next varint to decode.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for DecodeAll<'_> {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }

        match decode_one(self.bytes, self.offset) {
            Ok((value, consumed)) => {
                self.offset += consumed;
                Some(Ok(value))
            }
            Err(err) => {
                tracing::debug!(offset = self.offset, error = %err, "stream decode failed");
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for DecodeAll<'_> {}

/// Decode one varint from the front of a growing buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete varint yet.
/// On success, consumes the varint bytes from the buffer. Overflow is
/// reported as soon as ten bytes are buffered.
pub fn decode_buf(src: &mut BytesMut) -> Result<Option<u64>> {
    match decode_one(&src[..], 0) {
        Ok((value, consumed)) => {
            src.advance(consumed);
            Ok(Some(value))
        }
        Err(VarintError::TruncatedInput { .. }) => Ok(None), // Need more data
        Err(err) => Err(err),
    }
}
