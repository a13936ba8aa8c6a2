//! `tokio_util` codec for varint streams (requires `async` feature).

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{Result, VarintError};
use crate::stream::{decode_buf, StreamConfig};
use crate::varint::{encode_to, MAX_VARINT_LEN};

/// Decodes a byte stream into `u64` values and encodes values back.
///
/// Use with `FramedRead`, `FramedWrite` or `Framed`.
#[derive(Debug, Clone, Default)]
pub struct VarintCodec {
    config: StreamConfig,
    values_decoded: usize,
    consumed: usize,
}

impl VarintCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: StreamConfig) -> Self {
        Self {
            config,
            values_decoded: 0,
            consumed: 0,
        }
    }

    /// Number of values decoded so far.
    pub fn values_decoded(&self) -> usize {
        self.values_decoded
    }
}

impl Decoder for VarintCodec {
    type Item = u64;
    type Error = VarintError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<u64>> {
        let before = src.len();
        let decoded = decode_buf(src).map_err(|err| match err {
            VarintError::Overflow { offset } => VarintError::Overflow {
                offset: self.consumed + offset,
            },
            other => other,
        })?;
        let Some(value) = decoded else {
            return Ok(None);
        };
        self.consumed += before - src.len();
        self.values_decoded += 1;
        self.config.check_count(self.values_decoded)?;
        Ok(Some(value))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<u64>> {
        match self.decode(src)? {
            Some(value) => Ok(Some(value)),
            None if src.is_empty() => Ok(None),
            None => {
                tracing::debug!(remaining = src.len(), "stream ended inside varint");
                Err(VarintError::TruncatedInput {
                    offset: self.consumed,
                })
            }
        }
    }
}

impl Encoder<u64> for VarintCodec {
    type Error = VarintError;

    fn encode(&mut self, value: u64, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(MAX_VARINT_LEN);
        encode_to(value, dst);
        Ok(())
    }
}
