use bytes::BufMut;

use crate::error::{Result, VarintError};

/// Longest encoding of a `u64`: 64 bits in 7-bit groups rounds up to 10.
pub const MAX_VARINT_LEN: usize = 10;

/// Bit 7 of every byte: set means more bytes follow.
pub const CONTINUATION_BIT: u8 = 0x80;

/// Bits 0-6 of every byte carry one group of the value.
pub const PAYLOAD_MASK: u8 = 0x7F;

/// Encode a value into the base-128 wire format.
///
/// Wire format (least-significant group first):
/// ```text
/// ┌───────────────┬───────────────┬─────┬───────────────┐
/// │ 1 ggggggg     │ 1 ggggggg     │ ... │ 0 ggggggg     │
/// │ bits 0-6      │ bits 7-13     │     │ last group    │
/// └───────────────┴───────────────┴─────┴───────────────┘
/// ```
///
/// Zero encodes as the single byte `0x00`.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_to(value, &mut out);
    out
}

/// Append the encoding of `value` to `dst`, returning the number of bytes written.
pub fn encode_to<B: BufMut>(mut value: u64, dst: &mut B) -> usize {
    let mut written = 0usize;
    loop {
        let mut byte = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value != 0 {
            byte |= CONTINUATION_BIT;
        }
        dst.put_u8(byte);
        written += 1;

        if value == 0 {
            return written;
        }
    }
}

/// Number of bytes `encode(value)` produces, between 1 and 10 inclusive.
pub fn encoded_len(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

/// Decode one varint starting at `start`.
///
/// Returns the value and the number of bytes consumed, terminating byte included.
///
/// Fails with [`VarintError::TruncatedInput`] if the buffer ends (or is empty at
/// `start`) before a byte with the continuation bit clear. Fails with
/// [`VarintError::Overflow`] if the tenth byte still has the continuation bit
/// set or carries more than the single remaining bit of a `u64`.
pub fn decode_one(bytes: &[u8], start: usize) -> Result<(u64, usize)> {
    let src = bytes.get(start..).unwrap_or_default();

    let mut value = 0u64;
    let mut shift = 0u32;
    for (index, &byte) in src.iter().enumerate() {
        let group = u64::from(byte & PAYLOAD_MASK);

        if index == MAX_VARINT_LEN - 1 && (byte & CONTINUATION_BIT != 0 || group > 1) {
            return Err(VarintError::Overflow { offset: start });
        }

        value |= group << shift;
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value, index + 1));
        }
        shift += 7;
    }

    Err(VarintError::TruncatedInput { offset: start })
}
