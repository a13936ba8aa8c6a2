//! ZigZag mapping between signed and unsigned integers.
//!
//! Small magnitudes of either sign map to small unsigned values:
//! `0 -> 0`, `-1 -> 1`, `1 -> 2`, `-2 -> 3`, ... so that negative numbers
//! stay short once varint-encoded.

use crate::error::Result;
use crate::varint::{decode_one, encode};

/// `(n << 1) ^ (n >> 31)` with an arithmetic right shift.
pub fn zigzag_encode_32(n: i32) -> u32 {
    (n.wrapping_shl(1) ^ (n >> 31)) as u32
}

/// `(n << 1) ^ (n >> 63)` with an arithmetic right shift.
pub fn zigzag_encode_64(n: i64) -> u64 {
    (n.wrapping_shl(1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode_32`].
pub fn zigzag_decode_32(u: u32) -> i32 {
    ((u >> 1) as i32) ^ ((u & 1) as i32).wrapping_neg()
}

/// Inverse of [`zigzag_encode_64`].
pub fn zigzag_decode_64(u: u64) -> i64 {
    ((u >> 1) as i64) ^ ((u & 1) as i64).wrapping_neg()
}

/// Varint-encode a signed value after ZigZag mapping (Protobuf `sint64`).
pub fn encode_signed(n: i64) -> Vec<u8> {
    encode(zigzag_encode_64(n))
}

/// Decode a ZigZag varint starting at `start`.
///
/// Returns the signed value and the number of bytes consumed.
pub fn decode_signed(bytes: &[u8], start: usize) -> Result<(i64, usize)> {
    let (u, consumed) = decode_one(bytes, start)?;
    Ok((zigzag_decode_64(u), consumed))
}
