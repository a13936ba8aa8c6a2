//! Protobuf-compatible varint and ZigZag encoding.
//!
//! varintprims encodes unsigned 64-bit integers as base-128 varints, decodes
//! concatenated varint streams, and maps signed integers through ZigZag so
//! small negative numbers stay short on the wire.
//!
//! # Crate Structure
//!
//! - [`codec`]: scalar and stream codec, ZigZag transform, I/O adapters
//!
//! The most common entry points are re-exported at the crate root.

/// Re-export codec types.
pub mod codec {
    pub use varintprims_codec::*;
}

pub use varintprims_codec::{
    decode_all, decode_one, encode, encode_all, zigzag_decode_32, zigzag_decode_64,
    zigzag_encode_32, zigzag_encode_64, Result, VarintError,
};
