//! Protobuf-compatible base-128 varints with ZigZag signed mapping.
//!
//! This is the core layer of varintprims. Every value is encoded as:
//! - 7 payload bits per byte, least-significant group first
//! - Bit 7 set on every byte except the last (continuation flag)
//! - 1 to 10 bytes per `u64`
//!
//! Streams are plain concatenations of varints, with no separators or
//! length prefixes.

#[cfg(feature = "async")]
pub mod codec;
pub mod error;
pub mod reader;
pub mod stream;
pub mod varint;
pub mod writer;
pub mod zigzag;

#[cfg(feature = "async")]
pub use codec::VarintCodec;
pub use error::{Result, VarintError};
pub use reader::VarintReader;
pub use stream::{
    decode_all, decode_all_with, decode_buf, encode_all, iter, DecodeAll, StreamConfig,
};
pub use varint::{decode_one, encode, encode_to, encoded_len, MAX_VARINT_LEN};
pub use writer::VarintWriter;
pub use zigzag::{
    decode_signed, encode_signed, zigzag_decode_32, zigzag_decode_64, zigzag_encode_32,
    zigzag_encode_64,
};
