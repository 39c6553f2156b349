//! Unsigned varint helpers shared by the multihash, CID and key envelope codecs
//!
//! Each byte carries 7 bits of magnitude and a continuation bit (LEB128).
//! Non-minimal encodings are rejected on decode.

use std::io::Read;

use crate::{MultiformatError, error::Result};

/// Append the varint encoding of `value` to `out`
pub fn encode_u64(value: u64, out: &mut Vec<u8>) {
    let mut buffer = unsigned_varint::encode::u64_buffer();
    out.extend_from_slice(unsigned_varint::encode::u64(value, &mut buffer));
}

/// Decode a varint from the front of `bytes`, returning the value and the remainder
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, &[u8])> {
    unsigned_varint::decode::u64(bytes)
        .map_err(|e| MultiformatError::Format(format!("varint decode: {e}")))
}

/// Read a single varint from a stream
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    match unsigned_varint::io::read_u64(reader) {
        Ok(value) => Ok(value),
        Err(unsigned_varint::io::ReadError::Io(e)) => Err(e.into()),
        Err(e) => Err(MultiformatError::Format(format!("varint decode: {e}"))),
    }
}
