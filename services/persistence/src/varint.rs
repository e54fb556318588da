//! Little-endian base-128 varints over `u64`
//!
//! Seven payload bits per byte, high bit set on every byte but the last.
//! At most ten bytes; the tenth may only carry the top bit of a `u64`.

use thiserror::Error;

pub const MAX_LEN: usize = 10;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    #[error("varint too long")]
    Overlong,

    #[error("varint overflows u64")]
    Overflow,

    #[error("varint unterminated")]
    Unterminated,
}

pub fn encode_to_vec(mut n: u64, v: &mut Vec<u8>) {
    while n >> 7 > 0 {
        v.push((n as u8) | 0b1000_0000);
        n >>= 7;
    }
    v.push(n as u8);
}

pub fn encode(n: u64) -> Vec<u8> {
    let mut v = Vec::with_capacity(MAX_LEN);
    encode_to_vec(n, &mut v);
    v
}

/// Returns the value and the number of bytes consumed.
pub fn decode(buffer: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut n = 0u64;

    for (i, &byte) in buffer.iter().enumerate() {
        if i >= MAX_LEN {
            return Err(VarintError::Overlong);
        }

        let value = u64::from(byte & 0b0111_1111);

        if i == MAX_LEN - 1 && value > 1 {
            return Err(VarintError::Overflow);
        }

        n |= value << (7 * i);

        if byte & 0b1000_0000 == 0 {
            return Ok((n, i + 1));
        }
    }

    Err(VarintError::Unterminated)
}
