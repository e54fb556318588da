//! Typed record codec — length-prefixed, checksummed binary records
//!
//! # Binary Format (per record)
//! ```text
//! [len: varint]              // byte length of the body
//! body:
//!   [tag: varint]            // RecordTag of the payload type
//!   [payload: bincode]       // fixed-int, little-endian, no trailing bytes
//!   [checksum: u32 LE]       // CRC32C over tag bytes ++ payload
//! ```
//!
//! Records of different types may share one byte stream. Tags are frozen:
//! an old record must stay decodable after an upgrade.

use bincode::Options;
use crc32c::crc32c;
use custody_types::errors::ErrorKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use settlement::{DepositItem, Flow, Order, Receipt};
use thiserror::Error;

use crate::varint::{self, VarintError};

const CHECKSUM_LEN: usize = 4;

/// Smallest possible body: one tag byte and the checksum.
pub const MIN_BODY_LEN: usize = 1 + CHECKSUM_LEN;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Nil input")]
    NilInput,

    #[error("Malformed varint at byte offset {offset}: {source}")]
    Varint { offset: usize, source: VarintError },

    #[error("Record at byte offset {offset} declares {len} bytes, limit is {limit}")]
    RecordTooLarge { offset: usize, len: u64, limit: usize },

    #[error("Truncated record at byte offset {offset}: need {need} bytes, have {have}")]
    Truncated { offset: usize, need: usize, have: usize },

    #[error("Record body at byte offset {offset} too small: {len} bytes, minimum is {}", MIN_BODY_LEN)]
    BodyTooSmall { offset: usize, len: usize },

    #[error("Checksum mismatch at byte offset {offset}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        offset: usize,
        stored: u32,
        computed: u32,
    },

    #[error("Corrupt payload at byte offset {offset}: {reason}")]
    Payload { offset: usize, reason: String },

    #[error("Unexpected record tag: expected {expected}, got {got}")]
    UnexpectedTag { expected: u64, got: u64 },

    #[error("Trailing bytes after record: {extra}")]
    TrailingBytes { extra: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::NilInput => ErrorKind::Validation,
            _ => ErrorKind::Decode,
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest body a length prefix may declare (default 64 MiB).
    pub max_record_size: usize,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self {
            max_record_size: 64 * 1024 * 1024,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ── Record Types ────────────────────────────────────────────────────

/// Stable type tags. Never renumber, never reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum RecordTag {
    Receipt = 1,
    Text = 2,
    Order = 3,
    DepositItem = 4,
    Flow = 5,
}

impl RecordTag {
    pub fn from_u64(tag: u64) -> Option<Self> {
        match tag {
            1 => Some(RecordTag::Receipt),
            2 => Some(RecordTag::Text),
            3 => Some(RecordTag::Order),
            4 => Some(RecordTag::DepositItem),
            5 => Some(RecordTag::Flow),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

/// A type registered with the codec.
pub trait Record: Serialize + DeserializeOwned {
    const TAG: RecordTag;
}

impl Record for Receipt {
    const TAG: RecordTag = RecordTag::Receipt;
}

/// Plain string markers written by other logic sharing a result slot.
impl Record for String {
    const TAG: RecordTag = RecordTag::Text;
}

impl Record for Order {
    const TAG: RecordTag = RecordTag::Order;
}

impl Record for DepositItem {
    const TAG: RecordTag = RecordTag::DepositItem;
}

impl Record for Flow {
    const TAG: RecordTag = RecordTag::Flow;
}

fn payload_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

// ── Encoding ────────────────────────────────────────────────────────

/// Append one framed record to `out`.
pub fn encode_record<T: Record>(value: &T, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let payload = payload_options()
        .serialize(value)
        .map_err(|e| CodecError::Serialization(e.to_string()))?;

    let mut content = varint::encode(T::TAG.as_u64());
    content.extend_from_slice(&payload);
    let checksum = crc32c(&content);

    varint::encode_to_vec((content.len() + CHECKSUM_LEN) as u64, out);
    out.extend_from_slice(&content);
    out.extend_from_slice(&checksum.to_le_bytes());
    Ok(())
}

pub fn encode_to_vec<T: Record>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_record(value, &mut out)?;
    Ok(out)
}

/// Receipts back to back, in order.
pub fn encode_receipts(receipts: &[Receipt]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    for receipt in receipts {
        encode_record(receipt, &mut out)?;
    }
    Ok(out)
}

// ── Decoding ────────────────────────────────────────────────────────

/// A structurally valid record whose payload is not yet decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub tag: u64,
    pub payload: &'a [u8],
    /// Byte offset of the length prefix within the stream.
    pub offset: usize,
}

impl<'a> RawRecord<'a> {
    pub fn is<T: Record>(&self) -> bool {
        self.tag == T::TAG.as_u64()
    }

    /// Decode the payload as `T`, refusing a record of another type.
    pub fn decode<T: Record>(&self) -> Result<T, CodecError> {
        if !self.is::<T>() {
            return Err(CodecError::UnexpectedTag {
                expected: T::TAG.as_u64(),
                got: self.tag,
            });
        }
        payload_options()
            .deserialize(self.payload)
            .map_err(|e| CodecError::Payload {
                offset: self.offset,
                reason: e.to_string(),
            })
    }
}

/// Frame the record starting at `offset`, verifying length and checksum.
///
/// Returns the record and the number of bytes it spans.
pub fn read_frame<'a>(
    data: &'a [u8],
    offset: usize,
    config: &CodecConfig,
) -> Result<(RawRecord<'a>, usize), CodecError> {
    let input = data.get(offset..).unwrap_or_default();
    let (declared, prefix_len) =
        varint::decode(input).map_err(|source| CodecError::Varint { offset, source })?;

    if declared > config.max_record_size as u64 {
        return Err(CodecError::RecordTooLarge {
            offset,
            len: declared,
            limit: config.max_record_size,
        });
    }

    let len = declared as usize;
    let have = input.len() - prefix_len;
    if len > have {
        return Err(CodecError::Truncated {
            offset,
            need: len,
            have,
        });
    }
    if len < MIN_BODY_LEN {
        return Err(CodecError::BodyTooSmall { offset, len });
    }

    let body = &input[prefix_len..prefix_len + len];
    let (content, checksum_bytes) = body.split_at(len - CHECKSUM_LEN);
    let mut stored = [0u8; CHECKSUM_LEN];
    stored.copy_from_slice(checksum_bytes);
    let stored = u32::from_le_bytes(stored);
    let computed = crc32c(content);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch {
            offset,
            stored,
            computed,
        });
    }

    let (tag, tag_len) = varint::decode(content).map_err(|source| CodecError::Varint {
        offset: offset + prefix_len,
        source,
    })?;

    let record = RawRecord {
        tag,
        payload: &content[tag_len..],
        offset,
    };
    Ok((record, prefix_len + len))
}

/// Decode a buffer holding exactly one record of type `T`.
pub fn decode_exact<T: Record>(data: &[u8], config: &CodecConfig) -> Result<T, CodecError> {
    let (record, consumed) = read_frame(data, 0, config)?;
    if consumed != data.len() {
        return Err(CodecError::TrailingBytes {
            extra: data.len() - consumed,
        });
    }
    record.decode()
}

// ── Tests ───────────────────────────────────────────────────────────
